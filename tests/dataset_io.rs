//! Integration tests for table parsing and dataset manipulation.

use tabflow::dataset::{Column, ColumnData, TabularDataset};
use tabflow::error::PipelineError;
use tabflow::io::{parse_column_list, read_csv, read_delimited};

fn sample_csv() -> &'static str {
    "a,b,label\n1,10,x\n2,20,y\n3,30,x\n4,40,y\n"
}

// ---------------------------------------------------------------------------
// Parsing and type inference
// ---------------------------------------------------------------------------

#[test]
fn read_csv_infers_column_types() {
    let dataset = read_csv(sample_csv()).unwrap();
    assert_eq!(dataset.n_rows(), 4);
    assert_eq!(dataset.n_cols(), 3);
    assert_eq!(dataset.column_names(), vec!["a", "b", "label"]);

    assert!(matches!(
        dataset.column("a").unwrap().data,
        ColumnData::Numeric(_)
    ));
    assert!(matches!(
        dataset.column("label").unwrap().data,
        ColumnData::Categorical(_)
    ));
}

#[test]
fn read_csv_mixed_column_is_categorical() {
    let dataset = read_csv("v\n1\ntwo\n3\n").unwrap();
    match &dataset.column("v").unwrap().data {
        ColumnData::Categorical(values) => assert_eq!(values, &["1", "two", "3"]),
        other => panic!("expected categorical, got {:?}", other),
    }
}

#[test]
fn read_delimited_supports_other_delimiters() {
    let dataset = read_delimited("a;b\n1;2\n3;4\n", b';').unwrap();
    assert_eq!(dataset.n_cols(), 2);
    assert_eq!(dataset.n_rows(), 2);
}

#[test]
fn read_csv_ragged_rows_fail() {
    let err = read_csv("a,b\n1,2\n3\n").unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
}

#[test]
fn read_csv_no_data_rows_fails() {
    let err = read_csv("a,b\n").unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
}

#[test]
fn duplicate_headers_fail() {
    let err = read_csv("a,a\n1,2\n").unwrap_err();
    assert!(matches!(err, PipelineError::Parse(_)));
}

// ---------------------------------------------------------------------------
// Column removal
// ---------------------------------------------------------------------------

#[test]
fn remove_columns_drops_named_columns() {
    let mut dataset = read_csv(sample_csv()).unwrap();
    dataset.remove_columns(&["b".to_string()]).unwrap();
    assert_eq!(dataset.column_names(), vec!["a", "label"]);
}

#[test]
fn remove_columns_missing_name_is_atomic() {
    let mut dataset = read_csv(sample_csv()).unwrap();
    let before = dataset.clone();

    let err = dataset
        .remove_columns(&["a".to_string(), "ghost".to_string()])
        .unwrap_err();
    assert_eq!(err, PipelineError::ColumnNotFound("ghost".to_string()));
    // No partial removal: the dataset is unchanged.
    assert_eq!(dataset, before);
}

#[test]
fn remove_columns_empty_list_is_noop() {
    let mut dataset = read_csv(sample_csv()).unwrap();
    let before = dataset.clone();
    dataset.remove_columns(&[]).unwrap();
    assert_eq!(dataset, before);
}

#[test]
fn parse_column_list_trims_and_drops_empties() {
    assert_eq!(parse_column_list(" a , b ,c"), vec!["a", "b", "c"]);
    assert!(parse_column_list("").is_empty());
    assert!(parse_column_list("   ").is_empty());
}

// ---------------------------------------------------------------------------
// Label separation and matrix conversion
// ---------------------------------------------------------------------------

#[test]
fn split_label_separates_features_and_labels() {
    let dataset = read_csv(sample_csv()).unwrap();
    let (features, label) = dataset.split_label("label").unwrap();
    assert_eq!(features.column_names(), vec!["a", "b"]);
    assert_eq!(label.values_as_text(), vec!["x", "y", "x", "y"]);
}

#[test]
fn split_label_missing_column_fails() {
    let dataset = read_csv(sample_csv()).unwrap();
    let err = dataset.split_label("ghost").unwrap_err();
    assert_eq!(err, PipelineError::ColumnNotFound("ghost".to_string()));
}

#[test]
fn to_matrix_is_row_major() {
    let dataset = read_csv("a,b\n1,10\n2,20\n").unwrap();
    let m = dataset.to_matrix().unwrap();
    assert_eq!(m.dim(), (2, 2));
    assert_eq!(m[(0, 0)], 1.0);
    assert_eq!(m[(0, 1)], 10.0);
    assert_eq!(m[(1, 1)], 20.0);
}

#[test]
fn to_matrix_categorical_column_fails_with_conversion() {
    let dataset = read_csv("a,b\n1,foo\n2,bar\n").unwrap();
    let err = dataset.to_matrix().unwrap_err();
    assert_eq!(
        err,
        PipelineError::Conversion {
            value: "foo".to_string()
        }
    );
}

#[test]
fn dataset_new_rejects_unequal_lengths() {
    let columns = vec![
        Column {
            name: "a".to_string(),
            data: ColumnData::Numeric(vec![1.0, 2.0]),
        },
        Column {
            name: "b".to_string(),
            data: ColumnData::Numeric(vec![1.0]),
        },
    ];
    assert!(TabularDataset::new(columns).is_err());
}
