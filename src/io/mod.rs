//! Delimited-text reader and request-string parsing.
//!
//! The upload format is deliberately loose: delimiter-separated text with a
//! header row. Column types are inferred per column — numeric when every
//! cell parses as a float, categorical otherwise.

use csv::ReaderBuilder;

use crate::dataset::{Column, ColumnData, TabularDataset};
use crate::error::PipelineError;

/// Read comma-delimited text into a `TabularDataset`.
pub fn read_csv(text: &str) -> Result<TabularDataset, PipelineError> {
    read_delimited(text, b',')
}

/// Read delimiter-separated text with a header row into a `TabularDataset`.
///
/// Fails with `Parse` on ragged rows, duplicate headers, or a table with no
/// data rows.
pub fn read_delimited(text: &str, delimiter: u8) -> Result<TabularDataset, PipelineError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| PipelineError::Parse(format!("header row: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| PipelineError::Parse(format!("row {}: {}", row_idx + 1, e)))?;
        for (j, field) in record.iter().enumerate() {
            cells[j].push(field.trim().to_string());
        }
    }

    if cells.first().map_or(true, |c| c.is_empty()) {
        return Err(PipelineError::Parse("table has no data rows".to_string()));
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column {
            name,
            data: infer_column(values),
        })
        .collect();

    let dataset = TabularDataset::new(columns)?;
    log::debug!(
        "parsed table: {} rows x {} columns",
        dataset.n_rows(),
        dataset.n_cols()
    );
    Ok(dataset)
}

/// A column is numeric only when every cell parses as a float.
fn infer_column(values: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = values.iter().map(|v| v.parse::<f64>().ok()).collect();
    match parsed {
        Some(numbers) => ColumnData::Numeric(numbers),
        None => ColumnData::Categorical(values),
    }
}

/// Parse a comma-separated list of column names.
///
/// Whitespace around names is ignored; an empty or whitespace-only string
/// yields an empty list ("remove nothing").
pub fn parse_column_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
