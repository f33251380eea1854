use std::error::Error;
use std::fmt;

/// Failure conditions surfaced by pipeline-boundary operations.
///
/// Every variant carries the offending identifier (column name, bad value,
/// shape) so the caller can report it without re-deriving context. Nothing
/// here is retried internally; a failed call leaves prior state untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Malformed upload: not validly delimited, ragged rows, duplicate or
    /// missing headers, no data rows.
    Parse(String),
    /// A referenced column (pruning request or label selection) does not exist.
    ColumnNotFound(String),
    /// A value could not be interpreted as numeric.
    Conversion { value: String },
    /// A prediction row whose length does not match the fitted feature count.
    InputShape { expected: usize, got: usize },
    /// A class with too few members to appear in both split partitions.
    InsufficientData { class: String, count: usize },
    /// Evaluation requested against a test set with zero rows.
    EmptyTestSet,
    /// An unrecognized hyperparameter option.
    Config(String),
    /// A persisted artifact that could not be written, read, or restored as a
    /// self-consistent whole.
    Artifact(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Parse(detail) => write!(f, "failed to parse table: {}", detail),
            PipelineError::ColumnNotFound(name) => write!(f, "column '{}' not found", name),
            PipelineError::Conversion { value } => {
                write!(f, "value '{}' is not numeric", value)
            }
            PipelineError::InputShape { expected, got } => write!(
                f,
                "expected {} feature values, got {}",
                expected, got
            ),
            PipelineError::InsufficientData { class, count } => write!(
                f,
                "class '{}' has only {} member(s); at least 2 are required to stratify",
                class, count
            ),
            PipelineError::EmptyTestSet => write!(f, "test set has zero rows"),
            PipelineError::Config(detail) => write!(f, "invalid configuration: {}", detail),
            PipelineError::Artifact(detail) => write!(f, "model artifact error: {}", detail),
        }
    }
}

impl Error for PipelineError {}
