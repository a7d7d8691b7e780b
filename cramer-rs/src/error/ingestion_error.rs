use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("Input file '{path}' not found or unreadable: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read input: {0}")]
    Csv(#[from] csv::Error),

    #[error("Line {line}: '{token}' is not a finite number")]
    Parse { line: u64, token: String },

    #[error("Invalid system dimensions: {0}")]
    DimensionMismatch(String),
}
