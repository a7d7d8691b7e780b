mod ingestion_error;

pub use ingestion_error::IngestionError;
use derive_more::From;

use cramer_core::error::CramerCoreError;

pub type Result<T> = core::result::Result<T, CramerError>;

#[derive(Debug, From)]
pub enum CramerError {
    // -- Externals
    #[from]
    Ingestion(IngestionError),

    #[from]
    Solver(CramerCoreError),

    #[from]
    Json(serde_json::Error),
}

// region:    --- Error Boilerplate

impl core::fmt::Display for CramerError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        match self {
            Self::Ingestion(err) => write!(fmt, "{err}"),
            Self::Solver(err) => write!(fmt, "{err}"),
            Self::Json(err) => write!(fmt, "JSON rendering failed: {err}"),
        }
    }
}

impl std::error::Error for CramerError {}

// endregion: --- Error Boilerplate
