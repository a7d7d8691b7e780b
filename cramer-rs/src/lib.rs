//! Reads linear systems from text files, solves them with Cramer's rule and
//! renders the result.

pub mod display;
pub mod error;
pub mod ingest;

use std::path::Path;

use cramer_lsolver::{
    CpuDevice,
    algorithms::{Cramer, CramerMetadata, SolveAlgorithm, SolveResult},
};

pub use display::{DisplayOptions, format_json, format_solution};
pub use error::{CramerError, IngestionError, Result};
pub use ingest::{IngestOptions, LinearSystem, read_system, read_system_from_reader};

/// Loads the system stored at `path` and solves it.
///
/// Ingestion failures surface as `CramerError::Ingestion` before the solver is
/// invoked; solver failures surface as `CramerError::Solver`.
pub fn solve_file(
    path: impl AsRef<Path>,
    options: &IngestOptions,
    algorithm: &Cramer,
    device: &CpuDevice,
) -> Result<SolveResult<f64, CramerMetadata<f64>>> {
    let system = read_system(path, options)?;
    let result = algorithm.solve(device, &system.a, &system.b)?;
    Ok(result)
}
