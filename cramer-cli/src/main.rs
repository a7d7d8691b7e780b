use std::{env, process::ExitCode, str::FromStr};

use cramer_core::CramerCoreError;
use cramer_lsolver::{CpuDevice, algorithms::Cramer};
use cramer_rs::{
    CramerError, DisplayOptions, IngestOptions, IngestionError, format_json, format_solution,
    solve_file,
};

const DEFAULT_INPUT: &str = "matrix.txt";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_INPUT.to_string());

    match run(&path) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::debug!("Solve failed: {:?}", err);
            println!("Error: {err}");
            ExitCode::from(exit_code(&err))
        }
    }
}

fn run(path: &str) -> cramer_rs::Result<String> {
    let device = match env_value::<usize>("CRAMER_THREADS") {
        Some(threads) => CpuDevice::with_threads(threads)?,
        None => CpuDevice::new()?,
    };
    let algorithm = match env_value::<f64>("CRAMER_TOLERANCE") {
        Some(tolerance) if tolerance.is_finite() && tolerance >= 0.0 => {
            Cramer::with_params(tolerance)
        }
        Some(tolerance) => {
            log::warn!("Ignoring CRAMER_TOLERANCE={tolerance}: must be finite and >= 0");
            Cramer::new()
        }
        None => Cramer::new(),
    };

    let start_time = std::time::Instant::now();
    let result = solve_file(path, &IngestOptions::default(), &algorithm, &device)?;
    log::info!(
        "Solved {} unknowns in {:?} (det(A) = {:e}, residual norm = {:e})",
        result.x.len(),
        start_time.elapsed(),
        result.metadata.determinant,
        result.metadata.residual_norm
    );

    let json = env::var("CRAMER_OUTPUT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));
    if json {
        format_json(&result)
    } else {
        Ok(format_solution(&result.x, &DisplayOptions::default()))
    }
}

/// Reads and parses an environment variable; invalid values are logged and ignored.
fn env_value<T: FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {name}={raw:?}: not a valid value");
            None
        }
    }
}

fn exit_code(err: &CramerError) -> u8 {
    match err {
        CramerError::Ingestion(IngestionError::NotFound { .. }) => 2,
        CramerError::Ingestion(IngestionError::Parse { .. }) => 3,
        CramerError::Ingestion(IngestionError::DimensionMismatch(_))
        | CramerError::Solver(CramerCoreError::DimensionMismatch(_)) => 4,
        CramerError::Solver(CramerCoreError::SingularSystem { .. }) => 5,
        _ => 1,
    }
}
