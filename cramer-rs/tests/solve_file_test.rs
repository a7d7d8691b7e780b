use std::path::PathBuf;

use cramer_core::CramerCoreError;
use cramer_lsolver::{CpuDevice, algorithms::Cramer};
use cramer_rs::{CramerError, IngestOptions, IngestionError, format_solution, solve_file};

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn solve(name: &str) -> cramer_rs::Result<Vec<f64>> {
    let _ = env_logger::builder().is_test(true).try_init();
    let device = CpuDevice::with_threads(2)?;
    let result = solve_file(
        data_file(name),
        &IngestOptions::default(),
        &Cramer::new(),
        &device,
    )?;
    Ok(result.x)
}

#[test]
fn test_solve_file_three_by_three() {
    let x = solve("three_by_three.txt").unwrap();
    let text = format_solution(&x, &Default::default());
    assert_eq!(
        text,
        "Solution:\n  x1 = 6.000000\n  x2 = 15.000000\n  x3 = -23.000000"
    );
}

#[test]
fn test_solve_file_singular_is_solver_error() {
    match solve("singular.txt") {
        Err(CramerError::Solver(CramerCoreError::SingularSystem { .. })) => {}
        other => panic!("expected singular system, got {:?}", other),
    }
}

#[test]
fn test_solve_file_not_square_is_ingestion_error() {
    match solve("not_square.txt") {
        Err(CramerError::Ingestion(IngestionError::DimensionMismatch(_))) => {}
        other => panic!("expected ingestion dimension mismatch, got {:?}", other),
    }
}

#[test]
fn test_solve_file_malformed_is_parse_error() {
    match solve("malformed.txt") {
        Err(CramerError::Ingestion(IngestionError::Parse { line, token })) => {
            assert_eq!(line, 2);
            assert_eq!(token, "one");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_solve_file_missing_is_not_found() {
    let err = solve("does_not_exist.txt").unwrap_err();
    assert!(matches!(
        err,
        CramerError::Ingestion(IngestionError::NotFound { .. })
    ));
    assert!(err.to_string().contains("does_not_exist.txt"));
}
