use cramer_lsolver::{
    algorithms::{Cramer, SolveAlgorithm},
    CpuDevice, DenseMatrix,
};
use std::time::Instant;

/// Creates a dense pentadiagonal matrix A of size n x n.
/// Diagonals:
/// - Main: 4.0
/// - Adjacent (+1, -1): -1.0
/// - Outer (+2, -2): -0.5
fn create_pentadiagonal_matrix(n: usize) -> DenseMatrix<f64> {
    let mut a = DenseMatrix::zeros(n, n);
    let data = a.data_mut();
    for i in 0..n {
        data[i * n + i] = 4.0;
        if i >= 1 {
            data[i * n + i - 1] = -1.0;
        }
        if i >= 2 {
            data[i * n + i - 2] = -0.5;
        }
        if i + 1 < n {
            data[i * n + i + 1] = -1.0;
        }
        if i + 2 < n {
            data[i * n + i + 2] = -0.5;
        }
    }
    a
}

/// Creates a vector b of size n with b[i] = sin(i / n).
fn create_sin_vector(n: usize) -> Vec<f64> {
    (0..n).map(|i| (i as f64 / n as f64).sin()).collect()
}

fn main() {
    // Initialize logging based on RUST_LOG environment variable
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let n = 200;
    log::info!(
        "Setting up {}x{} pentadiagonal matrix A and sin vector b...",
        n,
        n
    );
    let a = create_pentadiagonal_matrix(n);
    let b = create_sin_vector(n);

    // 1. Setup Device
    let device = CpuDevice::new().expect("Failed to create CPU device");

    // 2. Setup Algorithm
    let algorithm = Cramer::new();
    log::info!("Running Cramer solver on {} workers...", device.workers());

    // 3. Solve
    let start_time = Instant::now();
    let x_result = algorithm.solve(&device, &a, &b);
    let duration = start_time.elapsed();

    match x_result {
        Ok(result) => {
            log::info!("Solver finished successfully!");
            log::info!("  det(A): {:.6e}", result.metadata.determinant);
            log::info!("  Relative pivot: {:.6e}", result.metadata.singularity_ratio);
            log::info!("  Residual norm: {:.6e}", result.metadata.residual_norm);
            log::info!("  Time elapsed: {:?}", duration);
            log::debug!("Solution vector x (first 10 elements): {:?}", &result.x[..10.min(n)]);
        }
        Err(e) => {
            log::error!("Solver failed: {:?}", e);
        }
    }
}
