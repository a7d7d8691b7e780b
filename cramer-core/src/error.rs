use thiserror::Error;

pub type Result<T> = core::result::Result<T, CramerCoreError>;

#[derive(Error, Debug)]
pub enum CramerCoreError {
    #[error("Invalid matrix dimensions: {0}")]
    DimensionMismatch(String),

    #[error(
        "System is singular (det = {determinant:e}, relative pivot {ratio:e} <= tolerance {tolerance:e}): no unique solution"
    )]
    SingularSystem {
        determinant: f64,
        ratio: f64,
        tolerance: f64,
    },

    #[error("Non-finite value in input: {0}")]
    NonFiniteInput(String),

    #[error("Solution is out of floating-point range: x[{index}] = {value}")]
    NonFiniteSolution { index: usize, value: f64 },

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Internal error: {0}")]
    Internal(String),
}
