use cramer_core::{device::Device, default_tolerance, CramerCoreError, Matrix, Scalar};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SolveResult<V: Scalar, M> {
    pub x: Vec<V>,   // Solution vector
    pub metadata: M, // Metadata about the solve process
}

// --- Algorithm Trait Definition ---
/// Trait representing a specific linear system solving algorithm.
/// Generic over the Device and Matrix type it supports.
pub trait SolveAlgorithm<D: Device, M: Matrix> {
    /// The numeric type the algorithm operates on (e.g., f32, f64).
    /// Must match the Matrix::Value type.
    type Value: Scalar;
    type Metadata: std::fmt::Debug;

    /// Solves the linear system Ax = b for x.
    ///
    /// Blocks until the solution is complete, whatever concurrency the
    /// implementation uses internally.
    ///
    /// # Arguments
    ///
    /// * `device` - The execution device.
    /// * `a` - The coefficient matrix A.
    /// * `b` - The right-hand side vector b.
    ///
    /// # Returns
    ///
    /// A `Result` containing the solution vector x or a `CramerCoreError`.
    fn solve(
        &self,
        device: &D,
        a: &M,
        b: &[Self::Value],
    ) -> Result<SolveResult<Self::Value, Self::Metadata>, CramerCoreError>;

    // Helper for input validation, can be called by implementations.
    fn validate_inputs(&self, a: &M, b: &[Self::Value]) -> Result<(), CramerCoreError> {
        let (rows, cols) = a.dims();
        if !a.is_square() {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Matrix A must be square (dims: {}x{})",
                rows, cols
            )));
        }
        if rows != b.len() {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Matrix A rows ({}) must match RHS vector b length ({})",
                rows,
                b.len()
            )));
        }
        Ok(())
    }
}

// --- Algorithm Implementations ---

pub mod cpu_dense_cramer; // Concurrent Cramer's rule over dense matrices

pub use cpu_dense_cramer::CramerMetadata;

// --- Algorithm Struct Definitions ---

/// Cramer's rule: `x[i] = det(A_i) / det(A)`, where `A_i` is `A` with column `i`
/// replaced by `b`.
#[derive(Debug, Clone, Default)]
pub struct Cramer {
    /// Relative singularity tolerance. The system is rejected as singular when
    /// the smallest LU pivot of A is at most `tolerance * max_ij |a_ij|`.
    /// `None` selects `n * epsilon` for the element type.
    pub tolerance: Option<f64>,
}

impl Cramer {
    /// Creates a new instance of the Cramer algorithm with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance of the Cramer algorithm with an explicit relative tolerance.
    /// A tolerance of `0.0` only rejects systems whose determinant is exactly zero.
    pub fn with_params(tolerance: f64) -> Self {
        Self {
            tolerance: Some(tolerance),
        }
    }

    /// The tolerance applied to an `n x n` system of element type `V`.
    pub fn effective_tolerance<V: Scalar>(&self, n: usize) -> V {
        self.tolerance
            .and_then(num_traits::cast)
            .unwrap_or_else(|| default_tolerance(n))
    }
}
