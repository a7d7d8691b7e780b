use bytemuck::{Pod, Zeroable};
use num_traits::Float;
use std::fmt::Debug;

/// Floating-point element type the dense kernels operate on (`f32`, `f64`).
pub trait Scalar: Float + Copy + Send + Sync + Debug + Default + Pod {}

impl<T> Scalar for T where T: Float + Copy + Send + Sync + Debug + Default + Pod {}

/// Generic trait representing a matrix.
/// Solver algorithms are generic over it so that other storage layouts can be plugged in.
pub trait Matrix: Debug {
    /// The underlying numeric type of the matrix elements (e.g., f32, f64).
    type Value: Copy + Debug + Default + Pod + Zeroable;

    /// Returns the dimensions of the matrix as (rows, columns).
    fn dims(&self) -> (usize, usize);

    /// Returns the number of rows.
    fn rows(&self) -> usize {
        self.dims().0
    }

    /// Returns the number of columns.
    fn cols(&self) -> usize {
        self.dims().1
    }

    /// Checks if the matrix is square.
    fn is_square(&self) -> bool {
        let (rows, cols) = self.dims();
        rows == cols
    }
}
