//! # Cramer Core Library
//!
//! Provides the dense matrix type, the CPU execution device and the
//! determinant routines the Cramer's-rule solver is built on.

// Declare modules
pub mod dense_matrix;
pub mod device;
pub mod error;
pub mod ops;
pub mod traits;

// Re-export public types
pub use dense_matrix::DenseMatrix;
pub use device::{CpuDevice, Device};
pub use error::CramerCoreError;
pub use ops::{
    default_tolerance, determinant, lu_determinant, singularity_ratio, LuDeterminant,
    ScaledDeterminant,
};
pub use traits::{Matrix, Scalar};
