//! `cramer-lsolver`: solves square linear systems `Ax = b` with Cramer's rule.
//!
//! Every unknown is the ratio of two determinants. The per-unknown determinants
//! are independent, so they are evaluated concurrently on the bounded worker
//! pool of a [`CpuDevice`].

// Core modules
pub mod algorithms;

// Re-export from cramer_core
pub use cramer_core::{
    device::{CpuDevice, Device},
    CramerCoreError,
    DenseMatrix,
    Matrix,
    Scalar,
};
