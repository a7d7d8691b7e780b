use std::future::Future;
use std::time::Instant;

use cramer_core::{
    lu_determinant, singularity_ratio, CpuDevice, CramerCoreError, DenseMatrix, Matrix, Scalar,
    ScaledDeterminant,
};
use futures::channel::oneshot;
use log::{debug, info, trace, warn};
use rayon::prelude::*;
use serde::Serialize;

use super::{Cramer, SolveAlgorithm, SolveResult};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CramerMetadata<V> {
    /// det(A); saturates to `±inf` or `0` when it is out of range for `V`.
    pub determinant: V,
    /// Smallest LU pivot of A relative to its largest entry, in `[0, 1]`.
    pub singularity_ratio: V,
    /// Worker threads the unknowns were spread over.
    pub workers: usize,
    /// `max_i |(A x - b)_i|` of the returned solution.
    pub residual_norm: V,
}

impl<V: Scalar> SolveAlgorithm<CpuDevice, DenseMatrix<V>> for Cramer {
    type Value = V;
    type Metadata = CramerMetadata<V>;

    fn solve(
        &self,
        device: &CpuDevice,
        a: &DenseMatrix<V>,
        b: &[V],
    ) -> Result<SolveResult<Self::Value, Self::Metadata>, CramerCoreError> {
        self.validate_inputs(a, b)?;
        if !a.is_finite() || b.iter().any(|v| !v.is_finite()) {
            return Err(CramerCoreError::NonFiniteInput(
                "A and b must not contain NaN or infinite entries".to_string(),
            ));
        }

        let n = a.rows();
        let workers = device.workers();
        info!("Cramer solve: {} unknowns on {} workers", n, workers);
        let start_time = Instant::now();

        let lu = lu_determinant(a)?;
        let det_a = lu.determinant;
        let ratio = singularity_ratio(a, &lu);
        let tolerance = self.effective_tolerance::<V>(n);
        debug!(
            "det(A) = {:e} * 2^{}, relative pivot = {:e}, tolerance = {:e}",
            as_f64(det_a.mantissa),
            det_a.exponent,
            as_f64(ratio),
            as_f64(tolerance)
        );
        if ratio <= tolerance {
            warn!("Rejecting singular system (det(A) = {:e})", as_f64(det_a.value()));
            return Err(CramerCoreError::SingularSystem {
                determinant: as_f64(det_a.value()),
                ratio: as_f64(ratio),
                tolerance: as_f64(tolerance),
            });
        }

        let x = cramer_unknowns(device, a, b, &det_a)?;
        if let Some((index, value)) = x.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            warn!("x[{}] is not representable: {:e}", index, as_f64(*value));
            return Err(CramerCoreError::NonFiniteSolution {
                index,
                value: as_f64(*value),
            });
        }
        let residual_norm = a.residual_norm(&x, b)?;
        debug!(
            "Cramer solve finished in {:?}, residual norm {:e}",
            start_time.elapsed(),
            as_f64(residual_norm)
        );

        Ok(SolveResult {
            x,
            metadata: CramerMetadata {
                determinant: det_a.value(),
                singularity_ratio: ratio,
                workers,
                residual_norm,
            },
        })
    }
}

impl Cramer {
    /// Runs [`SolveAlgorithm::solve`] on the device pool and returns a future that
    /// resolves once every unknown has been computed.
    ///
    /// The inputs are moved in because the solve outlives the calling frame.
    pub fn solve_async<V: Scalar>(
        &self,
        device: &CpuDevice,
        a: DenseMatrix<V>,
        b: Vec<V>,
    ) -> impl Future<Output = Result<SolveResult<V, CramerMetadata<V>>, CramerCoreError>>
           + Send
           + 'static {
        let (sender, receiver) = oneshot::channel();
        let algorithm = self.clone();
        let worker = device.clone();
        device.spawn(move || {
            let result = algorithm.solve(&worker, &a, &b);
            // The receiver is gone if the caller dropped the future.
            let _ = sender.send(result);
        });
        async move {
            match receiver.await {
                Ok(result) => result,
                Err(oneshot::Canceled) => Err(CramerCoreError::Internal(
                    "solve task ended without reporting a result".to_string(),
                )),
            }
        }
    }
}

/// Fan-out/fan-in over the unknowns.
///
/// `x` is allocated at full length before any task starts and every task gets
/// exclusive `&mut` access to its own slot, so writes need no lock. Each task
/// builds a private copy of A with column `i` replaced by `b`. `install` returns
/// only after all tasks have finished.
///
/// Both determinants stay in scaled form, so `x[i]` is finite whenever the
/// quotient itself is representable.
pub(super) fn cramer_unknowns<V: Scalar>(
    device: &CpuDevice,
    a: &DenseMatrix<V>,
    b: &[V],
    det_a: &ScaledDeterminant<V>,
) -> Result<Vec<V>, CramerCoreError> {
    let mut x = vec![V::zero(); a.rows()];
    device.install(|| {
        x.par_iter_mut()
            .enumerate()
            .try_for_each(|(i, slot)| -> Result<(), CramerCoreError> {
                let a_i = a.with_column_replaced(i, b)?;
                let det_a_i = lu_determinant(&a_i)?.determinant;
                *slot = det_a_i.ratio(det_a);
                trace!("x[{}] = {:e}", i, as_f64(*slot));
                Ok(())
            })
    })?;
    Ok(x)
}

fn as_f64<V: Scalar>(value: V) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
