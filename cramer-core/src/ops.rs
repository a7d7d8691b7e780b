//! Determinant routines for dense matrices.
//!
//! All functions here are pure: they read their input and never modify it.

use crate::dense_matrix::DenseMatrix;
use crate::error::{CramerCoreError, Result};
use crate::traits::{Matrix, Scalar};

/// A determinant held as `mantissa * 2^exponent`.
///
/// `|mantissa|` stays in `[1, 2)` (or is zero), so a product of many pivots
/// neither overflows nor underflows even when the determinant itself lies
/// outside the range of the element type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledDeterminant<V> {
    pub mantissa: V,
    pub exponent: i32,
}

impl<V: Scalar> ScaledDeterminant<V> {
    pub fn one() -> Self {
        Self {
            mantissa: V::one(),
            exponent: 0,
        }
    }

    pub fn zero() -> Self {
        Self {
            mantissa: V::zero(),
            exponent: 0,
        }
    }

    pub fn from_value(value: V) -> Self {
        let (mantissa, exponent) = split_exponent(value);
        Self { mantissa, exponent }
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == V::zero()
    }

    /// Multiplies by a plain factor, renormalising the mantissa.
    pub fn times(self, factor: V) -> Self {
        let (m, e) = split_exponent(factor);
        let mut mantissa = self.mantissa * m;
        let mut exponent = self.exponent + e;
        if mantissa == V::zero() {
            return Self::zero();
        }
        if mantissa.abs() >= two() {
            mantissa = mantissa / two();
            exponent += 1;
        }
        Self { mantissa, exponent }
    }

    pub fn negated(self) -> Self {
        Self {
            mantissa: -self.mantissa,
            exponent: self.exponent,
        }
    }

    /// The determinant as a plain value. Saturates to `±inf` or `0` when it is
    /// out of range for `V`.
    pub fn value(&self) -> V {
        scale_by_pow2(self.mantissa, self.exponent)
    }

    /// `self / denominator` as a plain value, computed without forming either
    /// determinant, so only an out-of-range quotient saturates.
    pub fn ratio(&self, denominator: &Self) -> V {
        scale_by_pow2(
            self.mantissa / denominator.mantissa,
            self.exponent - denominator.exponent,
        )
    }
}

/// Outcome of an LU factorisation with partial pivoting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuDeterminant<V> {
    pub determinant: ScaledDeterminant<V>,
    /// `min_k |u_kk|`; zero when some column had no nonzero pivot and
    /// infinite for the empty matrix.
    pub min_pivot: V,
}

/// Computes the determinant of a square matrix.
///
/// Sizes 0, 1 and 2 use closed forms (`det` of the empty matrix is 1). Larger
/// matrices are reduced by LU factorisation with partial pivoting on a private
/// working copy, so the cost is `O(n^3)`.
///
/// # Errors
/// Returns `CramerCoreError::DimensionMismatch` if the matrix is not square.
pub fn determinant<V: Scalar>(matrix: &DenseMatrix<V>) -> Result<V> {
    ensure_square(matrix)?;
    let a = matrix.data();
    let det = match matrix.rows() {
        0 => V::one(),
        1 => a[0],
        2 => a[0] * a[3] - a[1] * a[2],
        _ => lu_determinant(matrix)?.determinant.value(),
    };
    Ok(det)
}

/// LU factorisation with partial pivoting on a private working copy.
///
/// The pivot product is accumulated as a [`ScaledDeterminant`] and the
/// smallest pivot magnitude is recorded for the singularity test.
///
/// # Errors
/// Returns `CramerCoreError::DimensionMismatch` if the matrix is not square.
pub fn lu_determinant<V: Scalar>(matrix: &DenseMatrix<V>) -> Result<LuDeterminant<V>> {
    ensure_square(matrix)?;
    let n = matrix.rows();
    let mut lu = matrix.data().to_vec();
    let mut det = ScaledDeterminant::one();
    let mut min_pivot = V::infinity();

    for k in 0..n {
        let mut pivot_row = k;
        let mut pivot_abs = lu[k * n + k].abs();
        for i in (k + 1)..n {
            let candidate = lu[i * n + k].abs();
            if candidate > pivot_abs {
                pivot_abs = candidate;
                pivot_row = i;
            }
        }

        // Whole column is zero below the diagonal: exactly singular.
        if pivot_abs == V::zero() {
            return Ok(LuDeterminant {
                determinant: ScaledDeterminant::zero(),
                min_pivot: V::zero(),
            });
        }

        if pivot_row != k {
            for j in 0..n {
                lu.swap(k * n + j, pivot_row * n + j);
            }
            det = det.negated();
        }

        let pivot = lu[k * n + k];
        det = det.times(pivot);
        min_pivot = min_pivot.min(pivot_abs);

        for i in (k + 1)..n {
            let factor = lu[i * n + k] / pivot;
            if factor == V::zero() {
                continue;
            }
            for j in (k + 1)..n {
                lu[i * n + j] = lu[i * n + j] - factor * lu[k * n + j];
            }
        }
    }
    Ok(LuDeterminant {
        determinant: det,
        min_pivot,
    })
}

/// Returns `min_k |u_kk| / max_ij |a_ij|`, a scale-free measure in `[0, 1]`.
///
/// The first pivot is the largest entry of its column, so the smallest pivot
/// never exceeds the largest entry of A. Rescaling the whole system leaves the
/// ratio unchanged, and unlike `|det|` it does not shrink with `n` for well
/// conditioned matrices. The empty matrix yields `1`; a zero pivot yields `0`.
pub fn singularity_ratio<V: Scalar>(matrix: &DenseMatrix<V>, lu: &LuDeterminant<V>) -> V {
    if matrix.rows() == 0 {
        return V::one();
    }
    let max_entry = matrix
        .data()
        .iter()
        .fold(V::zero(), |max, v| max.max(v.abs()));
    if max_entry == V::zero() || lu.determinant.is_zero() {
        return V::zero();
    }
    (lu.min_pivot / max_entry).min(V::one())
}

/// Default relative singularity tolerance for an `n x n` system: `n * epsilon`.
pub fn default_tolerance<V: Scalar>(n: usize) -> V {
    let scale: V = num_traits::cast(n.max(1)).unwrap_or_else(V::one);
    V::epsilon() * scale
}

fn ensure_square<V: Scalar>(matrix: &DenseMatrix<V>) -> Result<()> {
    if !matrix.is_square() {
        return Err(CramerCoreError::DimensionMismatch(format!(
            "Determinant requires a square matrix (dims: {}x{})",
            matrix.rows(),
            matrix.cols()
        )));
    }
    Ok(())
}

fn two<V: Scalar>() -> V {
    V::one() + V::one()
}

/// Splits a finite nonzero value into a mantissa in `[1, 2)` and a binary
/// exponent. Zero and non-finite values come back unchanged with exponent 0.
fn split_exponent<V: Scalar>(value: V) -> (V, i32) {
    if value == V::zero() || !value.is_finite() {
        return (value, 0);
    }
    let (mantissa, exponent, sign) = value.integer_decode();
    let bits = 64 - mantissa.leading_zeros() as i32;
    // At most 53 significant bits, so the conversion is exact.
    let integer: V = num_traits::cast(mantissa).unwrap_or_else(V::one);
    let sign = if sign < 0 { -V::one() } else { V::one() };
    (
        sign * integer * two::<V>().powi(1 - bits),
        i32::from(exponent) + bits - 1,
    )
}

/// `value * 2^exponent`, applied in two halves so intermediate powers stay in
/// range whenever the result does.
fn scale_by_pow2<V: Scalar>(value: V, exponent: i32) -> V {
    let half = exponent / 2;
    value * two::<V>().powi(half) * two::<V>().powi(exponent - half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix(rows: &[Vec<f64>]) -> DenseMatrix<f64> {
        DenseMatrix::from_rows(rows).unwrap()
    }

    /// Reference cofactor expansion, only usable for tiny matrices.
    fn cofactor_determinant(m: &[Vec<f64>]) -> f64 {
        let n = m.len();
        if n == 0 {
            return 1.0;
        }
        if n == 1 {
            return m[0][0];
        }
        (0..n)
            .map(|col| {
                let minor: Vec<Vec<f64>> = m[1..]
                    .iter()
                    .map(|row| {
                        row.iter()
                            .enumerate()
                            .filter(|&(j, _)| j != col)
                            .map(|(_, &v)| v)
                            .collect()
                    })
                    .collect();
                let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
                sign * m[0][col] * cofactor_determinant(&minor)
            })
            .sum()
    }

    #[test]
    fn test_base_cases() {
        assert_eq!(determinant(&DenseMatrix::<f64>::zeros(0, 0)).unwrap(), 1.0);
        assert_eq!(determinant(&matrix(&[vec![-3.5]])).unwrap(), -3.5);
        assert_eq!(
            determinant(&matrix(&[vec![1.0, 2.0], vec![3.0, 4.0]])).unwrap(),
            -2.0
        );
    }

    #[test]
    fn test_three_by_three_known_value() {
        let a = matrix(&[
            vec![2.0, 1.0, 1.0],
            vec![1.0, 3.0, 2.0],
            vec![1.0, 0.0, 0.0],
        ]);
        assert_relative_eq!(determinant(&a).unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pivoting_handles_zero_leading_entry() {
        // Without row exchanges the first pivot would be zero.
        let a = matrix(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ]);
        let expected = cofactor_determinant(&[
            vec![0.0, 2.0, 1.0],
            vec![1.0, 1.0, 0.0],
            vec![3.0, 0.0, 1.0],
        ]);
        assert_relative_eq!(determinant(&a).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_matches_cofactor_expansion_on_random_matrices() {
        let mut rng = fastrand::Rng::with_seed(7);
        for n in 3..=6 {
            let rows: Vec<Vec<f64>> = (0..n)
                .map(|_| (0..n).map(|_| rng.f64() * 10.0 - 5.0).collect())
                .collect();
            let expected = cofactor_determinant(&rows);
            let actual = determinant(&matrix(&rows)).unwrap();
            assert_relative_eq!(actual, expected, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_singular_matrix_has_zero_determinant() {
        let a = matrix(&[
            vec![1.0, 2.0, 3.0],
            vec![2.0, 4.0, 6.0],
            vec![0.0, 1.0, 1.0],
        ]);
        assert_eq!(determinant(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_rejects_non_square() {
        let a = matrix(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert!(matches!(
            determinant(&a),
            Err(CramerCoreError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_determinant_is_pure() {
        let a = matrix(&[
            vec![4.0, -2.0, 1.0, 0.5],
            vec![3.0, 6.0, -4.0, 2.0],
            vec![2.0, 1.0, 8.0, -1.0],
            vec![1.0, 0.0, 2.0, 5.0],
        ]);
        let snapshot = a.clone();
        let first = determinant(&a).unwrap();
        let second = determinant(&a).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(a, snapshot);
    }

    #[test]
    fn test_f32_support() {
        let a = DenseMatrix::from_rows(&[vec![2.0_f32, 0.0], vec![0.0, 4.0]]).unwrap();
        assert_eq!(determinant(&a).unwrap(), 8.0_f32);
    }

    fn random_matrix(n: usize, seed: u64) -> DenseMatrix<f64> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let data = (0..n * n).map(|_| rng.f64() * 2.0 - 1.0).collect();
        DenseMatrix::new(n, n, data).unwrap()
    }

    fn scaled_identity(n: usize, scale: f64) -> DenseMatrix<f64> {
        let mut a = DenseMatrix::zeros(n, n);
        for i in 0..n {
            *a.get_mut(i, i).unwrap() = scale;
        }
        a
    }

    #[test]
    fn test_singularity_ratio_is_scale_free() {
        let a = matrix(&[vec![2.0, 1.0], vec![1.0, 3.0]]);
        let scaled = matrix(&[vec![2e-8, 1e-8], vec![1e-8, 3e-8]]);
        let r1 = singularity_ratio(&a, &lu_determinant(&a).unwrap());
        let r2 = singularity_ratio(&scaled, &lu_determinant(&scaled).unwrap());
        assert_relative_eq!(r1, r2, max_relative = 1e-9);
        assert!(r1 > 0.0 && r1 <= 1.0);
    }

    #[test]
    fn test_singularity_ratio_edge_cases() {
        let identity = DenseMatrix::<f64>::identity(4);
        let lu = lu_determinant(&identity).unwrap();
        assert_eq!(singularity_ratio(&identity, &lu), 1.0);

        let empty = DenseMatrix::<f64>::zeros(0, 0);
        let lu = lu_determinant(&empty).unwrap();
        assert_eq!(singularity_ratio(&empty, &lu), 1.0);

        let zero_row = matrix(&[vec![1.0, 2.0], vec![0.0, 0.0]]);
        let lu = lu_determinant(&zero_row).unwrap();
        assert!(lu.determinant.is_zero());
        assert_eq!(singularity_ratio(&zero_row, &lu), 0.0);
    }

    #[test]
    fn test_singularity_ratio_does_not_shrink_with_size() {
        // |det| of these falls far below n * epsilon relative to the row
        // norms, but the pivots stay well away from zero.
        for (n, seed) in [(80, 21), (100, 22), (150, 23)] {
            let a = random_matrix(n, seed);
            let lu = lu_determinant(&a).unwrap();
            let ratio = singularity_ratio(&a, &lu);
            assert!(
                ratio > 1e-8,
                "n = {n}: ratio {ratio:e} too small for a random matrix"
            );
            assert!(ratio <= 1.0);
        }
    }

    #[test]
    fn test_lu_determinant_matches_determinant() {
        for (n, seed) in [(3, 31), (7, 32), (20, 33)] {
            let a = random_matrix(n, seed);
            let lu = lu_determinant(&a).unwrap();
            assert_relative_eq!(
                lu.determinant.value(),
                determinant(&a).unwrap(),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_scaled_determinant_survives_overflow_and_underflow() {
        // 1000^120 = 2^1195.89.. is far beyond f64::MAX.
        let large = lu_determinant(&scaled_identity(120, 1000.0)).unwrap();
        assert_eq!(large.determinant.exponent, 1195);
        assert!(large.determinant.mantissa >= 1.0 && large.determinant.mantissa < 2.0);
        assert_eq!(large.determinant.value(), f64::INFINITY);
        assert_eq!(large.min_pivot, 1000.0);

        // 0.001^120 is far below the smallest subnormal.
        let small = lu_determinant(&scaled_identity(120, 1e-3)).unwrap();
        assert!(!small.determinant.is_zero());
        assert_eq!(small.determinant.exponent, -1196);
        assert_eq!(small.determinant.value(), 0.0);

        // One extra factor of 1000 between 120 and 119 diagonal entries.
        let shorter = lu_determinant(&scaled_identity(119, 1000.0)).unwrap();
        assert_relative_eq!(
            large.determinant.ratio(&shorter.determinant),
            1000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_scaled_determinant_normalisation() {
        let six = ScaledDeterminant::from_value(-6.0_f64);
        assert_eq!(six.mantissa, -1.5);
        assert_eq!(six.exponent, 2);
        assert_eq!(six.value(), -6.0);

        let tiny = ScaledDeterminant::from_value(f64::MIN_POSITIVE / 4.0);
        assert_eq!(tiny.mantissa, 1.0);
        assert_eq!(tiny.exponent, -1024);

        let product = ScaledDeterminant::one().times(3.0_f64).times(-4.0);
        assert_eq!(product.value(), -12.0);
        assert_eq!(ScaledDeterminant::one().times(0.0_f64), ScaledDeterminant::zero());
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(default_tolerance::<f64>(0), f64::EPSILON);
        assert_eq!(default_tolerance::<f64>(4), 4.0 * f64::EPSILON);
    }
}
