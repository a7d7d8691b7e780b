use crate::error::{CramerCoreError, Result};
use crate::traits::{Matrix, Scalar};

/// Represents a dense matrix stored in row-major order on the CPU.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: Copy + Send + Sync + std::fmt::Debug + Default + bytemuck::Pod> {
    rows: usize,
    cols: usize,
    data: Vec<T>, // Data stored row-major: data[row * cols + col]
}

impl<T: Copy + Send + Sync + std::fmt::Debug + Default + bytemuck::Pod> DenseMatrix<T> {
    /// Creates a new DenseMatrix from raw data, dimensions, assuming row-major order.
    pub fn new(rows: usize, cols: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Data length ({}) does not match dimensions ({}x{})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Creates a DenseMatrix from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(CramerCoreError::DimensionMismatch(format!(
                    "Row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Creates a new DenseMatrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Returns a slice view of the underlying data vector.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns a mutable slice view of the underlying data vector.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Gets the element at the specified row and column (immutable).
    /// Returns None if indices are out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// Gets the element at the specified row and column (mutable).
    /// Returns None if indices are out of bounds.
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.rows && col < self.cols {
            self.data.get_mut(row * self.cols + col)
        } else {
            None
        }
    }

    /// Iterates over the rows as slices.
    pub fn row_iter(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks() rejects a zero size; a matrix without columns has no data anyway.
        self.data.chunks(self.cols.max(1)).take(self.rows)
    }

    /// Returns a fresh copy of this matrix with column `col` replaced by `column`.
    ///
    /// The copy owns its own storage, so it can be handed to another thread while
    /// the original is still being read elsewhere.
    pub fn with_column_replaced(&self, col: usize, column: &[T]) -> Result<Self> {
        if col >= self.cols {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Column index {} out of bounds for {}x{} matrix",
                col, self.rows, self.cols
            )));
        }
        if column.len() != self.rows {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Replacement column length ({}) must match matrix rows ({})",
                column.len(),
                self.rows
            )));
        }
        let mut replaced = self.clone();
        for (row, &value) in column.iter().enumerate() {
            replaced.data[row * self.cols + col] = value;
        }
        Ok(replaced)
    }
}

impl<T: Scalar> DenseMatrix<T> {
    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = T::one();
        }
        m
    }

    /// Computes the matrix-vector product `y = self * x`.
    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.cols {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "Vector length ({}) must match matrix columns ({})",
                x.len(),
                self.cols
            )));
        }
        Ok(self
            .row_iter()
            .map(|row| {
                row.iter()
                    .zip(x)
                    .fold(T::zero(), |acc, (&a, &xi)| acc + a * xi)
            })
            .collect())
    }

    /// Returns the infinity norm of the residual `self * x - b`.
    ///
    /// A NaN anywhere in the residual makes the norm NaN.
    pub fn residual_norm(&self, x: &[T], b: &[T]) -> Result<T> {
        if b.len() != self.rows {
            return Err(CramerCoreError::DimensionMismatch(format!(
                "RHS length ({}) must match matrix rows ({})",
                b.len(),
                self.rows
            )));
        }
        let ax = self.mul_vec(x)?;
        Ok(ax
            .iter()
            .zip(b)
            .fold(T::zero(), |max, (&lhs, &rhs)| {
                let r = (lhs - rhs).abs();
                // `Float::max` would discard a NaN.
                if r > max || r.is_nan() {
                    r
                } else {
                    max
                }
            }))
    }

    /// Checks that every entry is finite (no NaN or infinity).
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}

// Implement the generic Matrix trait
impl<T: Copy + Send + Sync + std::fmt::Debug + Default + bytemuck::Pod> Matrix for DenseMatrix<T> {
    type Value = T;

    fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    // rows(), cols(), is_square() are provided by default impls in the trait
}
