use std::error::Error;

use rayon::prelude::*;

/// Matrix row of the depot. Site `id` lives at row `id + 1`.
pub const DEPOT_ROW: usize = 0;

/// A dense n×n travel matrix in row-major order.
///
/// The same representation holds raw distances (km) and, after cost
/// conversion, monetary costs. Lookups are directional; nothing here assumes
/// symmetry.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    size: usize,
}

impl Matrix {
    /// Creates a matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Builds a matrix from provider-style nested rows, rejecting ragged or
    /// non-square input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, Box<dyn Error>> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(format!(
                    "matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    size
                )
                .into());
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Travel value from row `from` to row `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    pub fn set(&mut self, from: usize, to: usize, value: f64) {
        self.data[from * self.size + to] = value;
    }

    /// The full outgoing row for location `from`.
    pub fn row(&self, from: usize) -> &[f64] {
        &self.data[from * self.size..(from + 1) * self.size]
    }

    /// Number of locations covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Element-wise transformation, evaluated in parallel.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64 + Sync,
    {
        Matrix {
            data: self.data.par_iter().map(|&v| f(v)).collect(),
            size: self.size,
        }
    }

    /// Copies the matrix back out as nested rows (cache and backup format).
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.size).map(|i| self.row(i).to_vec()).collect()
    }
}
