//! Deterministic input generation and per-run buffer sets.

use crate::utils::try_zeros;
use anyhow::{Context, Result};
use ndarray::{Array1, ArrayViewMut1};

/// Fills `x` and `y` with the reproducible benchmark pattern:
/// `x[i] = (i mod 1000) * 0.001`, `y[i] = ((7 * i) mod 1000) * 0.002`.
pub fn init_data(mut x: ArrayViewMut1<'_, f64>, mut y: ArrayViewMut1<'_, f64>) {
    for (i, value) in x.iter_mut().enumerate() {
        *value = (i % 1000) as f64 * 0.001;
    }
    // (i * 7) mod 1000 == ((i mod 1000) * 7) mod 1000, without overflow.
    for (i, value) in y.iter_mut().enumerate() {
        *value = ((i % 1000) * 7 % 1000) as f64 * 0.002;
    }
}

/// Inputs plus one output per kernel under comparison. Dropping the set
/// releases every buffer.
#[derive(Debug)]
pub struct DaxpyBuffers {
    pub x: Array1<f64>,
    pub y: Array1<f64>,
    pub z_reference: Array1<f64>,
    pub z_candidate: Array1<f64>,
}

impl DaxpyBuffers {
    /// Allocates all four buffers. If any allocation fails the ones already
    /// acquired are dropped before the error is returned.
    pub fn allocate(len: usize) -> Result<Self> {
        let x = try_zeros(len).context("allocating x")?;
        let y = try_zeros(len).context("allocating y")?;
        let z_reference = try_zeros(len).context("allocating reference output")?;
        let z_candidate = try_zeros(len).context("allocating candidate output")?;
        Ok(Self {
            x,
            y,
            z_reference,
            z_candidate,
        })
    }

    /// Allocates and fills the inputs with [`init_data`].
    pub fn initialized(len: usize) -> Result<Self> {
        let mut buffers = Self::allocate(len)?;
        init_data(buffers.x.view_mut(), buffers.y.view_mut());
        Ok(buffers)
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}
