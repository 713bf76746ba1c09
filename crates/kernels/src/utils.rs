//! Shared helpers for kernel implementations.

use anyhow::{bail, Context, Result};
use ndarray::{Array1, ArrayView1, ArrayViewMut1};

pub fn validate_daxpy_inputs(
    x: &ArrayView1<'_, f64>,
    y: &ArrayView1<'_, f64>,
    z: &ArrayViewMut1<'_, f64>,
) -> Result<()> {
    if x.len() != y.len() || x.len() != z.len() {
        bail!(
            "daxpy length mismatch: x {} vs y {} vs z {}",
            x.len(),
            y.len(),
            z.len()
        );
    }
    Ok(())
}

/// Allocates a zeroed vector, surfacing allocation failure as an error
/// instead of aborting the process.
pub fn try_zeros(len: usize) -> Result<Array1<f64>> {
    let mut data: Vec<f64> = Vec::new();
    data.try_reserve_exact(len)
        .with_context(|| format!("failed to reserve {len} f64 elements"))?;
    data.resize(len, 0.0);
    Ok(Array1::from_vec(data))
}
