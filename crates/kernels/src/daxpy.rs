//! DAXPY kernels: `z = alpha * x + y`.

use crate::config::DaxpyProblem;
use crate::simd::{daxpy_slices, detect_simd_backend, SimdBackend};
use crate::utils::{try_zeros, validate_daxpy_inputs};
use anyhow::Result;
use ndarray::{Array1, ArrayView1, ArrayViewMut1, Zip};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct DaxpyInputs<'a> {
    pub alpha: f64,
    pub x: ArrayView1<'a, f64>,
    pub y: ArrayView1<'a, f64>,
}

impl<'a> DaxpyInputs<'a> {
    pub fn new(alpha: f64, x: ArrayView1<'a, f64>, y: ArrayView1<'a, f64>) -> Self {
        Self { alpha, x, y }
    }

    pub fn problem(&self) -> DaxpyProblem {
        DaxpyProblem::new(self.x.len(), self.alpha)
    }
}

pub trait DaxpyKernel: Send + Sync {
    /// Registry key.
    fn name(&self) -> &'static str;

    /// Human readable label used in reports.
    fn label(&self) -> String;

    /// Writes `alpha * x + y` into `out`, overwriting its previous contents.
    fn run(&self, inputs: &DaxpyInputs<'_>, out: ArrayViewMut1<'_, f64>) -> Result<()>;

    /// Runs the kernel into a freshly allocated output.
    fn compute(&self, inputs: &DaxpyInputs<'_>) -> Result<Array1<f64>> {
        let mut out = try_zeros(inputs.x.len())?;
        self.run(inputs, out.view_mut())?;
        Ok(out)
    }
}

pub type DynDaxpyKernel = Arc<dyn DaxpyKernel>;

#[derive(Default)]
pub struct ReferenceDaxpy;

impl ReferenceDaxpy {
    pub fn new() -> Self {
        Self
    }
}

impl DaxpyKernel for ReferenceDaxpy {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn label(&self) -> String {
        "Reference kernel".to_string()
    }

    fn run(&self, inputs: &DaxpyInputs<'_>, mut out: ArrayViewMut1<'_, f64>) -> Result<()> {
        validate_daxpy_inputs(&inputs.x, &inputs.y, &out)?;

        let alpha = inputs.alpha;
        Zip::from(&mut out)
            .and(&inputs.x)
            .and(&inputs.y)
            .for_each(|z, &x, &y| *z = alpha * x + y);
        Ok(())
    }
}

/// Hand-vectorized kernel using the widest SIMD backend available.
pub struct SimdDaxpy {
    backend: SimdBackend,
}

impl SimdDaxpy {
    pub fn new() -> Self {
        let backend = detect_simd_backend();
        debug!(%backend, lanes = backend.lanes(), "selected simd backend");
        Self::with_backend(backend)
    }

    /// Pins a specific backend; an unavailable one degrades to scalar code.
    pub fn with_backend(backend: SimdBackend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> SimdBackend {
        self.backend
    }
}

impl Default for SimdDaxpy {
    fn default() -> Self {
        Self::new()
    }
}

impl DaxpyKernel for SimdDaxpy {
    fn name(&self) -> &'static str {
        "simd"
    }

    fn label(&self) -> String {
        format!("SIMD kernel ({})", self.backend)
    }

    fn run(&self, inputs: &DaxpyInputs<'_>, mut out: ArrayViewMut1<'_, f64>) -> Result<()> {
        validate_daxpy_inputs(&inputs.x, &inputs.y, &out)?;

        let alpha = inputs.alpha;
        if let (Some(x), Some(y)) = (inputs.x.as_slice(), inputs.y.as_slice()) {
            if let Some(z) = out.as_slice_mut() {
                daxpy_slices(self.backend, alpha, x, y, z);
                return Ok(());
            }
        }

        // Strided views cannot be loaded lane-wise.
        Zip::from(&mut out)
            .and(&inputs.x)
            .and(&inputs.y)
            .for_each(|z, &x, &y| *z = alpha * x + y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, s, Array1};

    #[test]
    fn both_kernels_match_literal_example() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![11.0, 12.0, 13.0];
        let inputs = DaxpyInputs::new(2.0, x.view(), y.view());

        let reference = ReferenceDaxpy::new().compute(&inputs).expect("reference");
        let simd = SimdDaxpy::new().compute(&inputs).expect("simd");

        assert_eq!(reference, array![13.0, 16.0, 19.0]);
        assert_eq!(simd, array![13.0, 16.0, 19.0]);
    }

    #[test]
    fn simd_matches_reference_on_random_inputs() {
        fastrand::seed(0xDA_C5);
        let reference = ReferenceDaxpy::new();
        let simd = SimdDaxpy::new();

        for _ in 0..50 {
            let len = fastrand::usize(0..5000);
            let alpha = fastrand::f64() * 20.0 - 10.0;
            let x = Array1::from_shape_fn(len, |_| fastrand::f64() * 2.0 - 1.0);
            let y = Array1::from_shape_fn(len, |_| fastrand::f64() * 2.0 - 1.0);
            let inputs = DaxpyInputs::new(alpha, x.view(), y.view());

            let expected = reference.compute(&inputs).expect("reference");
            let actual = simd.compute(&inputs).expect("simd");
            for (e, a) in expected.iter().zip(actual.iter()) {
                assert_abs_diff_eq!(*e, *a, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn simd_handles_strided_views() {
        let x = Array1::from_shape_fn(20, |i| i as f64);
        let y = Array1::from_shape_fn(20, |i| 100.0 - i as f64);
        let x_strided = x.slice(s![..;2]);
        let y_strided = y.slice(s![..;2]);
        let inputs = DaxpyInputs::new(3.0, x_strided, y_strided);

        let expected = ReferenceDaxpy::new().compute(&inputs).expect("reference");
        let actual = SimdDaxpy::new().compute(&inputs).expect("simd");
        assert_eq!(expected, actual);
        assert_eq!(actual[1], 3.0 * 2.0 + 98.0);
    }

    #[test]
    fn run_overwrites_previous_output() {
        let x = array![1.0, 1.0, 1.0, 1.0, 1.0];
        let y = array![0.5, 0.5, 0.5, 0.5, 0.5];
        let inputs = DaxpyInputs::new(2.0, x.view(), y.view());
        let mut out = Array1::from_elem(5, 99.0);

        SimdDaxpy::new().run(&inputs, out.view_mut()).expect("first");
        SimdDaxpy::new().run(&inputs, out.view_mut()).expect("second");
        assert!(out.iter().all(|&v| v == 2.5));
    }

    #[test]
    fn kernels_reject_mismatched_output() {
        let x = array![1.0, 2.0];
        let y = array![3.0, 4.0];
        let inputs = DaxpyInputs::new(1.0, x.view(), y.view());
        let mut out = Array1::zeros(3);

        assert!(ReferenceDaxpy::new().run(&inputs, out.view_mut()).is_err());
        assert!(SimdDaxpy::new().run(&inputs, out.view_mut()).is_err());
    }

    #[test]
    fn simd_label_names_backend() {
        let kernel = SimdDaxpy::with_backend(SimdBackend::Scalar);
        assert_eq!(kernel.label(), "SIMD kernel (Scalar)");
        assert_eq!(kernel.backend(), SimdBackend::Scalar);
    }

    #[test]
    fn inputs_describe_problem() {
        let x = array![1.0, 2.0, 3.0];
        let y = array![1.0, 2.0, 3.0];
        let problem = DaxpyInputs::new(2.0, x.view(), y.view()).problem();
        assert_eq!(problem, DaxpyProblem::new(3, 2.0));
    }
}
