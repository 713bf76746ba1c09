//! Repeated-call timing for kernels.

use anyhow::Result;
use daxpybench_kernels::config::KernelProfile;
use daxpybench_kernels::daxpy::{DaxpyInputs, DaxpyKernel};
use ndarray::Array1;
use std::time::{Duration, Instant};
use tracing::debug;

/// Per-call durations from one timing run.
#[derive(Debug, Clone, Default)]
pub struct TimingSummary {
    pub samples: Vec<Duration>,
}

impl TimingSummary {
    pub fn runs(&self) -> usize {
        self.samples.len()
    }

    pub fn total(&self) -> Duration {
        self.samples.iter().sum()
    }

    /// Arithmetic mean of the samples in seconds.
    pub fn average_secs(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total().as_secs_f64() / self.samples.len() as f64
    }

    pub fn min(&self) -> Option<Duration> {
        self.samples.iter().min().copied()
    }

    pub fn max(&self) -> Option<Duration> {
        self.samples.iter().max().copied()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TimingHarness {
    runs: usize,
    warmup_runs: usize,
}

impl TimingHarness {
    pub fn new(runs: usize) -> Self {
        Self {
            runs: runs.max(1),
            warmup_runs: 0,
        }
    }

    pub fn with_warmup(mut self, warmup_runs: usize) -> Self {
        self.warmup_runs = warmup_runs;
        self
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Calls `call` once per warmup run untimed, then `runs` times with the
    /// clock read immediately around each call.
    pub fn measure<F>(&self, mut call: F) -> Result<TimingSummary>
    where
        F: FnMut() -> Result<()>,
    {
        for _ in 0..self.warmup_runs {
            call()?;
        }

        let mut samples = Vec::with_capacity(self.runs);
        for _ in 0..self.runs {
            let start = Instant::now();
            call()?;
            samples.push(start.elapsed());
        }

        Ok(TimingSummary { samples })
    }

    /// Times `kernel`, recomputing into `out` on every call.
    pub fn profile_kernel(
        &self,
        kernel: &dyn DaxpyKernel,
        inputs: &DaxpyInputs<'_>,
        out: &mut Array1<f64>,
    ) -> Result<(KernelProfile, TimingSummary)> {
        let summary = self.measure(|| kernel.run(inputs, out.view_mut()))?;
        let profile = KernelProfile::new(
            kernel.name(),
            inputs.problem(),
            summary.runs(),
            summary.average_secs(),
        );

        debug!(
            kernel = kernel.name(),
            n = inputs.x.len(),
            runs = summary.runs(),
            min_secs = summary.min().map(|d| d.as_secs_f64()),
            max_secs = summary.max().map(|d| d.as_secs_f64()),
            average_secs = profile.average_secs,
            "kernel timed"
        );

        Ok((profile, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use daxpybench_kernels::daxpy::{ReferenceDaxpy, SimdDaxpy};
    use daxpybench_kernels::data::DaxpyBuffers;

    #[test]
    fn calls_kernel_warmup_plus_runs_times() {
        let mut calls = 0;
        let summary = TimingHarness::new(5)
            .with_warmup(2)
            .measure(|| {
                calls += 1;
                Ok(())
            })
            .expect("measure");
        assert_eq!(calls, 7);
        assert_eq!(summary.runs(), 5);
    }

    #[test]
    fn zero_runs_clamped_to_one() {
        assert_eq!(TimingHarness::new(0).runs(), 1);
    }

    #[test]
    fn single_run_mean_equals_sample() {
        let summary = TimingHarness::new(1)
            .measure(|| {
                std::hint::black_box((0..1000).sum::<u64>());
                Ok(())
            })
            .expect("measure");
        assert_eq!(summary.samples.len(), 1);
        assert_eq!(summary.average_secs(), summary.samples[0].as_secs_f64());
    }

    #[test]
    fn average_is_finite_and_non_negative() {
        let buffers = DaxpyBuffers::initialized(1024).expect("alloc");
        let inputs = DaxpyInputs::new(2.0, buffers.x.view(), buffers.y.view());
        let mut out = buffers.z_candidate.clone();

        let (profile, summary) = TimingHarness::new(3)
            .profile_kernel(&SimdDaxpy::new(), &inputs, &mut out)
            .expect("profile");
        assert!(profile.average_secs.is_finite());
        assert!(profile.average_secs >= 0.0);
        assert_eq!(profile.runs, 3);
        assert_eq!(profile.kernel, "simd");
        assert!(summary.min() <= summary.max());
        assert_eq!(out[1], 2.0 * buffers.x[1] + buffers.y[1]);
    }

    #[test]
    fn kernel_errors_propagate() {
        let mut calls = 0;
        let result = TimingHarness::new(4).measure(|| {
            calls += 1;
            if calls == 2 {
                bail!("kernel failed");
            }
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(calls, 2);
    }

    #[test]
    fn mismatched_output_fails_profile() {
        let buffers = DaxpyBuffers::initialized(8).expect("alloc");
        let inputs = DaxpyInputs::new(2.0, buffers.x.view(), buffers.y.view());
        let mut out = Array1::zeros(4);
        let result = TimingHarness::new(1).profile_kernel(&ReferenceDaxpy::new(), &inputs, &mut out);
        assert!(result.is_err());
    }
}
