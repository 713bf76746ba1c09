//! Fixed benchmark parameters.

/// Timed calls per kernel per vector size.
pub const DEFAULT_RUNS: usize = 30;
/// Absolute tolerance for element-wise comparison.
pub const DEFAULT_EPSILON: f64 = 1e-9;
pub const DEFAULT_ALPHA: f64 = 2.0;
/// Benchmark lengths as powers of two: 2^20, 2^24, 2^28.
pub const DEFAULT_SIZE_EXPONENTS: [u32; 3] = [20, 24, 28];
/// Output elements printed per kernel.
pub const PREVIEW_LEN: usize = 10;

pub const REFERENCE_KERNEL: &str = "reference";
pub const CANDIDATE_KERNEL: &str = "simd";

#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub alpha: f64,
    pub runs: usize,
    pub warmup_runs: usize,
    pub epsilon: f64,
    pub sizes: Vec<usize>,
    pub preview_len: usize,
    pub reference_kernel: String,
    pub candidate_kernel: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            runs: DEFAULT_RUNS,
            warmup_runs: 0,
            epsilon: DEFAULT_EPSILON,
            sizes: DEFAULT_SIZE_EXPONENTS.iter().map(|&e| 1usize << e).collect(),
            preview_len: PREVIEW_LEN,
            reference_kernel: REFERENCE_KERNEL.to_string(),
            candidate_kernel: CANDIDATE_KERNEL.to_string(),
        }
    }
}

impl BenchConfig {
    pub fn with_sizes(mut self, sizes: impl Into<Vec<usize>>) -> Self {
        self.sizes = sizes.into();
        self
    }

    pub fn with_runs(mut self, warmup_runs: usize, runs: usize) -> Self {
        self.warmup_runs = warmup_runs;
        self.runs = runs.max(1);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_kernels(mut self, reference: &str, candidate: &str) -> Self {
        self.reference_kernel = reference.to_string();
        self.candidate_kernel = candidate.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_benchmark() {
        let config = BenchConfig::default();
        assert_eq!(config.sizes, vec![1 << 20, 1 << 24, 1 << 28]);
        assert_eq!(config.runs, 30);
        assert_eq!(config.alpha, 2.0);
        assert_eq!(config.epsilon, 1e-9);
        assert_eq!(config.preview_len, 10);
    }

    #[test]
    fn runs_are_clamped_to_one() {
        let config = BenchConfig::default().with_runs(2, 0).with_epsilon(1e-6);
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.runs, 1);
        assert_eq!(config.warmup_runs, 2);
    }
}
