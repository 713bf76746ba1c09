//! Kernel configuration structures.

/// Size of one vector element in bytes.
pub const ELEMENT_SIZE_BYTES: usize = std::mem::size_of::<f64>();

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaxpyProblem {
    pub len: usize,
    pub alpha: f64,
}

impl DaxpyProblem {
    pub fn new(len: usize, alpha: f64) -> Self {
        Self { len, alpha }
    }

    /// One multiply and one add per element.
    pub fn flops(&self) -> f64 {
        2.0 * self.len as f64
    }

    /// Bytes streamed by one kernel call: X and Y read, Z written.
    pub fn bytes_moved(&self) -> f64 {
        3.0 * self.len as f64 * ELEMENT_SIZE_BYTES as f64
    }

    /// Integer log2 of the length, as printed in report headers.
    pub fn log2_len(&self) -> u32 {
        self.len.checked_ilog2().unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct KernelProfile {
    pub kernel: String,
    pub problem: DaxpyProblem,
    pub runs: usize,
    pub average_secs: f64,
    pub gflops: f64,
    pub bandwidth_gbps: f64,
}

impl KernelProfile {
    pub fn new(kernel: &str, problem: DaxpyProblem, runs: usize, average_secs: f64) -> Self {
        let (gflops, bandwidth_gbps) = if average_secs > 0.0 {
            (
                problem.flops() / (average_secs * 1.0e9),
                problem.bytes_moved() / (average_secs * 1.0e9),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            kernel: kernel.to_string(),
            problem,
            runs,
            average_secs,
            gflops,
            bandwidth_gbps,
        }
    }
}
