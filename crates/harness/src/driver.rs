//! Report orchestration: a fixed verification example followed by scaled
//! benchmark runs.

use crate::checker::{CheckOutcome, CorrectnessChecker};
use crate::config::BenchConfig;
use crate::timing::TimingHarness;
use anyhow::{anyhow, Result};
use daxpybench_kernels::config::{DaxpyProblem, KernelProfile};
use daxpybench_kernels::daxpy::{DaxpyInputs, DynDaxpyKernel};
use daxpybench_kernels::data::DaxpyBuffers;
use daxpybench_kernels::registry::KernelRegistry;
use ndarray::{aview1, ArrayView1};
use std::io::Write;
use tracing::{info, warn};

/// Inputs of the verification example.
pub const VERIFY_X: [f64; 3] = [1.0, 2.0, 3.0];
pub const VERIFY_Y: [f64; 3] = [11.0, 12.0, 13.0];

const RULE: &str = "=========================================";
const LABEL_WIDTH: usize = 24;

#[derive(Debug, Clone)]
pub struct SizeReport {
    pub problem: DaxpyProblem,
    pub check: CheckOutcome,
    pub reference: KernelProfile,
    pub candidate: KernelProfile,
}

#[derive(Debug, Clone)]
pub enum SizeOutcome {
    Completed(SizeReport),
    AllocationFailed { len: usize, detail: String },
}

impl SizeOutcome {
    pub fn len(&self) -> usize {
        match self {
            SizeOutcome::Completed(report) => report.problem.len,
            SizeOutcome::AllocationFailed { len, .. } => *len,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, SizeOutcome::Completed(_))
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub verification: CheckOutcome,
    pub sizes: Vec<SizeOutcome>,
}

pub struct ReportDriver {
    config: BenchConfig,
    reference: DynDaxpyKernel,
    candidate: DynDaxpyKernel,
    checker: CorrectnessChecker,
    timer: TimingHarness,
}

impl ReportDriver {
    pub fn new(config: BenchConfig) -> Result<Self> {
        Self::with_registry(config, &KernelRegistry::with_default_daxpy_kernels())
    }

    pub fn with_registry(config: BenchConfig, registry: &KernelRegistry) -> Result<Self> {
        let lookup = |name: &str| {
            registry
                .find_daxpy_kernel(name)
                .ok_or_else(|| anyhow!("no daxpy kernel registered as '{name}'"))
        };
        let reference = lookup(&config.reference_kernel)?;
        let candidate = lookup(&config.candidate_kernel)?;

        info!(
            reference = %reference.label(),
            candidate = %candidate.label(),
            runs = config.runs,
            epsilon = config.epsilon,
            "report driver ready"
        );

        Ok(Self {
            checker: CorrectnessChecker::new(config.epsilon),
            timer: TimingHarness::new(config.runs).with_warmup(config.warmup_runs),
            config,
            reference,
            candidate,
        })
    }

    /// Writes the full report: verification, every configured size, and the
    /// closing banner.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<RunSummary> {
        let verification = self.verify_example(out)?;

        let mut sizes = Vec::with_capacity(self.config.sizes.len());
        for &len in &self.config.sizes {
            sizes.push(self.run_size(out, len)?);
        }

        writeln!(out, "\n{RULE}")?;
        writeln!(out, " All tests completed!")?;
        writeln!(out, "{RULE}")?;

        Ok(RunSummary {
            verification,
            sizes,
        })
    }

    /// Runs both kernels once on the literal example and prints the working.
    pub fn verify_example<W: Write>(&self, out: &mut W) -> Result<CheckOutcome> {
        let alpha = self.config.alpha;
        let x = aview1(&VERIFY_X);
        let y = aview1(&VERIFY_Y);

        writeln!(out, "\n{RULE}")?;
        writeln!(out, " PROCESS VERIFICATION")?;
        writeln!(out, "{RULE}")?;

        writeln!(out, "Input:")?;
        writeln!(out, "  A --> {alpha:.1}")?;
        writeln!(out, "  x --> {}", join_one_decimal(x))?;
        writeln!(out, "  y --> {}", join_one_decimal(y))?;

        writeln!(out, "\nProcess (DAXPY: Z = A*X + Y):")?;
        for (i, (&xi, &yi)) in x.iter().zip(y.iter()).enumerate() {
            let expected = alpha * xi + yi;
            writeln!(
                out,
                "  z[{i}] = {alpha:.1} * {xi:.1} + {yi:.1} = {expected:.1}"
            )?;
        }

        let inputs = DaxpyInputs::new(alpha, x, y);
        let z_reference = self.reference.compute(&inputs)?;
        let z_candidate = self.candidate.compute(&inputs)?;

        writeln!(out, "\nOutput ({}):", self.reference.label())?;
        writeln!(out, "  z --> {}", join_one_decimal(z_reference.view()))?;
        writeln!(out, "\nOutput ({}):", self.candidate.label())?;
        writeln!(out, "  z --> {}", join_one_decimal(z_candidate.view()))?;

        let check = self.checker.check(z_reference.view(), z_candidate.view());
        self.write_mismatch(out, &check)?;
        if check.passed() {
            writeln!(
                out,
                "\nCorrectness: PASSED - {} output matches {} output",
                self.candidate.label(),
                self.reference.label()
            )?;
        } else {
            writeln!(out, "\nCorrectness: FAILED")?;
        }

        info!(passed = check.passed(), "verification example checked");
        Ok(check)
    }

    /// Benchmarks one vector length. Allocation failure is reported and
    /// returned as an outcome rather than an error.
    pub fn run_size<W: Write>(&self, out: &mut W, len: usize) -> Result<SizeOutcome> {
        let problem = DaxpyProblem::new(len, self.config.alpha);

        writeln!(out, "\n{RULE}")?;
        writeln!(out, " Vector size n = {len} (2^{})", problem.log2_len())?;
        writeln!(out, "{RULE}")?;

        let mut buffers = match DaxpyBuffers::initialized(len) {
            Ok(buffers) => buffers,
            Err(err) => {
                warn!(n = len, error = %format!("{err:#}"), "buffer allocation failed");
                writeln!(out, "Memory allocation failed.")?;
                return Ok(SizeOutcome::AllocationFailed {
                    len,
                    detail: format!("{err:#}"),
                });
            }
        };
        info!(n = len, "buffers allocated and initialised");

        let inputs = DaxpyInputs::new(problem.alpha, buffers.x.view(), buffers.y.view());
        let (reference, _) =
            self.timer
                .profile_kernel(self.reference.as_ref(), &inputs, &mut buffers.z_reference)?;
        let (candidate, _) =
            self.timer
                .profile_kernel(self.candidate.as_ref(), &inputs, &mut buffers.z_candidate)?;

        let check = self
            .checker
            .check(buffers.z_reference.view(), buffers.z_candidate.view());
        self.write_mismatch(out, &check)?;
        if check.passed() {
            writeln!(
                out,
                "Correctness check: PASSED - {} output is correct",
                self.candidate.label()
            )?;
        } else {
            writeln!(out, "Correctness check: FAILED")?;
        }

        self.write_preview(out, &self.reference.label(), buffers.z_reference.view())?;
        self.write_preview(out, &self.candidate.label(), buffers.z_candidate.view())?;

        writeln!(
            out,
            "\nAverage kernel execution time ({} runs):",
            self.timer.runs()
        )?;
        for (label, profile) in [
            (self.reference.label(), &reference),
            (self.candidate.label(), &candidate),
        ] {
            writeln!(
                out,
                "  {label:<width$} : {:.6} sec",
                profile.average_secs,
                width = LABEL_WIDTH
            )?;
        }

        for profile in [&reference, &candidate] {
            info!(
                kernel = profile.kernel.as_str(),
                n = len,
                average_secs = profile.average_secs,
                gflops = profile.gflops,
                bandwidth_gbps = profile.bandwidth_gbps,
                "kernel profile"
            );
        }

        Ok(SizeOutcome::Completed(SizeReport {
            problem,
            check,
            reference,
            candidate,
        }))
    }

    fn write_mismatch<W: Write>(&self, out: &mut W, check: &CheckOutcome) -> Result<()> {
        match check {
            CheckOutcome::Mismatch(mismatch) => {
                warn!(index = mismatch.index, diff = mismatch.diff, "output mismatch");
                writeln!(out, "{mismatch}")?;
            }
            CheckOutcome::LengthMismatch {
                reference,
                candidate,
            } => {
                warn!(reference, candidate, "output length mismatch");
                writeln!(
                    out,
                    "Length mismatch: ref has {reference} elements, test has {candidate}"
                )?;
            }
            CheckOutcome::Passed { .. } => {}
        }
        Ok(())
    }

    fn write_preview<W: Write>(
        &self,
        out: &mut W,
        label: &str,
        z: ArrayView1<'_, f64>,
    ) -> Result<()> {
        writeln!(out, "{label} result (first {}):", self.config.preview_len)?;
        for (i, value) in z.iter().take(self.config.preview_len).enumerate() {
            writeln!(out, "  Z[{i:2}] = {value:.6}")?;
        }
        Ok(())
    }
}

fn join_one_decimal(values: ArrayView1<'_, f64>) -> String {
    values
        .iter()
        .map(|v| format!("{v:.1}"))
        .collect::<Vec<_>>()
        .join(", ")
}
