//! Element-wise correctness checking against a reference output.

use crate::config::DEFAULT_EPSILON;
use ndarray::ArrayView1;
use std::fmt;

/// First element whose deviation exceeds the tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub index: usize,
    pub reference: f64,
    pub candidate: f64,
    pub diff: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mismatch at index {}: ref={:.15} test={:.15} diff={:.3e}",
            self.index, self.reference, self.candidate, self.diff
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Passed { max_abs_error: f64 },
    Mismatch(Mismatch),
    LengthMismatch { reference: usize, candidate: usize },
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, CheckOutcome::Passed { .. })
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            CheckOutcome::Mismatch(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CorrectnessChecker {
    epsilon: f64,
}

impl Default for CorrectnessChecker {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl CorrectnessChecker {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Scans in index order and stops at the first element with
    /// `|reference - candidate| > epsilon`. A NaN difference counts as a
    /// mismatch.
    pub fn check(
        &self,
        reference: ArrayView1<'_, f64>,
        candidate: ArrayView1<'_, f64>,
    ) -> CheckOutcome {
        if reference.len() != candidate.len() {
            return CheckOutcome::LengthMismatch {
                reference: reference.len(),
                candidate: candidate.len(),
            };
        }

        let mut max_abs_error = 0.0f64;
        for (index, (&r, &c)) in reference.iter().zip(candidate.iter()).enumerate() {
            let diff = (r - c).abs();
            if diff > self.epsilon || diff.is_nan() {
                return CheckOutcome::Mismatch(Mismatch {
                    index,
                    reference: r,
                    candidate: c,
                    diff,
                });
            }
            max_abs_error = max_abs_error.max(diff);
        }

        CheckOutcome::Passed { max_abs_error }
    }
}

/// Largest absolute element-wise difference over the common prefix.
pub fn max_abs_diff(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
