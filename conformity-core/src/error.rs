//! Error and report types for conformance runs.

use std::fmt;
use thiserror::Error;

use crate::data::BiasFactor;

/// The single failure kind of the harness: one of the five checks found
/// an invariant that did not hold for some meta-generated trial.
///
/// Besides the offending value it carries the full tuple that produced
/// the trial (config, generation seed, shrink path, and bias factor),
/// so the failing trial can be reproduced exactly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "check `{check}` failed: {detail}\n  value:  {value}\n  config: {config}\n  seed:   {seed}\n  path:   {path:?}\n  bias:   {bias:?}"
)]
pub struct InvariantViolation {
    /// The check that failed.
    pub check: Check,
    /// What went wrong, in one sentence.
    pub detail: String,
    /// Serialized offending value.
    pub value: String,
    /// Serialized config of the generator instance.
    pub config: String,
    /// Seed the generation source was built from.
    pub seed: u64,
    /// Shrink path of the failing trial.
    pub path: Vec<usize>,
    /// Bias factor of the failing trial, if one was applied.
    pub bias: Option<BiasFactor>,
}

/// Result type for conformance runs.
pub type Result<T> = std::result::Result<T, InvariantViolation>;

/// The five checks the suite runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Equal seeds generate equal root values.
    SameSeedSameValues,
    /// Equal seeds shrink through equal values and stop on the same step.
    SameSeedSameShrinks,
    /// Every visited child is strictly smaller than its parent.
    StrictlyDecreasingShrinkPath,
    /// The root value is valid for the config that produced it.
    GeneratesValidValues,
    /// Every value along a shrink walk is valid for the config.
    ShrinksToValidValues,
}

impl Check {
    /// Human-readable check name.
    pub fn name(&self) -> &'static str {
        match self {
            Check::SameSeedSameValues => "same seed, same values",
            Check::SameSeedSameShrinks => "same seed, same shrinks",
            Check::StrictlyDecreasingShrinkPath => "strictly decreasing shrink path",
            Check::GeneratesValidValues => "generates valid values",
            Check::ShrinksToValidValues => "shrinks to valid values",
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a completed conformance run: one entry per executed check.
///
/// The strict-decrease check only appears when an ordering relation was
/// supplied, so a report holds four or five entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub checks: Vec<CheckReport>,
}

/// Trials completed for one named check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub check: Check,
    pub trials: usize,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.checks.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  ✓ {} passed {} trials.", entry.check, entry.trials)?;
        }
        Ok(())
    }
}
