//! Errors reported by environment models.
use std::fmt;
use thiserror::Error;

/// Which reference-trajectory table a selector indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Geometric path shape.
    Path,

    /// Speed profile.
    Speed,
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorKind::Path => write!(f, "path"),
            SelectorKind::Speed => write!(f, "speed"),
        }
    }
}

/// Errors of a model step.
///
/// Every variant is a contract violation by the caller or a physically invalid input.
/// None of them is recovered inside a model; the offending step produces no output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A path or speed selector is outside the configured table.
    #[error("invalid {kind} selector {value} at batch index {index}, the table has {len} entries")]
    InvalidSelector {
        /// Table the selector indexes.
        kind: SelectorKind,
        /// Batch index of the first offending element.
        index: usize,
        /// Selector value.
        value: usize,
        /// Number of entries in the table.
        len: usize,
    },

    /// A transition denominator vanished or changed sign at low longitudinal speed.
    #[error("singular transition at batch index {index}: u = {u}, denominator = {denominator}")]
    Singularity {
        /// Batch index of the first offending element.
        index: usize,
        /// Longitudinal speed of the element.
        u: f32,
        /// Offending denominator.
        denominator: f32,
    },

    /// Batch or component dimensions disagree across arguments.
    #[error("shape mismatch in {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Name of the offending argument.
        what: String,
        /// Expected shape.
        expected: Vec<usize>,
        /// Actual shape.
        actual: Vec<usize>,
    },

    /// An input value is NaN or infinite.
    #[error("non-finite {what} at batch index {index}: {value}")]
    NonFinite {
        /// Name of the offending argument.
        what: String,
        /// Batch index of the first offending element.
        index: usize,
        /// Offending value.
        value: f32,
    },
}
