use thiserror::Error;

/// Failure of a lining solve. No partial result accompanies any variant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// A field is missing, non-finite or out of its physical domain.
    #[error("invalid input {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// Hot-face temperature does not exceed ambient, so there is no bracket.
    #[error("inner temperature {inner} °C must exceed ambient temperature {ambient} °C")]
    DegenerateBracket { ambient: f64, inner: f64 },

    /// Inputs were valid but the surface temperature bracket did not close.
    #[error("could not converge after {iterations} iterations (bracket width {bracket_width} °C)")]
    NonConvergence {
        iterations: usize,
        bracket_width: f64,
    },
}

impl SolveError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
