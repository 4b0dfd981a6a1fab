//! Error types for the evolutionary engine.
//!
//! Two categories exist: setup errors (bad configuration, I/O failures
//! during init or persistence) abort the affected operation immediately;
//! evaluation errors are contained per-individual in parallel mode and
//! only propagate in serial mode.

use thiserror::Error;

/// Domain-facing error returned by a [`FitnessFunction`](crate::FitnessFunction).
///
/// Fitness implementations wrap whatever went wrong (simulation blow-up,
/// malformed genotype, backend failure) into a diagnostic message.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct EvalError(pub String);

impl EvalError {
    /// Creates an evaluation error from any displayable cause.
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Invalid configuration detected before the first generation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A fitness evaluation failed unrecoverably (serial mode only;
    /// parallel mode converts failures into the −1 sentinel).
    #[error("fitness evaluation failed for genotype {index}: {source}")]
    Evaluation {
        /// Population index of the failing genotype.
        index: usize,
        /// The underlying evaluation error.
        source: EvalError,
    },

    /// Persistence or log-file I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The worker pool could not be constructed.
    #[error("worker pool: {0}")]
    Pool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_error_display() {
        let e = EvalError::new("simulation diverged");
        assert_eq!(e.to_string(), "simulation diverged");
    }

    #[test]
    fn test_evaluation_error_carries_index() {
        let e = EvolutionError::Evaluation {
            index: 7,
            source: EvalError::new("bad genes"),
        };
        let msg = e.to_string();
        assert!(msg.contains("genotype 7"), "got: {msg}");
        assert!(msg.contains("bad genes"), "got: {msg}");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: EvolutionError = io.into();
        assert!(matches!(e, EvolutionError::Io(_)));
    }
}
