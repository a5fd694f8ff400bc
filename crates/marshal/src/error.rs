use crate::Feature;
use thiserror::Error;

/// A failure to marshal a call, as opposed to a failure of the call itself.
///
/// OS errors are never reported this way; wrappers encode them into their return value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error("{export}: expected {expected} arguments, got {got}")]
    Arity {
        export: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{export}: argument {index} must be {expected}")]
    BadArgument {
        export: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error("{export}: {feature} is not supported on this system")]
    Unsupported {
        export: &'static str,
        feature: Feature,
    },

    #[error("no export named `{0}`")]
    UnknownExport(String),
}
