use thiserror::Error;

/// Errors surfaced by fallible `magia` operations.
///
/// Infallible operator routes (`/`, `%`) panic on a zero divisor the way
/// Rust's primitive integers do; every other failure is returned to the
/// caller through one of these variants. Callers rely on discriminating the
/// kinds, so no variant is ever collapsed into another or into a sentinel
/// value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MagiaError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("value {value} is out of range for {context}")]
    OutOfRange {
        value: String,
        context: &'static str,
    },
    #[error("estimated result size overflows the limb counter")]
    Overflow,
    #[error("malformed integer literal {0:?}")]
    Parse(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Barrett reduction input must lie in [0, m^2)")]
    BarrettPrecondition,
}

impl MagiaError {
    pub(crate) fn out_of_range(value: impl ToString, context: &'static str) -> Self {
        MagiaError::OutOfRange {
            value: value.to_string(),
            context,
        }
    }
}
