use thiserror::Error;

/// Rejected node input, reported before any descriptor is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{node}.{input} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        node: &'static str,
        input: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{node}.{input} must be a finite number, got {value}")]
    NotFinite {
        node: &'static str,
        input: &'static str,
        value: f64,
    },
    #[error("unknown node type: {0}")]
    UnknownNode(String),
    #[error("{node} has no input named {input}")]
    UnknownInput { node: &'static str, input: String },
}

pub type Result<T> = std::result::Result<T, ValidationError>;
