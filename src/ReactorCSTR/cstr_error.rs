use thiserror::Error;

/// Errors raised before any solving starts: invalid reactor or reaction data,
/// unknown catalogue entries, unreadable task files.
/// Numerical trouble inside the solver is never reported through this type.
#[derive(Debug, Error)]
pub enum CSTRError {
    #[error("Invalid value of '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Reaction list is empty")]
    EmptyReactionList,

    #[error("Temperature optimisation needs a target product")]
    MissingTargetProduct,

    #[error("Target product '{0}' does not take part in any reaction")]
    UnknownTargetProduct(String),

    #[error("Reaction '{0}' is reversible but has no equilibrium constant")]
    MissingEquilibriumConstant(String),

    #[error("Invalid temperature bounds ({lower}, {upper}) K")]
    InvalidTemperatureBounds { lower: f64, upper: f64 },

    #[error("Invalid operating temperature {0} K")]
    InvalidTemperature(f64),

    #[error("Reaction '{0}' not found in library")]
    ReactionNotFound(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CSTRError {
    pub fn invalid(field: &str, reason: &str) -> Self {
        CSTRError::InvalidParameter {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
