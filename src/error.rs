use thiserror::Error;

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("Invalid constraint {key} = {value}: {reason}")]
    InvalidConstraint {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid food catalog: {0}")]
    InvalidCatalog(String),

    #[error("Food not found: {0}")]
    FoodNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl OptimizerError {
    /// Build an `InvalidConstraint` error for a raw bound value.
    pub fn invalid_constraint(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        OptimizerError::InvalidConstraint {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
