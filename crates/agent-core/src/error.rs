//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Stable error code for wire responses
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ToolNotFound(_) => "TOOL_NOT_FOUND",
            Self::ToolValidation(_) => "INVALID_ARGUMENTS",
            Self::ToolExecution(_) => "TOOL_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            Self::ToolExecution(msg) => format!("Tool error: {msg}"),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = AgentError::ToolNotFound("predict_crypto".into());
        assert_eq!(err.user_message(), "The tool 'predict_crypto' is not available.");
        assert_eq!(err.code(), "TOOL_NOT_FOUND");

        let err: AgentError = anyhow::anyhow!("boom").into();
        assert_eq!(err.to_string(), "boom");
    }
}
