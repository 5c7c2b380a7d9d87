//! Error types for provider calls

use thiserror::Error;

/// Failure running or decoding an `aws` invocation
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Failed to spawn the process
    #[error("failed to spawn process: {reason}")]
    SpawnFailed {
        /// The reason for the spawn failure
        reason: String,
    },

    /// The executable is not installed or not on `PATH`
    #[error("command not found: {command}")]
    CommandNotFound {
        /// The command that was not found
        command: String,
    },

    /// The CLI exited unsuccessfully
    #[error("{operation} exited with {}: {stderr}", exit_description(.code))]
    CommandFailed {
        /// CloudFormation operation
        operation: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The CLI printed something other than the expected JSON
    #[error("could not decode {operation} response: {source}")]
    Decode {
        /// CloudFormation operation
        operation: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The response decoded but is missing something required
    #[error("unexpected {operation} response: {reason}")]
    InvalidResponse {
        /// CloudFormation operation
        operation: String,
        /// What was wrong
        reason: String,
    },
}

impl ProviderError {
    /// Create a spawn failed error
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self::SpawnFailed {
            reason: reason.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Whether the provider said the named stack does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            ProviderError::CommandFailed { stderr, .. } => stderr.contains("does not exist"),
            _ => false,
        }
    }

    /// Operation the error belongs to, if known
    pub fn operation(&self) -> &str {
        match self {
            ProviderError::CommandFailed { operation, .. }
            | ProviderError::Decode { operation, .. }
            | ProviderError::InvalidResponse { operation, .. } => operation,
            ProviderError::SpawnFailed { .. } | ProviderError::CommandNotFound { .. } => "aws",
        }
    }

    /// Convert for a call about `stack_name`, mapping "does not exist" to
    /// [`cfn_core::Error::StackNotFound`]
    pub fn for_stack(self, stack_name: &str) -> cfn_core::Error {
        if self.is_not_found() {
            cfn_core::Error::StackNotFound(stack_name.to_string())
        } else {
            self.into()
        }
    }
}

impl From<ProviderError> for cfn_core::Error {
    fn from(err: ProviderError) -> Self {
        let operation = err.operation().to_string();
        match err {
            ProviderError::CommandFailed { stderr, .. } => cfn_core::Error::fetch(operation, stderr),
            other => cfn_core::Error::fetch(operation, other),
        }
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "signal".to_string(),
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProviderError>;
