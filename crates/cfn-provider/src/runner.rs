//! Executing `aws` invocations

use crate::command::AwsCommand;
use crate::error::{ProviderError, Result};
use async_process::Stdio;
use async_trait::async_trait;
use std::io::ErrorKind;
use tracing::{debug, trace};

/// Runs an [`AwsCommand`] and returns its standard output
#[async_trait]
pub trait Runner: Send + Sync {
    /// Execute `command` to completion.
    ///
    /// A non-zero exit is [`ProviderError::CommandFailed`] carrying stderr.
    async fn run(&self, command: &AwsCommand) -> Result<Vec<u8>>;
}

/// Runner that spawns a local process
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalRunner;

#[async_trait]
impl Runner for LocalRunner {
    async fn run(&self, command: &AwsCommand) -> Result<Vec<u8>> {
        debug!("Running {}", command);

        let mut cmd = command.prepare();
        cmd.stdin(Stdio::null());

        let output = cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => ProviderError::CommandNotFound {
                command: command.get_program().to_string(),
            },
            _ => ProviderError::spawn_failed(format!(
                "Failed to spawn {}: {}",
                command.get_program(),
                e
            )),
        })?;

        if !output.status.success() {
            return Err(ProviderError::CommandFailed {
                operation: command.operation().to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        trace!("{} returned {} bytes", command.operation(), output.stdout.len());
        Ok(output.stdout)
    }
}
