//! [`StackSource`] and [`DriftSource`] over the `aws` CLI

use crate::command::AwsCommand;
use crate::error::{ProviderError, Result as ProviderResult};
use crate::models::{
    DescribeStackEventsOutput, DescribeStackResourceDriftsOutput, DescribeStacksOutput,
    DetectStackDriftOutput, DriftDetectionStatusOutput, GetTemplateOutput, ListStackResourcesOutput,
    ListStacksOutput, ValidateTemplateOutput,
};
use crate::runner::{LocalRunner, Runner};
use async_trait::async_trait;
use cfn_core::{
    DriftDetection, DriftSource, ResourceDrift, ResourceDriftStatus, Result, StackDetail,
    StackEvent, StackResource, StackSource, StackSummary, StatusFilterSet, TemplateValidation,
};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Provider access through `aws cloudformation`. The CLI follows pagination
/// itself, so every listing is complete.
#[derive(Debug, Clone, Default)]
pub struct AwsCliSource<R = LocalRunner> {
    runner: R,
    region: Option<String>,
    profile: Option<String>,
}

impl AwsCliSource<LocalRunner> {
    /// Source that spawns the local `aws` executable
    pub fn new() -> Self {
        Self::with_runner(LocalRunner)
    }
}

impl<R: Runner> AwsCliSource<R> {
    /// Source that executes through `runner`
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            region: None,
            profile: None,
        }
    }

    /// Pass `--region` on every call
    pub fn region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    /// Pass `--profile` on every call
    pub fn profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// The underlying runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn command(&self, operation: &str) -> AwsCommand {
        let mut command = AwsCommand::new(operation);
        command
            .region(self.region.as_deref())
            .profile(self.profile.as_deref());
        command
    }

    async fn call<T: DeserializeOwned>(&self, command: &AwsCommand) -> ProviderResult<T> {
        let stdout = self.runner.run(command).await?;
        serde_json::from_slice(&stdout).map_err(|source| ProviderError::Decode {
            operation: command.operation().to_string(),
            source,
        })
    }
}

#[async_trait]
impl<R: Runner> StackSource for AwsCliSource<R> {
    async fn list_stacks(&self, filter: &StatusFilterSet) -> Result<Vec<StackSummary>> {
        let mut command = self.command("list-stacks");
        if !filter.is_unfiltered() {
            command.arg("--stack-status-filter");
            command.args(filter.iter().map(|status| status.as_str().to_string()));
        }

        let output: ListStacksOutput = self.call(&command).await?;
        debug!("list-stacks returned {} stacks", output.stack_summaries.len());
        Ok(output.stack_summaries.into_iter().map(Into::into).collect())
    }

    async fn describe_stack(&self, name: &str) -> Result<StackDetail> {
        let mut command = self.command("describe-stacks");
        command.opt("--stack-name", name);

        let output: DescribeStacksOutput =
            self.call(&command).await.map_err(|e| e.for_stack(name))?;
        output
            .stacks
            .into_iter()
            .next()
            .map(Into::into)
            .ok_or_else(|| cfn_core::Error::StackNotFound(name.to_string()))
    }

    async fn get_template(&self, name: &str) -> Result<String> {
        let mut command = self.command("get-template");
        command
            .opt("--stack-name", name)
            .opt("--template-stage", "Original");

        let output: GetTemplateOutput = self.call(&command).await.map_err(|e| e.for_stack(name))?;
        Ok(output.into_body()?)
    }

    async fn list_events(&self, name: &str, limit: Option<usize>) -> Result<Vec<StackEvent>> {
        let mut command = self.command("describe-stack-events");
        command.opt("--stack-name", name);
        if let Some(limit) = limit {
            command.opt("--max-items", limit.to_string());
        }

        let output: DescribeStackEventsOutput =
            self.call(&command).await.map_err(|e| e.for_stack(name))?;
        let mut events: Vec<StackEvent> = output.stack_events.into_iter().map(Into::into).collect();
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    async fn list_resources(&self, name: &str) -> Result<Vec<StackResource>> {
        let mut command = self.command("list-stack-resources");
        command.opt("--stack-name", name);

        let output: ListStackResourcesOutput =
            self.call(&command).await.map_err(|e| e.for_stack(name))?;
        Ok(output
            .stack_resource_summaries
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn validate_template(&self, body: &str) -> Result<TemplateValidation> {
        let mut command = self.command("validate-template");
        command.opt("--template-body", body);

        let output: ValidateTemplateOutput = self.call(&command).await?;
        Ok(output.into())
    }
}

#[async_trait]
impl<R: Runner> DriftSource for AwsCliSource<R> {
    async fn start_drift_detection(&self, stack_name: &str) -> Result<String> {
        let mut command = self.command("detect-stack-drift");
        command.opt("--stack-name", stack_name);

        let output: DetectStackDriftOutput = self
            .call(&command)
            .await
            .map_err(|e| e.for_stack(stack_name))?;
        Ok(output.stack_drift_detection_id)
    }

    async fn drift_status(&self, detection_id: &str) -> Result<DriftDetection> {
        let mut command = self.command("describe-stack-drift-detection-status");
        command.opt("--stack-drift-detection-id", detection_id);

        let output: DriftDetectionStatusOutput = self.call(&command).await?;
        Ok(DriftDetection::try_from(output)?)
    }

    async fn list_resource_drifts(
        &self,
        stack_name: &str,
        statuses: &[ResourceDriftStatus],
    ) -> Result<Vec<ResourceDrift>> {
        let mut command = self.command("describe-stack-resource-drifts");
        command.opt("--stack-name", stack_name);
        if !statuses.is_empty() {
            command.arg("--stack-resource-drift-status-filters");
            command.args(statuses.iter().map(|status| status.as_str().to_string()));
        }

        let output: DescribeStackResourceDriftsOutput = self
            .call(&command)
            .await
            .map_err(|e| e.for_stack(stack_name))?;
        Ok(output
            .stack_resource_drifts
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
