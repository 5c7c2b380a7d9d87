//! Collaborator traits for provider access.
//!
//! Implementations are expected to follow pagination transparently and return
//! complete sequences.

use crate::model::{
    DriftDetection, ResourceDrift, ResourceDriftStatus, StackDetail, StackEvent, StackResource,
    StackSummary, TemplateValidation,
};
use crate::status::StatusFilterSet;
use crate::Result;
use async_trait::async_trait;

/// Read access to stacks, templates and event logs
#[async_trait]
pub trait StackSource: Send + Sync {
    /// List stacks whose status is in `filter` (provider default when unfiltered)
    async fn list_stacks(&self, filter: &StatusFilterSet) -> Result<Vec<StackSummary>>;

    /// Full metadata for one stack
    async fn describe_stack(&self, name: &str) -> Result<StackDetail>;

    /// Raw body of the originally deployed template
    async fn get_template(&self, name: &str) -> Result<String>;

    /// Event log, newest first, truncated to `limit` entries when given
    async fn list_events(&self, name: &str, limit: Option<usize>) -> Result<Vec<StackEvent>>;

    /// Current resource states
    async fn list_resources(&self, name: &str) -> Result<Vec<StackResource>>;

    /// Ask the provider to validate a template body
    async fn validate_template(&self, body: &str) -> Result<TemplateValidation>;
}

/// Drift detection operations
#[async_trait]
pub trait DriftSource: Send + Sync {
    /// Start drift detection, returning the detection id
    async fn start_drift_detection(&self, stack_name: &str) -> Result<String>;

    /// Current state of a detection run
    async fn drift_status(&self, detection_id: &str) -> Result<DriftDetection>;

    /// Resource drifts of a stack whose drift status is in `statuses`
    async fn list_resource_drifts(
        &self,
        stack_name: &str,
        statuses: &[ResourceDriftStatus],
    ) -> Result<Vec<ResourceDrift>>;
}
