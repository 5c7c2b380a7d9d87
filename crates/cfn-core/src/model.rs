//! Provider-neutral snapshots of stacks, events, resources and drift results.
//!
//! These are read-only views produced by a [`crate::StackSource`] or
//! [`crate::DriftSource`]; nothing in this crate mutates them.

use crate::status::StackStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a stack as returned by a stack listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackSummary {
    /// Stack name
    pub name: String,
    /// Opaque stack identifier
    pub id: String,
    /// Lifecycle status
    pub status: StackStatus,
    /// Creation time
    pub created: Option<DateTime<Utc>>,
    /// Last update time
    pub last_updated: Option<DateTime<Utc>>,
    /// Template description
    pub description: Option<String>,
}

impl StackSummary {
    /// Template description, empty when the template declares none
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Stack parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackParameter {
    /// Parameter key
    pub key: String,
    /// Supplied value
    pub value: Option<String>,
    /// Value resolved by the provider (SSM parameters)
    pub resolved_value: Option<String>,
    /// Whether the previous value was reused
    pub use_previous_value: bool,
}

/// Stack output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackOutput {
    /// Output key
    pub key: String,
    /// Output value
    pub value: String,
    /// Cross-stack export name
    pub export_name: Option<String>,
    /// Output description
    pub description: Option<String>,
}

/// Stack tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackTag {
    /// Tag key
    pub key: String,
    /// Tag value
    pub value: String,
}

/// Full stack metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackDetail {
    /// Identity, status and timestamps
    pub summary: StackSummary,
    /// Reason for the current status
    pub status_reason: Option<String>,
    /// Whether termination protection is on
    pub termination_protection: bool,
    /// Service role
    pub role_arn: Option<String>,
    /// Last known stack drift status
    pub drift_status: Option<String>,
    /// Parameters
    pub parameters: Vec<StackParameter>,
    /// Outputs
    pub outputs: Vec<StackOutput>,
    /// Tags
    pub tags: Vec<StackTag>,
    /// Acknowledged capabilities
    pub capabilities: Vec<String>,
}

/// One entry of a stack's event log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackEvent {
    /// Unique event identifier
    pub event_id: String,
    /// Event time
    pub timestamp: DateTime<Utc>,
    /// Logical id of the resource the event is about
    pub logical_id: String,
    /// Resource type
    pub resource_type: String,
    /// Resource status after the event
    pub status: String,
    /// Status reason
    pub reason: Option<String>,
}

/// Current state of one stack resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackResource {
    /// Logical id
    pub logical_id: String,
    /// Physical id
    pub physical_id: Option<String>,
    /// Resource type
    pub resource_type: String,
    /// Resource status
    pub status: String,
    /// Last known drift status
    pub drift_status: Option<String>,
}

/// Template parameter reported by template validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    /// Parameter key
    pub key: String,
    /// Default value
    pub default_value: Option<String>,
    /// Whether the value is masked
    pub no_echo: bool,
    /// Parameter description
    pub description: Option<String>,
}

/// Result of a provider-side template validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateValidation {
    /// Template description
    pub description: Option<String>,
    /// Declared parameters
    pub parameters: Vec<TemplateParameter>,
    /// Capabilities required to deploy the template
    pub capabilities: Vec<String>,
    /// Why the capabilities are required
    pub capabilities_reason: Option<String>,
}

/// Progress of a drift detection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionStatus {
    /// Detection is running
    InProgress,
    /// Detection finished
    Complete,
    /// Detection failed
    Failed,
}

impl DetectionStatus {
    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DetectionStatus::InProgress)
    }
}

/// A drift detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftDetection {
    /// Detection identifier
    pub detection_id: String,
    /// Detection progress
    pub status: DetectionStatus,
    /// Provider-supplied reason, set on failure
    pub reason: Option<String>,
    /// Stack-level drift status (`DRIFTED`, `IN_SYNC`, ...)
    pub stack_drift_status: Option<String>,
    /// Number of drifted resources
    pub drifted_resource_count: Option<u32>,
}

impl DriftDetection {
    /// A freshly requested detection
    pub fn requested(detection_id: impl Into<String>) -> Self {
        Self {
            detection_id: detection_id.into(),
            status: DetectionStatus::InProgress,
            reason: None,
            stack_drift_status: None,
            drifted_resource_count: None,
        }
    }
}

/// Drift status of one resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceDriftStatus {
    /// Live state matches the template
    InSync,
    /// Live state differs from the template
    Modified,
    /// Resource no longer exists
    Deleted,
    /// Resource type does not support drift detection
    NotChecked,
    /// Unrecognised token
    Other(String),
}

impl ResourceDriftStatus {
    /// The provider token for this status
    pub fn as_str(&self) -> &str {
        match self {
            ResourceDriftStatus::InSync => "IN_SYNC",
            ResourceDriftStatus::Modified => "MODIFIED",
            ResourceDriftStatus::Deleted => "DELETED",
            ResourceDriftStatus::NotChecked => "NOT_CHECKED",
            ResourceDriftStatus::Other(token) => token,
        }
    }
}

impl From<String> for ResourceDriftStatus {
    fn from(token: String) -> Self {
        match token.as_str() {
            "IN_SYNC" => ResourceDriftStatus::InSync,
            "MODIFIED" => ResourceDriftStatus::Modified,
            "DELETED" => ResourceDriftStatus::Deleted,
            "NOT_CHECKED" => ResourceDriftStatus::NotChecked,
            _ => ResourceDriftStatus::Other(token),
        }
    }
}

impl From<ResourceDriftStatus> for String {
    fn from(status: ResourceDriftStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ResourceDriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One property that differs between template and live state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDifference {
    /// Property path, e.g. `/Tags/0/Value`
    pub path: String,
    /// `ADD`, `REMOVE` or `NOT_EQUAL`
    pub difference_type: String,
    /// Value declared in the template
    pub expected: String,
    /// Live value
    pub actual: String,
}

/// Drift result for one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDrift {
    /// Logical id
    pub logical_id: String,
    /// Resource type
    pub resource_type: String,
    /// Drift status
    pub drift_status: ResourceDriftStatus,
    /// Differing properties
    pub property_differences: Vec<PropertyDifference>,
}
