//! Wire records for `aws cloudformation ... --output json` responses.

use crate::error::{ProviderError, Result};
use cfn_core::{
    DetectionStatus, DriftDetection, PropertyDifference, ResourceDrift, ResourceDriftStatus,
    StackDetail, StackEvent, StackOutput, StackParameter, StackResource, StackSummary, StackTag,
    TemplateParameter, TemplateValidation,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListStacksOutput {
    #[serde(default)]
    pub stack_summaries: Vec<WireStackSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireStackSummary {
    pub stack_id: String,
    pub stack_name: String,
    pub template_description: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub stack_status: String,
}

impl From<WireStackSummary> for StackSummary {
    fn from(wire: WireStackSummary) -> Self {
        StackSummary {
            name: wire.stack_name,
            id: wire.stack_id,
            status: wire.stack_status.into(),
            created: wire.creation_time,
            last_updated: wire.last_updated_time,
            description: wire.template_description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeStacksOutput {
    #[serde(default)]
    pub stacks: Vec<WireStack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireStack {
    pub stack_id: String,
    pub stack_name: String,
    pub description: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub last_updated_time: Option<DateTime<Utc>>,
    pub stack_status: String,
    pub stack_status_reason: Option<String>,
    #[serde(default)]
    pub parameters: Vec<WireParameter>,
    #[serde(default)]
    pub outputs: Vec<WireOutput>,
    #[serde(default)]
    pub tags: Vec<WireTag>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(rename = "RoleARN")]
    pub role_arn: Option<String>,
    pub enable_termination_protection: Option<bool>,
    pub drift_information: Option<WireStackDriftInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireParameter {
    pub parameter_key: String,
    pub parameter_value: Option<String>,
    pub use_previous_value: Option<bool>,
    pub resolved_value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireOutput {
    pub output_key: String,
    pub output_value: Option<String>,
    pub description: Option<String>,
    pub export_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireTag {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireStackDriftInformation {
    pub stack_drift_status: Option<String>,
}

impl From<WireStack> for StackDetail {
    fn from(wire: WireStack) -> Self {
        StackDetail {
            summary: StackSummary {
                name: wire.stack_name,
                id: wire.stack_id,
                status: wire.stack_status.into(),
                created: wire.creation_time,
                last_updated: wire.last_updated_time,
                description: wire.description,
            },
            status_reason: wire.stack_status_reason,
            termination_protection: wire.enable_termination_protection.unwrap_or(false),
            role_arn: wire.role_arn,
            drift_status: wire.drift_information.and_then(|d| d.stack_drift_status),
            parameters: wire
                .parameters
                .into_iter()
                .map(|p| StackParameter {
                    key: p.parameter_key,
                    value: p.parameter_value,
                    resolved_value: p.resolved_value,
                    use_previous_value: p.use_previous_value.unwrap_or(false),
                })
                .collect(),
            outputs: wire
                .outputs
                .into_iter()
                .map(|o| StackOutput {
                    key: o.output_key,
                    value: o.output_value.unwrap_or_default(),
                    export_name: o.export_name,
                    description: o.description,
                })
                .collect(),
            tags: wire
                .tags
                .into_iter()
                .map(|t| StackTag {
                    key: t.key,
                    value: t.value,
                })
                .collect(),
            capabilities: wire.capabilities,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetTemplateOutput {
    pub template_body: serde_json::Value,
}

impl GetTemplateOutput {
    /// The body as text. JSON templates come back as an object and are
    /// re-serialized; YAML templates are already a string.
    pub fn into_body(self) -> Result<String> {
        match self.template_body {
            serde_json::Value::String(body) => Ok(body),
            serde_json::Value::Null => Err(ProviderError::invalid_response(
                "get-template",
                "TemplateBody is missing",
            )),
            document => serde_json::to_string_pretty(&document).map_err(|source| {
                ProviderError::Decode {
                    operation: "get-template".to_string(),
                    source,
                }
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeStackEventsOutput {
    #[serde(default)]
    pub stack_events: Vec<WireEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireEvent {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub logical_resource_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_status: Option<String>,
    pub resource_status_reason: Option<String>,
}

impl From<WireEvent> for StackEvent {
    fn from(wire: WireEvent) -> Self {
        StackEvent {
            event_id: wire.event_id,
            timestamp: wire.timestamp,
            logical_id: wire.logical_resource_id.unwrap_or_default(),
            resource_type: wire.resource_type.unwrap_or_default(),
            status: wire.resource_status.unwrap_or_default(),
            reason: wire.resource_status_reason,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ListStackResourcesOutput {
    #[serde(default)]
    pub stack_resource_summaries: Vec<WireResourceSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireResourceSummary {
    pub logical_resource_id: String,
    pub physical_resource_id: Option<String>,
    pub resource_type: String,
    pub resource_status: String,
    pub drift_information: Option<WireResourceDriftInformation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireResourceDriftInformation {
    pub stack_resource_drift_status: Option<String>,
}

impl From<WireResourceSummary> for StackResource {
    fn from(wire: WireResourceSummary) -> Self {
        StackResource {
            logical_id: wire.logical_resource_id,
            physical_id: wire.physical_resource_id,
            resource_type: wire.resource_type,
            status: wire.resource_status,
            drift_status: wire
                .drift_information
                .and_then(|d| d.stack_resource_drift_status),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ValidateTemplateOutput {
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<WireTemplateParameter>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    pub capabilities_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireTemplateParameter {
    pub parameter_key: String,
    pub default_value: Option<String>,
    pub no_echo: Option<bool>,
    pub description: Option<String>,
}

impl From<ValidateTemplateOutput> for TemplateValidation {
    fn from(wire: ValidateTemplateOutput) -> Self {
        TemplateValidation {
            description: wire.description,
            parameters: wire
                .parameters
                .into_iter()
                .map(|p| TemplateParameter {
                    key: p.parameter_key,
                    default_value: p.default_value,
                    no_echo: p.no_echo.unwrap_or(false),
                    description: p.description,
                })
                .collect(),
            capabilities: wire.capabilities,
            capabilities_reason: wire.capabilities_reason,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DetectStackDriftOutput {
    pub stack_drift_detection_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DriftDetectionStatusOutput {
    pub stack_drift_detection_id: String,
    pub stack_drift_status: Option<String>,
    pub detection_status: String,
    pub detection_status_reason: Option<String>,
    pub drifted_stack_resource_count: Option<u32>,
}

impl TryFrom<DriftDetectionStatusOutput> for DriftDetection {
    type Error = ProviderError;

    fn try_from(wire: DriftDetectionStatusOutput) -> Result<Self> {
        let status = match wire.detection_status.as_str() {
            "DETECTION_IN_PROGRESS" => DetectionStatus::InProgress,
            "DETECTION_COMPLETE" => DetectionStatus::Complete,
            "DETECTION_FAILED" => DetectionStatus::Failed,
            other => {
                return Err(ProviderError::invalid_response(
                    "describe-stack-drift-detection-status",
                    format!("unknown DetectionStatus {:?}", other),
                ));
            }
        };

        Ok(DriftDetection {
            detection_id: wire.stack_drift_detection_id,
            status,
            reason: wire.detection_status_reason,
            stack_drift_status: wire.stack_drift_status,
            drifted_resource_count: wire.drifted_stack_resource_count,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeStackResourceDriftsOutput {
    #[serde(default)]
    pub stack_resource_drifts: Vec<WireResourceDrift>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WireResourceDrift {
    pub logical_resource_id: String,
    pub resource_type: String,
    pub stack_resource_drift_status: String,
    #[serde(default)]
    pub property_differences: Vec<WirePropertyDifference>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WirePropertyDifference {
    pub property_path: String,
    pub expected_value: Option<String>,
    pub actual_value: Option<String>,
    pub difference_type: String,
}

impl From<WireResourceDrift> for ResourceDrift {
    fn from(wire: WireResourceDrift) -> Self {
        ResourceDrift {
            logical_id: wire.logical_resource_id,
            resource_type: wire.resource_type,
            drift_status: ResourceDriftStatus::from(wire.stack_resource_drift_status),
            property_differences: wire
                .property_differences
                .into_iter()
                .map(|d| PropertyDifference {
                    path: d.property_path,
                    difference_type: d.difference_type,
                    expected: d.expected_value.unwrap_or_default(),
                    actual: d.actual_value.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfn_core::StackStatus;

    #[test]
    fn test_describe_stacks_decoding() {
        let json = r#"{
            "Stacks": [{
                "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/payments/1",
                "StackName": "payments",
                "Description": "Payments API",
                "Parameters": [
                    {"ParameterKey": "Env", "ParameterValue": "prod"},
                    {"ParameterKey": "Image", "UsePreviousValue": true},
                    {"ParameterKey": "AmiId", "ParameterValue": "/ami/latest", "ResolvedValue": "ami-123"}
                ],
                "CreationTime": "2024-01-15T10:00:00.000Z",
                "LastUpdatedTime": "2024-02-01T08:30:12.345000+00:00",
                "StackStatus": "UPDATE_COMPLETE",
                "Capabilities": ["CAPABILITY_IAM"],
                "Outputs": [{"OutputKey": "Url", "OutputValue": "https://example.com", "ExportName": "payments-url"}],
                "RoleARN": "arn:aws:iam::123456789012:role/deployer",
                "Tags": [{"Key": "team", "Value": "billing"}],
                "EnableTerminationProtection": true,
                "DriftInformation": {"StackDriftStatus": "IN_SYNC"}
            }]
        }"#;

        let output: DescribeStacksOutput = serde_json::from_str(json).unwrap();
        let detail = StackDetail::from(output.stacks.into_iter().next().unwrap());

        assert_eq!(detail.summary.status, StackStatus::UpdateComplete);
        assert_eq!(detail.summary.description.as_deref(), Some("Payments API"));
        assert!(detail.summary.last_updated.is_some());
        assert!(detail.termination_protection);
        assert_eq!(detail.role_arn.as_deref(), Some("arn:aws:iam::123456789012:role/deployer"));
        assert_eq!(detail.drift_status.as_deref(), Some("IN_SYNC"));
        assert!(detail.parameters[1].use_previous_value);
        assert_eq!(detail.parameters[1].value, None);
        assert_eq!(detail.parameters[2].resolved_value.as_deref(), Some("ami-123"));
        assert_eq!(detail.outputs[0].export_name.as_deref(), Some("payments-url"));
        assert_eq!(detail.tags[0].value, "billing");
    }

    #[test]
    fn test_template_body_object_is_reserialized_in_order() {
        let output: GetTemplateOutput = serde_json::from_str(
            r#"{"TemplateBody": {"Resources": {"Zeta": {"Type": "T"}, "Alpha": {"Type": "T"}}}, "StagesAvailable": ["Original"]}"#,
        )
        .unwrap();
        let body = output.into_body().unwrap();
        assert!(body.find("Zeta").unwrap() < body.find("Alpha").unwrap());
        let reparsed: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(reparsed["Resources"]["Alpha"]["Type"], "T");
    }

    #[test]
    fn test_template_body_string_passes_through() {
        let output: GetTemplateOutput =
            serde_json::from_str(r#"{"TemplateBody": "Resources:\n  A:\n    Type: T\n"}"#).unwrap();
        assert_eq!(output.into_body().unwrap(), "Resources:\n  A:\n    Type: T\n");
    }

    #[test]
    fn test_detection_status_mapping() {
        let wire: DriftDetectionStatusOutput = serde_json::from_str(
            r#"{"StackId": "x", "StackDriftDetectionId": "d-1", "DetectionStatus": "DETECTION_FAILED",
                "DetectionStatusReason": "Failed to detect drift on resource Logs", "Timestamp": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let detection = DriftDetection::try_from(wire).unwrap();
        assert_eq!(detection.status, DetectionStatus::Failed);
        assert_eq!(
            detection.reason.as_deref(),
            Some("Failed to detect drift on resource Logs")
        );

        let unknown = DriftDetectionStatusOutput {
            stack_drift_detection_id: "d-2".to_string(),
            stack_drift_status: None,
            detection_status: "SOMETHING_NEW".to_string(),
            detection_status_reason: None,
            drifted_stack_resource_count: None,
        };
        assert!(DriftDetection::try_from(unknown).is_err());
    }

    #[test]
    fn test_resource_drift_decoding() {
        let output: DescribeStackResourceDriftsOutput = serde_json::from_str(
            r#"{"StackResourceDrifts": [{
                "StackId": "x", "LogicalResourceId": "Logs", "ResourceType": "AWS::S3::Bucket",
                "StackResourceDriftStatus": "MODIFIED",
                "PropertyDifferences": [{"PropertyPath": "/VersioningConfiguration/Status",
                    "ExpectedValue": "Enabled", "ActualValue": "Suspended", "DifferenceType": "NOT_EQUAL"}]
            }]}"#,
        )
        .unwrap();
        let drift = ResourceDrift::from(output.stack_resource_drifts.into_iter().next().unwrap());
        assert_eq!(drift.drift_status, ResourceDriftStatus::Modified);
        assert_eq!(drift.property_differences[0].actual, "Suspended");
    }
}
