//! In-memory provider for command tests

use async_trait::async_trait;
use cfn_core::{
    DetectionStatus, DriftDetection, DriftSource, Error, ResourceDrift, ResourceDriftStatus,
    Result, StackDetail, StackEvent, StackResource, StackSource, StackStatus, StackSummary,
    StatusFilterSet, TemplateValidation,
};
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
pub struct StaticSource {
    pub stacks: Vec<StackSummary>,
    pub details: HashMap<String, StackDetail>,
    pub templates: HashMap<String, String>,
    pub events: Vec<StackEvent>,
    pub resources: Vec<StackResource>,
    pub validation: Option<TemplateValidation>,
    /// Successive drift status answers; the last one repeats
    pub drift_polls: Mutex<VecDeque<DriftDetection>>,
    pub drifts: Vec<ResourceDrift>,
    pub validated_bodies: Mutex<Vec<String>>,
    list_calls: Mutex<usize>,
}

impl StaticSource {
    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    fn known(&self, name: &str) -> Result<()> {
        if self.stacks.iter().any(|s| s.name == name) || self.details.contains_key(name) {
            Ok(())
        } else {
            Err(Error::StackNotFound(name.to_string()))
        }
    }
}

#[async_trait]
impl StackSource for StaticSource {
    async fn list_stacks(&self, filter: &StatusFilterSet) -> Result<Vec<StackSummary>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self
            .stacks
            .iter()
            .filter(|s| {
                if filter.is_unfiltered() {
                    s.status != StackStatus::DeleteComplete
                } else {
                    filter.contains(&s.status)
                }
            })
            .cloned()
            .collect())
    }

    async fn describe_stack(&self, name: &str) -> Result<StackDetail> {
        self.details
            .get(name)
            .cloned()
            .ok_or_else(|| Error::StackNotFound(name.to_string()))
    }

    async fn get_template(&self, name: &str) -> Result<String> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::fetch("get-template", "access denied"))
    }

    async fn list_events(&self, name: &str, limit: Option<usize>) -> Result<Vec<StackEvent>> {
        self.known(name)?;
        let mut events = self.events.clone();
        if let Some(limit) = limit {
            events.truncate(limit);
        }
        Ok(events)
    }

    async fn list_resources(&self, name: &str) -> Result<Vec<StackResource>> {
        self.known(name)?;
        Ok(self.resources.clone())
    }

    async fn validate_template(&self, body: &str) -> Result<TemplateValidation> {
        self.validated_bodies.lock().unwrap().push(body.to_string());
        self.validation
            .clone()
            .ok_or_else(|| Error::fetch("validate-template", "Template format error"))
    }
}

#[async_trait]
impl DriftSource for StaticSource {
    async fn start_drift_detection(&self, stack_name: &str) -> Result<String> {
        self.known(stack_name)?;
        Ok("det-1".to_string())
    }

    async fn drift_status(&self, detection_id: &str) -> Result<DriftDetection> {
        let mut polls = self.drift_polls.lock().unwrap();
        let next = if polls.len() > 1 {
            polls.pop_front()
        } else {
            polls.front().cloned()
        };
        next.ok_or_else(|| Error::fetch("describe-stack-drift-detection-status", detection_id))
    }

    async fn list_resource_drifts(
        &self,
        _stack_name: &str,
        statuses: &[ResourceDriftStatus],
    ) -> Result<Vec<ResourceDrift>> {
        Ok(self
            .drifts
            .iter()
            .filter(|d| statuses.contains(&d.drift_status))
            .cloned()
            .collect())
    }
}

pub fn stack(name: &str, status: StackStatus, description: &str) -> StackSummary {
    StackSummary {
        name: name.to_string(),
        id: format!("arn:aws:cloudformation:eu-west-1:123456789012:stack/{}/1", name),
        status,
        created: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).single(),
        last_updated: None,
        description: Some(description.to_string()),
    }
}

pub fn detection(status: DetectionStatus) -> DriftDetection {
    let mut detection = DriftDetection::requested("det-1");
    detection.status = status;
    if status == DetectionStatus::Complete {
        detection.stack_drift_status = Some("DRIFTED".to_string());
        detection.drifted_resource_count = Some(1);
    }
    detection
}
