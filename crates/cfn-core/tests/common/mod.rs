//! Shared fakes for cfn-core integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use cfn_core::{
    CancellationToken, DetectionStatus, DriftDetection, DriftSource, Error, ResourceDrift,
    ResourceDriftStatus, Result, StackDetail, StackEvent, StackResource, StackSource,
    StackStatus, StackSummary, StatusFilterSet, TemplateValidation, Timer,
};
use chrono::{TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// Timer that returns immediately and records what was asked of it
#[derive(Default)]
pub struct VirtualTimer {
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualTimer {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Timer for VirtualTimer {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// Scripted provider
#[derive(Default)]
pub struct FakeSource {
    pub stacks: Vec<StackSummary>,
    /// Template body per stack; missing stacks fail to fetch
    pub templates: HashMap<String, String>,
    /// Newest-first log used to answer the seed request
    pub seed_events: Vec<StackEvent>,
    /// Responses for successive full event fetches
    pub event_polls: Mutex<VecDeque<std::result::Result<Vec<StackEvent>, String>>>,
    /// Cancelled once `event_polls` runs dry
    pub cancel_when_drained: Option<CancellationToken>,
    /// Responses for successive drift status polls; empty means in progress
    pub drift_polls: Mutex<VecDeque<std::result::Result<DetectionStatus, String>>>,
    pub failure_reason: Option<String>,
    pub drifts: Vec<ResourceDrift>,
    pub calls: Mutex<Vec<String>>,
    pub requested_filters: Mutex<Vec<StatusFilterSet>>,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StackSource for FakeSource {
    async fn list_stacks(&self, filter: &StatusFilterSet) -> Result<Vec<StackSummary>> {
        self.record("list_stacks".to_string());
        self.requested_filters.lock().unwrap().push(filter.clone());
        Ok(self
            .stacks
            .iter()
            .filter(|s| match filter.is_unfiltered() {
                // provider default hides deleted stacks
                true => s.status != StackStatus::DeleteComplete,
                false => filter.contains(&s.status),
            })
            .cloned()
            .collect())
    }

    async fn describe_stack(&self, name: &str) -> Result<StackDetail> {
        Err(Error::StackNotFound(name.to_string()))
    }

    async fn get_template(&self, name: &str) -> Result<String> {
        self.record(format!("get_template {}", name));
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| Error::fetch("get-template", "access denied"))
    }

    async fn list_events(&self, name: &str, limit: Option<usize>) -> Result<Vec<StackEvent>> {
        self.record(format!("list_events {} {:?}", name, limit));
        if let Some(limit) = limit {
            return Ok(self.seed_events.iter().take(limit).cloned().collect());
        }

        let mut polls = self.event_polls.lock().unwrap();
        let next = polls.pop_front();
        if polls.is_empty() {
            if let Some(token) = &self.cancel_when_drained {
                token.cancel();
            }
        }
        match next {
            Some(Ok(events)) => Ok(events),
            Some(Err(message)) => Err(Error::fetch("describe-stack-events", message)),
            None => Ok(Vec::new()),
        }
    }

    async fn list_resources(&self, _name: &str) -> Result<Vec<StackResource>> {
        Ok(Vec::new())
    }

    async fn validate_template(&self, _body: &str) -> Result<TemplateValidation> {
        Ok(TemplateValidation::default())
    }
}

#[async_trait]
impl DriftSource for FakeSource {
    async fn start_drift_detection(&self, stack_name: &str) -> Result<String> {
        self.record(format!("start_drift_detection {}", stack_name));
        Ok("detection-1".to_string())
    }

    async fn drift_status(&self, detection_id: &str) -> Result<DriftDetection> {
        self.record(format!("drift_status {}", detection_id));
        let next = self.drift_polls.lock().unwrap().pop_front();
        let status = match next {
            Some(Ok(status)) => status,
            Some(Err(message)) => {
                return Err(Error::fetch("describe-stack-drift-detection-status", message));
            }
            None => DetectionStatus::InProgress,
        };
        Ok(DriftDetection {
            detection_id: detection_id.to_string(),
            status,
            reason: match status {
                DetectionStatus::Failed => self.failure_reason.clone(),
                _ => None,
            },
            stack_drift_status: match status {
                DetectionStatus::Complete => Some("DRIFTED".to_string()),
                _ => None,
            },
            drifted_resource_count: match status {
                DetectionStatus::Complete => Some(self.drifts.len() as u32),
                _ => None,
            },
        })
    }

    async fn list_resource_drifts(
        &self,
        stack_name: &str,
        statuses: &[ResourceDriftStatus],
    ) -> Result<Vec<ResourceDrift>> {
        self.record(format!("list_resource_drifts {}", stack_name));
        Ok(self
            .drifts
            .iter()
            .filter(|d| statuses.contains(&d.drift_status))
            .cloned()
            .collect())
    }
}

pub fn stack(name: &str, status: StackStatus) -> StackSummary {
    StackSummary {
        name: name.to_string(),
        id: format!("arn:aws:cloudformation:us-east-1:123456789012:stack/{}/abc", name),
        status,
        created: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        last_updated: None,
        description: None,
    }
}

pub fn event(id: &str, second: u32) -> StackEvent {
    StackEvent {
        event_id: id.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, second).unwrap(),
        logical_id: format!("Res{}", id),
        resource_type: "AWS::Lambda::Function".to_string(),
        status: "UPDATE_IN_PROGRESS".to_string(),
        reason: None,
    }
}

pub fn resource_drift(logical_id: &str, status: ResourceDriftStatus) -> ResourceDrift {
    ResourceDrift {
        logical_id: logical_id.to_string(),
        resource_type: "AWS::S3::Bucket".to_string(),
        drift_status: status,
        property_differences: Vec::new(),
    }
}
