//! Drift detection orchestration.
//!
//! A run moves through `Requested → InProgress → {Complete, Failed}`:
//!
//! - Requested: detection is started once and its id reported to the observer.
//! - InProgress: status is polled at a fixed interval.
//! - Complete: drifted resources (`MODIFIED` or `DELETED` only) are fetched.
//! - Failed: the provider's reason is returned as [`Error::DriftDetectionFailed`].
//!
//! Status poll failures are retried on the next tick. The optional timeout is
//! measured in polling time, so a virtual [`Timer`] drives it in tests.

use crate::model::{DetectionStatus, DriftDetection, ResourceDrift, ResourceDriftStatus};
use crate::runtime::Timer;
use crate::source::DriftSource;
use crate::{Error, Result};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drift statuses worth reporting
pub const REPORTED_DRIFT_STATUSES: &[ResourceDriftStatus] =
    &[ResourceDriftStatus::Modified, ResourceDriftStatus::Deleted];

/// Drift run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftOptions {
    /// Poll until a terminal state instead of returning after the request
    pub wait: bool,
    /// Delay between status polls
    pub poll_interval: Duration,
    /// Give up after this much polling time (`None` polls forever)
    pub timeout: Option<Duration>,
}

impl Default for DriftOptions {
    fn default() -> Self {
        Self {
            wait: true,
            poll_interval: Duration::from_secs(3),
            timeout: Some(Duration::from_secs(15 * 60)),
        }
    }
}

/// Progress callbacks for a drift run
pub trait DriftObserver {
    /// Detection was requested
    fn started(&mut self, _detection_id: &str) {}

    /// A status poll returned
    fn polled(&mut self, _detection: &DriftDetection) {}
}

impl DriftObserver for () {}

/// Result of a drift run
#[derive(Debug, Clone, PartialEq)]
pub enum DriftOutcome {
    /// Detection was started and not waited on
    Requested {
        /// Detection id to poll manually
        detection_id: String,
    },
    /// Detection completed
    Completed(DriftReport),
}

/// Completed detection plus its drifted resources
#[derive(Debug, Clone, PartialEq)]
pub struct DriftReport {
    /// Terminal detection state
    pub detection: DriftDetection,
    /// Resources whose status is `MODIFIED` or `DELETED`
    pub drifts: Vec<ResourceDrift>,
}

impl DriftReport {
    /// Stack drift status and drifted count header
    pub fn write_header(&self, out: &mut impl Write) -> std::io::Result<()> {
        writeln!(
            out,
            "Stack drift status: {}",
            self.detection.stack_drift_status.as_deref().unwrap_or("UNKNOWN")
        )?;
        writeln!(
            out,
            "Drifted resources:  {}",
            self.detection
                .drifted_resource_count
                .unwrap_or(self.drifts.len() as u32)
        )
    }

    /// Summary rows: logical id, type, drift status, property diff count
    pub fn summary_rows(&self) -> Vec<[String; 4]> {
        self.drifts
            .iter()
            .map(|d| {
                [
                    d.logical_id.clone(),
                    d.resource_type.clone(),
                    d.drift_status.to_string(),
                    format!("{} properties", d.property_differences.len()),
                ]
            })
            .collect()
    }

    /// Per-property detail for every resource with at least one difference
    pub fn write_details(&self, out: &mut impl Write) -> std::io::Result<()> {
        for drift in self.drifts.iter().filter(|d| !d.property_differences.is_empty()) {
            writeln!(out, "\n{} ({}):", drift.logical_id, drift.resource_type)?;
            for diff in &drift.property_differences {
                writeln!(out, "  {:<40} {}", diff.path, diff.difference_type)?;
                writeln!(out, "    Expected: {}", diff.expected)?;
                writeln!(out, "    Actual:   {}", diff.actual)?;
            }
        }
        Ok(())
    }
}

/// Drives one drift detection run for one stack
pub struct DriftOrchestrator<'a, D: ?Sized, T: ?Sized> {
    source: &'a D,
    timer: &'a T,
    options: DriftOptions,
}

impl<'a, D, T> DriftOrchestrator<'a, D, T>
where
    D: DriftSource + ?Sized,
    T: Timer + ?Sized,
{
    /// Create an orchestrator
    pub fn new(source: &'a D, timer: &'a T, options: DriftOptions) -> Self {
        Self {
            source,
            timer,
            options,
        }
    }

    /// Start detection and, if configured to wait, poll it to completion
    pub async fn run(
        &self,
        stack_name: &str,
        observer: &mut dyn DriftObserver,
    ) -> Result<DriftOutcome> {
        let detection = self.start(stack_name).await?;
        observer.started(&detection.detection_id);

        if !self.options.wait {
            return Ok(DriftOutcome::Requested {
                detection_id: detection.detection_id,
            });
        }

        let detection = self.wait(&detection.detection_id, observer).await?;
        let drifts = self
            .source
            .list_resource_drifts(stack_name, REPORTED_DRIFT_STATUSES)
            .await?;
        info!(
            "Drift detection {} found {} drifted resources",
            detection.detection_id,
            drifts.len()
        );
        Ok(DriftOutcome::Completed(DriftReport { detection, drifts }))
    }

    /// Request detection for a stack
    pub async fn start(&self, stack_name: &str) -> Result<DriftDetection> {
        let detection_id = self.source.start_drift_detection(stack_name).await?;
        info!("Started drift detection {} for {}", detection_id, stack_name);
        Ok(DriftDetection::requested(detection_id))
    }

    /// Poll until the detection completes, fails or times out
    pub async fn wait(
        &self,
        detection_id: &str,
        observer: &mut dyn DriftObserver,
    ) -> Result<DriftDetection> {
        let mut waited = Duration::ZERO;
        loop {
            self.timer.sleep(self.options.poll_interval).await;
            waited += self.options.poll_interval;

            match self.source.drift_status(detection_id).await {
                Ok(detection) => {
                    observer.polled(&detection);
                    match detection.status {
                        DetectionStatus::InProgress => {
                            debug!("Drift detection {} still in progress", detection_id)
                        }
                        DetectionStatus::Complete => return Ok(detection),
                        DetectionStatus::Failed => {
                            return Err(Error::DriftDetectionFailed {
                                reason: detection
                                    .reason
                                    .unwrap_or_else(|| "no reason given".to_string()),
                            });
                        }
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!("Failed to get drift status, retrying: {}", e)
                }
                Err(e) => return Err(e),
            }

            if let Some(timeout) = self.options.timeout {
                if waited >= timeout {
                    return Err(Error::DriftTimeout { waited });
                }
            }
        }
    }
}
