//! # cfn-core
//!
//! Analytical and streaming logic for inspecting CloudFormation stacks.
//!
//! This crate sits between raw provider responses and display. It owns:
//!
//! - status filter resolution and stack name/description filtering ([`status`], [`query`])
//! - structural search of deployed templates ([`template`])
//! - the drift detection state machine ([`drift`])
//! - the live event tail engine ([`tail`])
//!
//! Provider access is abstracted behind the [`StackSource`] and [`DriftSource`]
//! traits, and all waiting goes through a [`runtime::Timer`] so the polling
//! loops can be driven on virtual time.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cfn_core::{query, QueryOptions, StackSource};
//!
//! # async fn example(source: &impl StackSource) -> cfn_core::Result<()> {
//! let options = QueryOptions::default();
//! for stack in query::list_stacks(source, &options).await? {
//!     println!("{} {}", stack.name, stack.status);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod drift;
pub mod model;
pub mod query;
pub mod runtime;
pub mod source;
pub mod status;
pub mod tail;
pub mod template;

pub use drift::{DriftObserver, DriftOptions, DriftOrchestrator, DriftOutcome, DriftReport};
pub use model::{
    DetectionStatus, DriftDetection, PropertyDifference, ResourceDrift, ResourceDriftStatus,
    StackDetail, StackEvent, StackOutput, StackParameter, StackResource, StackSummary, StackTag,
    TemplateParameter, TemplateValidation,
};
pub use query::{QueryOptions, StackQuery};
pub use runtime::{CancellationToken, Timer};
pub use source::{DriftSource, StackSource};
pub use status::{StackStatus, StatusFilterSet, StatusFlags};
pub use tail::{EventTailer, TailCursor, TailOptions};
pub use template::{PropertyFilter, ResourceSearch, TemplateDocument, TemplateValue};

use std::time::Duration;

/// Error types for stack inspection operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Template body is neither JSON nor YAML
    #[error("Template is neither valid JSON ({json}) nor valid YAML ({yaml})")]
    TemplateUnparseable {
        /// JSON parser error
        json: String,
        /// YAML parser error
        yaml: String,
    },

    /// Provider reported a terminal drift detection failure
    #[error("Drift detection failed: {reason}")]
    DriftDetectionFailed {
        /// Reason supplied by the provider
        reason: String,
    },

    /// Drift detection did not reach a terminal state in time
    #[error("Drift detection still in progress after {waited:?}")]
    DriftTimeout {
        /// Time spent polling
        waited: Duration,
    },

    /// Provider or network failure
    #[error("{operation} failed: {message}")]
    Fetch {
        /// Provider operation that failed
        operation: String,
        /// Failure detail
        message: String,
    },

    /// Stack does not exist
    #[error("Stack not found: {0}")]
    StackNotFound(String),

    /// Filter argument could not be parsed
    #[error("Invalid filter: {0}")]
    MalformedFilterInput(String),

    /// Output stream error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a fetch error for a provider operation
    pub fn fetch(operation: impl Into<String>, message: impl ToString) -> Self {
        Self::Fetch {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Whether a polling loop may retry this error on its next tick
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Fetch { .. })
    }
}

/// Result type for stack inspection operations
pub type Result<T> = std::result::Result<T, Error>;
