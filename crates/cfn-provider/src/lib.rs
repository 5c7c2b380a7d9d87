//! # cfn-provider
//!
//! [`cfn_core::StackSource`] and [`cfn_core::DriftSource`] implemented by
//! shelling out to `aws cloudformation ... --output json`.
//!
//! Commands are described by an [`AwsCommand`] and executed by a [`Runner`].
//! [`LocalRunner`] spawns the real executable; tests substitute a runner that
//! replays canned JSON.
//!
//! ```rust,no_run
//! use cfn_core::StackSource;
//! use cfn_provider::AwsCliSource;
//!
//! # async fn example() -> cfn_core::Result<()> {
//! let source = AwsCliSource::new().region(Some("eu-west-1".to_string()));
//! let detail = source.describe_stack("payments").await?;
//! println!("{}", detail.summary.status);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod command;
pub mod error;
mod models;
pub mod runner;
pub mod source;

pub use command::AwsCommand;
pub use error::{ProviderError, Result};
pub use runner::{LocalRunner, Runner};
pub use source::AwsCliSource;
