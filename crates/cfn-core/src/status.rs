//! Stack lifecycle statuses and status filter resolution.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

macro_rules! stack_statuses {
    ($($variant:ident => $token:literal,)+) => {
        /// Lifecycle status of a stack
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum StackStatus {
            $(
                #[doc = concat!("`", $token, "`")]
                $variant,
            )+
            /// Status token this build does not know about
            Other(String),
        }

        impl StackStatus {
            /// Every known status, in declaration order
            pub const ALL: &'static [StackStatus] = &[$(StackStatus::$variant,)+];

            /// The provider token for this status
            pub fn as_str(&self) -> &str {
                match self {
                    $(StackStatus::$variant => $token,)+
                    StackStatus::Other(token) => token,
                }
            }
        }

        impl From<String> for StackStatus {
            fn from(token: String) -> Self {
                match token.as_str() {
                    $($token => StackStatus::$variant,)+
                    _ => StackStatus::Other(token),
                }
            }
        }
    };
}

stack_statuses! {
    CreateInProgress => "CREATE_IN_PROGRESS",
    CreateFailed => "CREATE_FAILED",
    CreateComplete => "CREATE_COMPLETE",
    RollbackInProgress => "ROLLBACK_IN_PROGRESS",
    RollbackFailed => "ROLLBACK_FAILED",
    RollbackComplete => "ROLLBACK_COMPLETE",
    DeleteInProgress => "DELETE_IN_PROGRESS",
    DeleteFailed => "DELETE_FAILED",
    DeleteComplete => "DELETE_COMPLETE",
    UpdateInProgress => "UPDATE_IN_PROGRESS",
    UpdateCompleteCleanupInProgress => "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
    UpdateComplete => "UPDATE_COMPLETE",
    UpdateFailed => "UPDATE_FAILED",
    UpdateRollbackInProgress => "UPDATE_ROLLBACK_IN_PROGRESS",
    UpdateRollbackFailed => "UPDATE_ROLLBACK_FAILED",
    UpdateRollbackCompleteCleanupInProgress => "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
    UpdateRollbackComplete => "UPDATE_ROLLBACK_COMPLETE",
    ReviewInProgress => "REVIEW_IN_PROGRESS",
    ImportInProgress => "IMPORT_IN_PROGRESS",
    ImportComplete => "IMPORT_COMPLETE",
    ImportRollbackInProgress => "IMPORT_ROLLBACK_IN_PROGRESS",
    ImportRollbackFailed => "IMPORT_ROLLBACK_FAILED",
    ImportRollbackComplete => "IMPORT_ROLLBACK_COMPLETE",
}

impl From<&str> for StackStatus {
    fn from(token: &str) -> Self {
        StackStatus::from(token.to_string())
    }
}

impl From<StackStatus> for String {
    fn from(status: StackStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const SUCCESS_COMPLETE: &[StackStatus] = &[
    StackStatus::CreateComplete,
    StackStatus::UpdateComplete,
    StackStatus::RollbackComplete,
    StackStatus::UpdateRollbackComplete,
    StackStatus::ImportComplete,
    StackStatus::ImportRollbackComplete,
];

const DELETED: &[StackStatus] = &[
    StackStatus::DeleteInProgress,
    StackStatus::DeleteFailed,
    StackStatus::DeleteComplete,
];

const IN_PROGRESS: &[StackStatus] = &[
    StackStatus::CreateInProgress,
    StackStatus::DeleteInProgress,
    StackStatus::RollbackInProgress,
    StackStatus::UpdateInProgress,
    StackStatus::UpdateCompleteCleanupInProgress,
    StackStatus::UpdateRollbackInProgress,
    StackStatus::UpdateRollbackCompleteCleanupInProgress,
    StackStatus::ReviewInProgress,
    StackStatus::ImportInProgress,
    StackStatus::ImportRollbackInProgress,
];

/// Status selection flags as given by the operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    /// Everything the provider lists by default
    pub all: bool,
    /// `*_COMPLETE` statuses, including `DELETE_COMPLETE`
    pub complete: bool,
    /// `DELETE_*` statuses
    pub deleted: bool,
    /// `*_IN_PROGRESS` statuses
    pub in_progress: bool,
}

impl StatusFlags {
    /// Whether the operator asked for anything beyond the default view
    pub fn is_explicit(&self) -> bool {
        self.all || self.complete || self.deleted || self.in_progress
    }

    /// Resolve the flags to the status tokens to request from the provider
    pub fn resolve(&self) -> StatusFilterSet {
        resolve(self.all, self.complete, self.deleted, self.in_progress)
    }
}

/// Set of statuses to request from the provider.
///
/// An empty set means no filter: the provider default applies, which is every
/// status except `DELETE_COMPLETE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilterSet {
    statuses: BTreeSet<StackStatus>,
}

impl StatusFilterSet {
    /// The "no filter" set
    pub fn unfiltered() -> Self {
        Self::default()
    }

    /// Whether the provider default applies
    pub fn is_unfiltered(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Whether a status is explicitly requested
    pub fn contains(&self, status: &StackStatus) -> bool {
        self.statuses.contains(status)
    }

    /// Requested statuses in stable order
    pub fn iter(&self) -> impl Iterator<Item = &StackStatus> {
        self.statuses.iter()
    }

    /// Number of requested statuses
    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    /// Whether no statuses are requested
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Whether every status in `self` is also in `other`
    pub fn is_subset(&self, other: &StatusFilterSet) -> bool {
        self.statuses.is_subset(&other.statuses)
    }

    /// Union of two sets
    pub fn union(&self, other: &StatusFilterSet) -> StatusFilterSet {
        StatusFilterSet {
            statuses: self.statuses.union(&other.statuses).cloned().collect(),
        }
    }
}

impl FromIterator<StackStatus> for StatusFilterSet {
    fn from_iter<I: IntoIterator<Item = StackStatus>>(iter: I) -> Self {
        Self {
            statuses: iter.into_iter().collect(),
        }
    }
}

/// Map the operator's status intents to a concrete status filter.
///
/// `all` wins over everything else. With no flag set the result is the
/// successful `*_COMPLETE` statuses. Otherwise the statuses named by each
/// requested flag are unioned.
pub fn resolve(all: bool, complete: bool, deleted: bool, in_progress: bool) -> StatusFilterSet {
    if all {
        return StatusFilterSet::unfiltered();
    }

    if !complete && !deleted && !in_progress {
        return SUCCESS_COMPLETE.iter().cloned().collect();
    }

    let mut statuses = BTreeSet::new();
    if complete {
        statuses.extend(SUCCESS_COMPLETE.iter().cloned());
        statuses.insert(StackStatus::DeleteComplete);
    }
    if deleted {
        statuses.extend(DELETED.iter().cloned());
    }
    if in_progress {
        statuses.extend(IN_PROGRESS.iter().cloned());
    }
    StatusFilterSet { statuses }
}
