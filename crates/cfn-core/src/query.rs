//! Stack listing and name/description filtering.

use crate::model::StackSummary;
use crate::source::StackSource;
use crate::status::{StatusFilterSet, StatusFlags};
use crate::template::{self, ResourceSearch};
use crate::Result;
use tracing::debug;

/// Name and description predicates applied to stack summaries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackQuery {
    /// Required substring of the stack name (empty matches everything)
    pub name: String,
    /// Required substring of the template description
    pub desc_contains: Option<String>,
    /// Excluded substring of the template description
    pub desc_excludes: Option<String>,
    /// Compare all predicates case-insensitively
    pub ignore_case: bool,
}

impl StackQuery {
    /// Query matching stacks whose name contains `name`
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether a stack satisfies every active predicate
    pub fn matches(&self, stack: &StackSummary) -> bool {
        if !contains_with_case(&stack.name, &self.name, self.ignore_case) {
            return false;
        }

        let description = stack.description_or_empty();
        if let Some(required) = non_empty(&self.desc_contains) {
            if !contains_with_case(description, required, self.ignore_case) {
                return false;
            }
        }
        if let Some(excluded) = non_empty(&self.desc_excludes) {
            if contains_with_case(description, excluded, self.ignore_case) {
                return false;
            }
        }
        true
    }

    /// Keep matching stacks, preserving input order
    pub fn filter(&self, stacks: impl IntoIterator<Item = StackSummary>) -> Vec<StackSummary> {
        stacks.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Filter stacks by name substring and description inclusion/exclusion
pub fn filter(
    stacks: impl IntoIterator<Item = StackSummary>,
    name: &str,
    desc_contains: &str,
    desc_excludes: &str,
    ignore_case: bool,
) -> Vec<StackSummary> {
    StackQuery {
        name: name.to_string(),
        desc_contains: Some(desc_contains.to_string()),
        desc_excludes: Some(desc_excludes.to_string()),
        ignore_case,
    }
    .filter(stacks)
}

/// Everything that selects stacks for `list`
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Status intents
    pub status: StatusFlags,
    /// Name and description predicates
    pub query: StackQuery,
    /// Resource-level template search, if requested
    pub resource_search: Option<ResourceSearch>,
}

impl QueryOptions {
    /// Status filter to send to the provider.
    ///
    /// A resource search without explicit status flags looks at every stack
    /// the provider will list rather than only the default view.
    pub fn status_filter(&self) -> StatusFilterSet {
        if self.resource_search.is_some() && !self.status.is_explicit() {
            StatusFilterSet::unfiltered()
        } else {
            self.status.resolve()
        }
    }
}

/// List stacks and apply the name/description predicates
pub async fn candidate_stacks<S: StackSource + ?Sized>(
    source: &S,
    options: &QueryOptions,
) -> Result<Vec<StackSummary>> {
    let filter = options.status_filter();
    let stacks = source.list_stacks(&filter).await?;
    let total = stacks.len();
    let candidates = options.query.filter(stacks);
    debug!("{} of {} stacks match name/description filters", candidates.len(), total);
    Ok(candidates)
}

/// Full `list` pipeline: status filter, predicates, then optional template search
pub async fn list_stacks<S: StackSource + ?Sized>(
    source: &S,
    options: &QueryOptions,
) -> Result<Vec<StackSummary>> {
    let candidates = candidate_stacks(source, options).await?;
    match &options.resource_search {
        Some(search) => Ok(template::search_stacks(source, candidates, search).await),
        None => Ok(candidates),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub(crate) fn contains_with_case(haystack: &str, needle: &str, ignore_case: bool) -> bool {
    if ignore_case {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    } else {
        haystack.contains(needle)
    }
}

pub(crate) fn equals_with_case(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}
