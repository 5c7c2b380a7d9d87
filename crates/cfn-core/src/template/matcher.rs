//! Combinable resource search over a template document.

use super::value::{PathLookup, TemplateValue};
use super::{ResourceDefinition, TemplateDocument};
use crate::query::{contains_with_case, equals_with_case};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// Expected value for a dotted property path, e.g. `Versioning.Status=Enabled`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFilter {
    /// Dotted path below `Properties`
    pub path: String,
    /// Expected value, compared against the property's string form
    pub expected: String,
}

/// How a property filter fared against one resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Value present and equal
    Matched,
    /// Value present but different
    Mismatch {
        /// The value found
        actual: String,
    },
    /// Path could not be resolved to a scalar
    Unresolved {
        /// Why resolution stopped
        reason: String,
    },
}

impl PropertyFilter {
    /// Create a filter
    pub fn new(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Parse every `key=value` argument, failing on the first malformed one
    pub fn parse_all<I, S>(raw: I) -> Result<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| s.as_ref().parse::<PropertyFilter>())
            .collect()
    }

    /// Evaluate against a resource's `Properties` subtree
    pub fn evaluate(&self, properties: Option<&TemplateValue>, ignore_case: bool) -> FilterOutcome {
        let Some(properties) = properties else {
            return FilterOutcome::Unresolved {
                reason: "resource has no Properties".to_string(),
            };
        };

        match properties.lookup_path(&self.path, ignore_case) {
            PathLookup::Found(value) => match value.as_scalar() {
                Some(actual) if equals_with_case(actual, &self.expected, ignore_case) => {
                    FilterOutcome::Matched
                }
                Some(actual) => FilterOutcome::Mismatch {
                    actual: actual.to_string(),
                },
                None if value.is_null() => FilterOutcome::Unresolved {
                    reason: "value is null".to_string(),
                },
                None => FilterOutcome::Unresolved {
                    reason: "value is not a scalar".to_string(),
                },
            },
            PathLookup::MissingKey(segment) => FilterOutcome::Unresolved {
                reason: format!("no key '{}'", segment),
            },
            PathLookup::NotAMapping(segment) => FilterOutcome::Unresolved {
                reason: format!("parent of '{}' is not a mapping", segment),
            },
        }
    }
}

impl FromStr for PropertyFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((path, expected)) if !path.is_empty() => Ok(Self::new(path, expected)),
            _ => Err(Error::MalformedFilterInput(format!(
                "invalid property format {:?}, expected key=value",
                s
            ))),
        }
    }
}

impl fmt::Display for PropertyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.path, self.expected)
    }
}

/// Resource-level search criteria. Empty criteria are inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSearch {
    /// Exact resource type, e.g. `AWS::S3::Bucket`
    pub resource_type: String,
    /// Substring of the logical id
    pub logical_id: String,
    /// Property filters, all of which must match
    pub properties: Vec<PropertyFilter>,
    /// Compare everything case-insensitively
    pub ignore_case: bool,
}

impl ResourceSearch {
    /// Build a search from raw arguments, validating property filters up front
    pub fn new<S: AsRef<str>>(
        resource_type: impl Into<String>,
        logical_id: impl Into<String>,
        properties: &[S],
        ignore_case: bool,
    ) -> Result<Self> {
        Ok(Self {
            resource_type: resource_type.into(),
            logical_id: logical_id.into(),
            properties: PropertyFilter::parse_all(properties)?,
            ignore_case,
        })
    }

    /// Whether any criterion is set
    pub fn is_active(&self) -> bool {
        !self.resource_type.is_empty() || !self.logical_id.is_empty() || !self.properties.is_empty()
    }

    /// Whether one resource satisfies every active criterion.
    ///
    /// Checks run cheapest first: logical id, then type, then properties.
    pub fn matches(&self, resource: &ResourceDefinition<'_>) -> bool {
        if !self.logical_id.is_empty()
            && !contains_with_case(resource.logical_id, &self.logical_id, self.ignore_case)
        {
            return false;
        }

        if !self.resource_type.is_empty() {
            match resource.resource_type {
                Some(t) if equals_with_case(t, &self.resource_type, self.ignore_case) => {}
                _ => return false,
            }
        }

        self.properties.iter().all(|filter| {
            let outcome = filter.evaluate(resource.properties, self.ignore_case);
            trace!("{} on {}: {:?}", filter, resource.logical_id, outcome);
            outcome == FilterOutcome::Matched
        })
    }

    /// Logical id of the first matching resource, in document order
    pub fn find_first<'a>(&self, document: &'a TemplateDocument) -> Option<&'a str> {
        document
            .resource_definitions()
            .find(|resource| self.matches(resource))
            .map(|resource| resource.logical_id)
    }

    /// Parse `body` and return the first matching logical id
    pub fn find_first_in(&self, body: &str) -> Result<Option<String>> {
        let document = TemplateDocument::parse(body)?;
        Ok(self.find_first(&document).map(str::to_string))
    }

    /// Whether `body` contains any matching resource
    pub fn has_match(&self, body: &str) -> Result<bool> {
        Ok(self.find_first_in(body)?.is_some())
    }
}

impl fmt::Display for ResourceSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.logical_id.is_empty(), self.resource_type.is_empty()) {
            (false, false) => write!(
                f,
                "resource {:?} of type {:?}",
                self.logical_id, self.resource_type
            )?,
            (false, true) => write!(f, "resource {:?}", self.logical_id)?,
            (true, false) => write!(f, "resources of type {:?}", self.resource_type)?,
            (true, true) => f.write_str("resources")?,
        }
        if !self.properties.is_empty() {
            f.write_str(" with properties:")?;
            for filter in &self.properties {
                write!(f, " {}", filter)?;
            }
        }
        Ok(())
    }
}

/// Whether `body` declares a resource matching the given filters
pub fn has_match(
    body: &str,
    type_filter: &str,
    name_filter: &str,
    property_filters: &[PropertyFilter],
    ignore_case: bool,
) -> Result<bool> {
    ResourceSearch {
        resource_type: type_filter.to_string(),
        logical_id: name_filter.to_string(),
        properties: property_filters.to_vec(),
        ignore_case,
    }
    .has_match(body)
}
