//! Deployed template parsing and resource search.
//!
//! Templates are parsed fresh for each search into a [`TemplateDocument`] and
//! searched by resource type, logical id and property values. A stack whose
//! template cannot be fetched or parsed is left out of a multi-stack search
//! rather than failing it.

mod matcher;
mod value;

pub use matcher::{FilterOutcome, PropertyFilter, ResourceSearch, has_match};
pub use value::{PathLookup, TemplateValue};

use crate::model::StackSummary;
use crate::source::StackSource;
use crate::{Error, Result};
use indexmap::IndexMap;
use tracing::debug;

/// A parsed template
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateDocument {
    root: TemplateValue,
}

/// One entry of a template's `Resources` section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceDefinition<'a> {
    /// Logical id
    pub logical_id: &'a str,
    /// Declared `Type`, if it is a scalar
    pub resource_type: Option<&'a str>,
    /// `Properties` subtree
    pub properties: Option<&'a TemplateValue>,
}

impl TemplateDocument {
    /// Parse a template body, trying JSON first and YAML second.
    ///
    /// The document root must be a mapping.
    pub fn parse(body: &str) -> Result<Self> {
        let json_err = match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value) => return Self::from_root(TemplateValue::from(value), "not a JSON object"),
            Err(e) => e.to_string(),
        };

        match serde_yaml::from_str::<serde_yaml::Value>(body) {
            Ok(value) => Self::from_root(TemplateValue::from(value), "not a YAML mapping")
                .map_err(|_| Error::TemplateUnparseable {
                    json: json_err,
                    yaml: "document root is not a mapping".to_string(),
                }),
            Err(e) => Err(Error::TemplateUnparseable {
                json: json_err,
                yaml: e.to_string(),
            }),
        }
    }

    fn from_root(root: TemplateValue, what: &str) -> Result<Self> {
        if root.as_mapping().is_none() {
            return Err(Error::TemplateUnparseable {
                json: what.to_string(),
                yaml: what.to_string(),
            });
        }
        Ok(Self { root })
    }

    /// The whole tree
    pub fn root(&self) -> &TemplateValue {
        &self.root
    }

    /// Template `Description`, if present
    pub fn description(&self) -> Option<&str> {
        self.root.get("Description", false).and_then(TemplateValue::as_scalar)
    }

    /// The `Resources` mapping, if the template has one
    pub fn resources(&self) -> Option<&IndexMap<String, TemplateValue>> {
        self.root.get("Resources", false).and_then(TemplateValue::as_mapping)
    }

    /// Resource definitions in document order. Entries that are not mappings are skipped.
    pub fn resource_definitions(&self) -> impl Iterator<Item = ResourceDefinition<'_>> {
        self.resources()
            .into_iter()
            .flat_map(|resources| resources.iter())
            .filter(|(_, definition)| definition.as_mapping().is_some())
            .map(|(logical_id, definition)| ResourceDefinition {
                logical_id,
                resource_type: definition.get("Type", false).and_then(TemplateValue::as_scalar),
                properties: definition.get("Properties", false),
            })
    }
}

/// Keep the stacks whose deployed template contains a resource matching `search`.
///
/// Input order is preserved. Fetch and parse failures exclude the stack.
pub async fn search_stacks<S: StackSource + ?Sized>(
    source: &S,
    stacks: Vec<StackSummary>,
    search: &ResourceSearch,
) -> Vec<StackSummary> {
    let mut matching = Vec::new();
    for stack in stacks {
        let body = match source.get_template(&stack.name).await {
            Ok(body) => body,
            Err(e) => {
                debug!("Skipping stack {}: {}", stack.name, e);
                continue;
            }
        };

        match search.find_first_in(&body) {
            Ok(Some(logical_id)) => {
                debug!("Stack {} matches via resource {}", stack.name, logical_id);
                matching.push(stack);
            }
            Ok(None) => {}
            Err(e) => debug!("Skipping stack {}: {}", stack.name, e),
        }
    }
    matching
}
