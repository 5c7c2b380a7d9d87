//! Generic structural tree for parsed templates.

use indexmap::IndexMap;

/// A node of a parsed template.
///
/// Both JSON and YAML templates are converted to this tree. Scalars keep their
/// textual form (`true`, `10`, `1.5`) so filters can compare them as strings.
/// Mapping keys keep document order.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// Explicit null or empty value
    Null,
    /// String, number or boolean, in its string representation
    Scalar(String),
    /// Ordered list
    Sequence(Vec<TemplateValue>),
    /// Ordered string-keyed map
    Mapping(IndexMap<String, TemplateValue>),
}

/// Result of resolving a dotted path against a tree
#[derive(Debug, Clone, PartialEq)]
pub enum PathLookup<'a> {
    /// Every segment resolved
    Found(&'a TemplateValue),
    /// A segment named a key that is not present
    MissingKey(String),
    /// A segment was reached through a value that is not a mapping
    NotAMapping(String),
}

impl TemplateValue {
    /// The scalar text, if this is a scalar
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TemplateValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// The entries, if this is a mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, TemplateValue>> {
        match self {
            TemplateValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Whether this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, TemplateValue::Null)
    }

    /// Look up a direct child key. Always `None` on non-mappings.
    ///
    /// With `ignore_case` the first key equal under case folding wins.
    pub fn get(&self, key: &str, ignore_case: bool) -> Option<&TemplateValue> {
        let map = self.as_mapping()?;
        if ignore_case {
            let wanted = key.to_lowercase();
            map.iter()
                .find(|(k, _)| k.to_lowercase() == wanted)
                .map(|(_, v)| v)
        } else {
            map.get(key)
        }
    }

    /// Resolve a dotted path such as `Versioning.Status`
    pub fn lookup_path(&self, path: &str, ignore_case: bool) -> PathLookup<'_> {
        let mut current = self;
        for segment in path.split('.') {
            if current.as_mapping().is_none() {
                return PathLookup::NotAMapping(segment.to_string());
            }
            match current.get(segment, ignore_case) {
                Some(next) => current = next,
                None => return PathLookup::MissingKey(segment.to_string()),
            }
        }
        PathLookup::Found(current)
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => TemplateValue::Null,
            Value::Bool(b) => TemplateValue::Scalar(b.to_string()),
            Value::Number(n) => TemplateValue::Scalar(n.to_string()),
            Value::String(s) => TemplateValue::Scalar(s),
            Value::Array(items) => {
                TemplateValue::Sequence(items.into_iter().map(TemplateValue::from).collect())
            }
            Value::Object(map) => TemplateValue::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, TemplateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_yaml::Value> for TemplateValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => TemplateValue::Null,
            Value::Bool(b) => TemplateValue::Scalar(b.to_string()),
            Value::Number(n) => TemplateValue::Scalar(n.to_string()),
            Value::String(s) => TemplateValue::Scalar(s),
            Value::Sequence(items) => {
                TemplateValue::Sequence(items.into_iter().map(TemplateValue::from).collect())
            }
            Value::Mapping(map) => TemplateValue::Mapping(
                map.into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, TemplateValue::from(v))))
                    .collect(),
            ),
            // Short-form intrinsics (`!Ref Bucket`, `!Sub ...`) keep only their operand
            Value::Tagged(tagged) => TemplateValue::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;
    match key {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> TemplateValue {
        TemplateValue::from(serde_json::from_str::<serde_json::Value>(text).unwrap())
    }

    #[test]
    fn test_nested_lookup_resolves() {
        let props = json(r#"{"Versioning": {"Status": "Enabled"}}"#);
        assert_eq!(
            props.lookup_path("Versioning.Status", false),
            PathLookup::Found(&TemplateValue::Scalar("Enabled".to_string()))
        );
    }

    #[test]
    fn test_non_mapping_intermediate_is_absent() {
        let props = json(r#"{"Versioning": "Enabled"}"#);
        assert_eq!(
            props.lookup_path("Versioning.Status", false),
            PathLookup::NotAMapping("Status".to_string())
        );
    }

    #[test]
    fn test_missing_key_names_segment() {
        let props = json(r#"{"Versioning": {"Status": "Enabled"}}"#);
        assert_eq!(
            props.lookup_path("Versioning.Mode", false),
            PathLookup::MissingKey("Mode".to_string())
        );
    }

    #[test]
    fn test_case_insensitive_key_scan() {
        let props = json(r#"{"Versioning": {"Status": "Enabled"}}"#);
        assert!(matches!(
            props.lookup_path("versioning.STATUS", true),
            PathLookup::Found(_)
        ));
        assert!(matches!(
            props.lookup_path("versioning.STATUS", false),
            PathLookup::MissingKey(_)
        ));
    }

    #[test]
    fn test_scalars_keep_text_form() {
        let value = json(r#"{"Port": 8080, "Ratio": 1.5, "Public": false}"#);
        assert_eq!(value.get("Port", false).and_then(|v| v.as_scalar()), Some("8080"));
        assert_eq!(value.get("Ratio", false).and_then(|v| v.as_scalar()), Some("1.5"));
        assert_eq!(value.get("Public", false).and_then(|v| v.as_scalar()), Some("false"));
    }

    #[test]
    fn test_yaml_tags_are_unwrapped() {
        let yaml: serde_yaml::Value = serde_yaml::from_str("BucketName: !Ref NameParam\n").unwrap();
        let value = TemplateValue::from(yaml);
        assert_eq!(
            value.get("BucketName", false),
            Some(&TemplateValue::Scalar("NameParam".to_string()))
        );
    }

    #[test]
    fn test_mapping_order_is_preserved() {
        let value = json(r#"{"Zeta": 1, "Alpha": 2, "Mid": 3}"#);
        let keys: Vec<&str> = value.as_mapping().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
    }
}
