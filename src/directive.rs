//! Configuration directives.
//!
//! Each configuration entry maps a dotted path to a YAML value. Values are
//! normalized once, up front, into a [`Directive`]:
//!
//! | YAML value | Directive |
//! |------------|-----------|
//! | `false` | [`Directive::Delete`] |
//! | `true` | [`Directive::Keep`] |
//! | `{raw: canonical, ...}` | [`Directive::Enumerate`] |
//! | `[raw, {raw: canonical}, ...]` | [`Directive::Enumerate`] |
//! | anything else | [`Directive::Unsupported`] |

use serde_json::Value;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::types::Warning;

/// Ordered raw-value to canonical-value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumMapping {
    entries: Vec<(String, Value)>,
}

impl EnumMapping {
    /// Insert a pair; a repeated raw value keeps its first position.
    pub fn insert(&mut self, raw: impl Into<String>, canonical: Value) {
        let raw = raw.into();
        match self.entries.iter_mut().find(|(k, _)| *k == raw) {
            Some(entry) => entry.1 = canonical,
            None => self.entries.push((raw, canonical)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Canonical values in order; this becomes the `enum` constraint.
    pub fn canonical_values(&self) -> Vec<Value> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    /// Human-readable summary, e.g. `Mappings: 'r' => 'Red', 'g' => 'Green'`.
    pub fn summary(&self) -> String {
        let pairs: Vec<String> = self
            .entries
            .iter()
            .map(|(raw, canonical)| format!("'{}' => '{}'", raw, display_value(canonical)))
            .collect();
        format!("Mappings: {}", pairs.join(", "))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for EnumMapping {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut mapping = EnumMapping::default();
        for (raw, canonical) in iter {
            mapping.insert(raw, canonical);
        }
        mapping
    }
}

/// What to do with the node at a configured path.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Leave the node as-is.
    Keep,
    /// Remove the node from its parent's `properties`.
    Delete,
    /// Restrict the node to the canonical values and document the mapping.
    Enumerate(EnumMapping),
    /// Value shape that has no meaning; reported and skipped.
    Unsupported { actual: &'static str },
}

/// A single configuration entry after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub path: String,
    pub directive: Directive,
}

/// Normalize a loaded configuration into entries, in file order.
///
/// Sequence entries that are neither strings nor mappings are dropped and
/// reported in `warnings`.
pub fn parse_config(config: &Mapping, warnings: &mut Vec<Warning>) -> Vec<ConfigEntry> {
    config
        .iter()
        .map(|(key, value)| {
            let path = yaml_key_string(key);
            let directive = parse_directive(&path, value, warnings);
            ConfigEntry { path, directive }
        })
        .collect()
}

/// Normalize one configuration value.
pub fn parse_directive(path: &str, value: &YamlValue, warnings: &mut Vec<Warning>) -> Directive {
    match value {
        YamlValue::Bool(false) => Directive::Delete,
        YamlValue::Bool(true) => Directive::Keep,
        YamlValue::Mapping(map) => Directive::Enumerate(
            map.iter()
                .map(|(k, v)| (yaml_key_string(k), yaml_to_json(v)))
                .collect(),
        ),
        YamlValue::Sequence(seq) => {
            let mut mapping = EnumMapping::default();
            for item in seq {
                match item {
                    YamlValue::String(s) => mapping.insert(s.clone(), Value::String(s.clone())),
                    YamlValue::Mapping(map) => {
                        for (k, v) in map {
                            mapping.insert(yaml_key_string(k), yaml_to_json(v));
                        }
                    }
                    other => {
                        let warning = Warning::UnsupportedMappingEntry {
                            path: path.to_string(),
                            actual: yaml_type_name(other).to_string(),
                        };
                        tracing::warn!("{}", warning);
                        warnings.push(warning);
                    }
                }
            }
            Directive::Enumerate(mapping)
        }
        YamlValue::Tagged(tagged) => parse_directive(path, &tagged.value, warnings),
        other => Directive::Unsupported {
            actual: yaml_type_name(other),
        },
    }
}

/// Returns the YAML type name for diagnostics.
pub fn yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "sequence",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}

/// Convert a YAML value to JSON. Non-string mapping keys are stringified.
pub fn yaml_to_json(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                // NaN and infinities have no JSON form
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(seq) => Value::Array(seq.iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (yaml_key_string(k), yaml_to_json(v)))
                .collect(),
        ),
        YamlValue::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn yaml_key_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
