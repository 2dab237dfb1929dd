use std::collections::BTreeMap;

use pipecheck_common::Range;
use serde::Deserialize;

/// A value supplied for a parameter at a call site.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Value {
    /// Name the value is assigned to (the map key at the call site).
    #[serde(default)]
    pub name: String,
    pub value: ValueKind,
    pub range: Range,
}

/// Payload of a [`Value`], one variant per scalar or collection shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String(String),
    Boolean(bool),
    Integer(i64),
    Map(BTreeMap<String, Value>),
    Sequence(Vec<Value>),
}

/// Kind tag of a value, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTag {
    String,
    Boolean,
    Integer,
    Map,
    Sequence,
}

impl ValueKind {
    pub fn tag(&self) -> ValueTag {
        match self {
            ValueKind::String(_) => ValueTag::String,
            ValueKind::Boolean(_) => ValueTag::Boolean,
            ValueKind::Integer(_) => ValueTag::Integer,
            ValueKind::Map(_) => ValueTag::Map,
            ValueKind::Sequence(_) => ValueTag::Sequence,
        }
    }
}

impl ValueTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueTag::String => "string",
            ValueTag::Boolean => "boolean",
            ValueTag::Integer => "integer",
            ValueTag::Map => "map",
            ValueTag::Sequence => "sequence",
        }
    }
}

impl std::fmt::Display for ValueTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn new(name: impl Into<String>, value: ValueKind, range: Range) -> Self {
        Self {
            name: name.into(),
            value,
            range,
        }
    }

    pub fn string(name: impl Into<String>, text: impl Into<String>, range: Range) -> Self {
        Self::new(name, ValueKind::String(text.into()), range)
    }

    pub fn tag(&self) -> ValueTag {
        self.value.tag()
    }

    // Checked projections. Callers turn `None` into a type diagnostic.

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ValueKind::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match &self.value {
            ValueKind::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match &self.value {
            ValueKind::Sequence(items) => Some(items),
            _ => None,
        }
    }
}
