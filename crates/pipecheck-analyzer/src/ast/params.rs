use pipecheck_common::Range;
use serde::Deserialize;

/// Declared type of a parameter, as written in a `parameters:` block.
///
/// ```yaml
/// parameters:
///   flavor:
///     type: enum
///     enum: [small, large]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamType {
    String,
    Boolean,
    Integer,
    /// Enumeration of allowed literal values.
    Enum {
        #[serde(default, rename = "enum")]
        values: Vec<String>,
    },
    Executor,
    Steps,
    EnvVarName,
}

/// Fieldless projection of [`ParamType`] used for comparisons and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    String,
    Boolean,
    Integer,
    Enum,
    Executor,
    Steps,
    EnvVarName,
}

impl ParamType {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamType::String => ParamKind::String,
            ParamType::Boolean => ParamKind::Boolean,
            ParamType::Integer => ParamKind::Integer,
            ParamType::Enum { .. } => ParamKind::Enum,
            ParamType::Executor => ParamKind::Executor,
            ParamType::Steps => ParamKind::Steps,
            ParamType::EnvVarName => ParamKind::EnvVarName,
        }
    }
}

impl ParamKind {
    /// Name of the kind as it appears in configuration source.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Boolean => "boolean",
            ParamKind::Integer => "integer",
            ParamKind::Enum => "enum",
            ParamKind::Executor => "executor",
            ParamKind::Steps => "steps",
            ParamKind::EnvVarName => "env_var_name",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter declared by a command, job, executor, or the pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeclaredParam {
    pub name: String,
    #[serde(flatten)]
    pub ty: ParamType,
    /// True when the declaration carries a default value.
    #[serde(default)]
    pub optional: bool,
    /// Range of the declaration itself.
    #[serde(default)]
    pub range: Range,
}

impl DeclaredParam {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
            range: Range::default(),
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn kind(&self) -> ParamKind {
        self.ty.kind()
    }

    /// Allowed values of an enum parameter; `None` for every other kind.
    pub fn enum_values(&self) -> Option<&[String]> {
        match &self.ty {
            ParamType::Enum { values } => Some(values),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_projection() {
        let param = DeclaredParam::new(
            "flavor",
            ParamType::Enum {
                values: vec!["a".into()],
            },
        );
        assert_eq!(param.kind(), ParamKind::Enum);
        assert_eq!(param.enum_values(), Some(&["a".to_string()][..]));
        assert_eq!(DeclaredParam::new("x", ParamType::Steps).enum_values(), None);
    }

    #[test]
    fn kind_names_match_source_spelling() {
        assert_eq!(ParamKind::EnvVarName.to_string(), "env_var_name");
        assert_eq!(ParamKind::Boolean.as_str(), "boolean");
    }

    #[test]
    fn deserialize_enum_declaration() {
        let json = r#"{
            "name": "flavor",
            "type": "enum",
            "enum": ["small", "large"],
            "optional": true
        }"#;
        let param: DeclaredParam = serde_json::from_str(json).unwrap();
        assert!(param.optional);
        assert_eq!(
            param.ty,
            ParamType::Enum {
                values: vec!["small".into(), "large".into()]
            }
        );
        assert!(param.range.is_default());
    }

    #[test]
    fn deserialize_env_var_name() {
        let param: DeclaredParam =
            serde_json::from_str(r#"{"name": "token", "type": "env_var_name"}"#).unwrap();
        assert_eq!(param.kind(), ParamKind::EnvVarName);
        assert!(!param.optional);
    }
}
