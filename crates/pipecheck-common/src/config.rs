use std::path::{Path, PathBuf};

use serde::Deserialize;

/// File name searched for when no explicit configuration path is given.
pub const CONFIG_FILE_NAME: &str = "pipecheck.toml";

/// The parsed pipecheck.toml configuration.
#[derive(Debug, Clone, Default)]
pub struct PipecheckConfig {
    pub check: CheckSection,
    pub executors: ExecutorsSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckSection {
    /// Treat warnings as errors when deciding the exit status.
    #[serde(default)]
    pub warnings_as_errors: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorsSection {
    /// Executor names that exist outside the checked document.
    #[serde(default)]
    pub external: Vec<String>,
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    check: CheckSection,
    #[serde(default)]
    executors: ExecutorsSection,
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no pipecheck.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read pipecheck.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid pipecheck.toml: {0}")]
    ParseError(String),
    #[error("invalid pipecheck.toml: [executors] external entry {0} is empty")]
    EmptyExecutorName(usize),
}

/// Walk up from `start_dir` looking for `pipecheck.toml`.
/// Returns the path to the configuration file if found.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load and validate a configuration file from a path.
pub fn load_config(path: &Path) -> Result<PipecheckConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate a configuration from a string.
pub fn parse_config(content: &str) -> Result<PipecheckConfig, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    if let Some(idx) = raw
        .executors
        .external
        .iter()
        .position(|name| name.trim().is_empty())
    {
        return Err(ConfigError::EmptyExecutorName(idx));
    }

    Ok(PipecheckConfig {
        check: raw.check,
        executors: raw.executors,
    })
}

/// Find and load the configuration starting from an input file's directory.
pub fn find_and_load_config(input_file: &Path) -> Result<PipecheckConfig, ConfigError> {
    let start_dir = input_file.parent().unwrap_or_else(|| Path::new("."));
    let config_path = find_config(start_dir)
        .ok_or_else(|| ConfigError::NotFound(start_dir.display().to_string()))?;
    load_config(&config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(!config.check.warnings_as_errors);
        assert!(config.executors.external.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[check]
warnings_as_errors = true

[executors]
external = ["docker-large", "macos-xcode"]
"#;
        let config = parse_config(toml).unwrap();
        assert!(config.check.warnings_as_errors);
        assert_eq!(config.executors.external, vec!["docker-large", "macos-xcode"]);
    }

    #[test]
    fn invalid_toml_fails() {
        let err = parse_config("[check\nwarnings_as_errors = 1").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn wrong_field_type_fails() {
        let err = parse_config("[check]\nwarnings_as_errors = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn empty_external_executor_fails() {
        let toml = r#"
[executors]
external = ["ok", "  "]
"#;
        let err = parse_config(toml).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyExecutorName(1)));
        assert!(err.to_string().contains("entry 1 is empty"));
    }

    #[test]
    fn find_config_walks_up() {
        let tmp = std::env::temp_dir().join("pipecheck_test_config");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(tmp.join(".circleci/nested")).unwrap();
        std::fs::write(tmp.join(CONFIG_FILE_NAME), "[check]\nwarnings_as_errors = true\n")
            .unwrap();

        let found = find_config(&tmp.join(".circleci/nested"));
        assert!(found.is_some());
        assert_eq!(found.unwrap(), tmp.join(CONFIG_FILE_NAME));

        let config = find_and_load_config(&tmp.join(".circleci/nested/config.json")).unwrap();
        assert!(config.check.warnings_as_errors);

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
