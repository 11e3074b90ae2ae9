use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::project::Project;

/// Viewport and scroll-policy tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Growth (in entries) of a single update that forces a jump to the tail
    pub burst_threshold: usize,
    /// Rows materialized above the viewport
    pub overscan_top: u16,
    /// Rows materialized below the viewport
    pub overscan_bottom: u16,
    /// Max rows advanced per frame while following output (0 = adaptive)
    pub follow_step: u16,
    /// Paint cadence of the event loop in milliseconds
    pub frame_interval_ms: u64,
    /// Namespace prefix for row keys
    pub row_key_prefix: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            burst_threshold: 5,
            overscan_top: 0,
            overscan_bottom: 30,
            follow_step: 0,
            frame_interval_ms: 16,
            row_key_prefix: "l-".to_string(),
        }
    }
}

/// Where the external editor service listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub host: String,
    pub port: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { host: "localhost".to_string(), port: 3001 }
    }
}

/// Settings for the JSONL history source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub poll_interval_ms: u64,
    pub backlog_page_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { poll_interval_ms: 250, backlog_page_size: 200 }
    }
}

/// `[logging.file]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileLoggingConfig {
    pub enabled: bool,
    pub level: String,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self { enabled: false, level: "debug".to_string() }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub file: FileLoggingConfig,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "warn".to_string(), format: "pretty".to_string(), file: FileLoggingConfig::default() }
    }
}

/// Root configuration structure for tailview.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub viewer: ViewerConfig,
    pub editor: EditorConfig,
    pub source: SourceConfig,
    pub logging: LoggingConfig,
    pub projects: Vec<Project>,
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.viewer.burst_threshold == 0 {
            return Err(Error::Config(ConfigError::OutOfRange("viewer.burst_threshold".to_string()).to_string()));
        }

        if self.viewer.row_key_prefix.is_empty() {
            return Err(Error::Config(ConfigError::Empty("viewer.row_key_prefix".to_string()).to_string()));
        }

        if self.editor.host.trim().is_empty() {
            return Err(Error::Config(ConfigError::Empty("editor.host".to_string()).to_string()));
        }

        if self.editor.port == 0 {
            return Err(Error::Config(ConfigError::OutOfRange("editor.port".to_string()).to_string()));
        }

        if self.source.backlog_page_size == 0 {
            return Err(Error::Config(
                ConfigError::OutOfRange("source.backlog_page_size".to_string()).to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !seen.insert(project.id.as_str()) {
                return Err(Error::Config(ConfigError::DuplicateProject(project.id.to_string()).to_string()));
            }
        }

        Ok(())
    }

    /// Get example configuration (as a string)
    pub fn example() -> &'static str {
        r#"# tailview configuration

[viewer]
# Growth of a single update (in entries) that forces a jump to the newest entry
burst_threshold = 5
# Rows rendered off-screen above / below the viewport
overscan_top = 0
overscan_bottom = 30
# Max rows advanced per frame while following output (0 = adaptive)
follow_step = 0
frame_interval_ms = 16
row_key_prefix = "l-"

[editor]
# Local code-server endpoint used for the editor panel
host = "localhost"
port = 3001

[source]
poll_interval_ms = 250
backlog_page_size = 200

[logging]
level = "warn"
format = "pretty"

[logging.file]
enabled = false
level = "debug"

# [[projects]]
# id = "b1f0c4"
# name = "tailview"
"#
    }
}

/// Configuration-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Numeric value outside its valid range
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// Required string left empty
    #[error("value must not be empty: {0}")]
    Empty(String),

    /// Two projects share an id
    #[error("duplicate project id: {0}")]
    DuplicateProject(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.viewer.burst_threshold, 5);
        assert_eq!(config.viewer.overscan_top, 0);
        assert_eq!(config.viewer.overscan_bottom, 30);
        assert_eq!(config.viewer.row_key_prefix, "l-");
        assert_eq!(config.editor.host, "localhost");
        assert_eq!(config.editor.port, 3001);
        assert!(config.projects.is_empty());
    }

    #[test]
    fn test_example_parses_to_defaults() {
        let config = Config::from_toml_str(Config::example()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
[viewer]
burst_threshold = 8

[editor]
port = 8443

[[projects]]
id = "p1"
name = "Backend"

[[projects]]
id = "p2"
name = "Frontend"
"#;

        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.viewer.burst_threshold, 8);
        assert_eq!(config.viewer.overscan_bottom, 30);
        assert_eq!(config.editor.host, "localhost");
        assert_eq!(config.editor.port, 8443);
        assert_eq!(config.projects.len(), 2);
        assert_eq!(config.projects[1].name, "Frontend");
    }

    #[test]
    fn test_validation_zero_burst_threshold() {
        let result = Config::from_toml_str("[viewer]\nburst_threshold = 0\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("viewer.burst_threshold"));
    }

    #[test]
    fn test_validation_zero_port() {
        let result = Config::from_toml_str("[editor]\nport = 0\n");
        assert!(result.unwrap_err().to_string().contains("editor.port"));
    }

    #[test]
    fn test_validation_empty_host() {
        let result = Config::from_toml_str("[editor]\nhost = \"  \"\n");
        assert!(result.unwrap_err().to_string().contains("must not be empty"));
    }

    #[test]
    fn test_validation_duplicate_project() {
        let toml = r#"
[[projects]]
id = "p1"
name = "One"

[[projects]]
id = "p1"
name = "Two"
"#;
        let result = Config::from_toml_str(toml);
        assert!(result.unwrap_err().to_string().contains("duplicate project id: p1"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = Config::from_toml_str("[viewer]\nburst = 3\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tailview.toml");
        std::fs::write(&path, "[source]\npoll_interval_ms = 50\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.source.poll_interval_ms, 50);
        assert_eq!(config.source.backlog_page_size, 200);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::from_file(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
