//! Configuration handling for decision-quiz
//!
//! Configuration is stored in `.dquiz/config.toml` (project) and
//! `~/.config/dquiz/config.toml` (global).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{EnumerationLimits, TransitionPolicy};

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".dquiz";

/// Key of the navigation state record when none is configured
pub const DEFAULT_STATE_KEY: &str = "decision_quiz_state_v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Project-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Name of the persisted navigation record under `state/`
    pub state_key: String,

    /// Only accept answers offered by the current node
    pub strict_navigation: bool,

    /// Base URL for `dquiz share`
    pub share_base_url: Option<String>,

    /// Ceilings for route enumeration
    pub limits: EnumerationLimits,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            state_key: DEFAULT_STATE_KEY.to_string(),
            strict_navigation: false,
            share_base_url: None,
            limits: EnumerationLimits::default(),
        }
    }
}

impl ProjectConfig {
    pub fn policy(&self) -> TransitionPolicy {
        if self.strict_navigation {
            TransitionPolicy::Strict
        } else {
            TransitionPolicy::Permissive
        }
    }

    /// Checks values serde cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.state_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Invalid("state_key must not be empty".to_string()));
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ConfigError::Invalid(format!(
                "state_key '{}' must be a plain file name",
                self.state_key
            )));
        }
        if self.limits.max_depth == 0 || self.limits.max_routes == 0 {
            return Err(ConfigError::Invalid(
                "limits must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Global user configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlobalConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,

    /// Fallback base URL for `dquiz share`
    pub share_base_url: Option<String>,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Combined configuration (global + project)
#[derive(Debug, Clone)]
pub struct Config {
    pub project: ProjectConfig,
    pub global: GlobalConfig,
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from default locations
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let (project, project_root) = Self::load_project()?;

        Ok(Self {
            project,
            global,
            project_root,
        })
    }

    /// Loads configuration for a specific project
    pub fn for_project(project_root: &Path) -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project_config(project_root)?;

        Ok(Self {
            project,
            global,
            project_root: Some(project_root.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "dquiz", "dquiz").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Share base URL, project setting first
    pub fn share_base_url(&self) -> Option<&str> {
        self.project
            .share_base_url
            .as_deref()
            .or(self.global.share_base_url.as_deref())
    }

    /// Loads global configuration
    fn load_global() -> Result<GlobalConfig> {
        let config_dir = match Self::global_config_dir() {
            Some(dir) => dir,
            None => return Ok(GlobalConfig::default()),
        };

        let config_path = config_dir.join("config.toml");
        if !config_path.exists() {
            return Ok(GlobalConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read global config: {}", config_path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse global config")
    }

    /// Finds and loads project configuration
    fn load_project() -> Result<(ProjectConfig, Option<PathBuf>)> {
        match Self::find_project_root() {
            Some(root) => {
                let config = Self::load_project_config(&root)?;
                Ok((config, Some(root)))
            }
            None => Ok((ProjectConfig::default(), None)),
        }
    }

    /// Loads project configuration from a specific root
    fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
        let config_path = project_root.join(PROJECT_DIR).join("config.toml");

        if !config_path.exists() {
            return Ok(ProjectConfig::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read project config: {}", config_path.display()))?;

        let config: ProjectConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .context("Failed to parse project config")?;

        config
            .validate()
            .with_context(|| format!("Invalid project config: {}", config_path.display()))?;

        Ok(config)
    }

    /// Finds the project root by looking for a `.dquiz/` directory
    pub fn find_project_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_project_root_from(current)
    }

    /// Walks up from `start` looking for a `.dquiz/` directory
    pub fn find_project_root_from(start: PathBuf) -> Option<PathBuf> {
        let mut current = start;

        loop {
            if current.join(PROJECT_DIR).is_dir() {
                return Some(current);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    /// Returns true if we're in a dquiz project
    pub fn is_in_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Returns the project root, or an error if not in a project
    pub fn require_project_root(&self) -> Result<&Path> {
        self.project_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not in a dquiz project. Run 'dquiz init' first."))
    }

    /// Saves the project configuration
    pub fn save_project(&self) -> Result<()> {
        let root = self.require_project_root()?;
        let config_path = root.join(PROJECT_DIR).join("config.toml");

        let content =
            toml::to_string_pretty(&self.project).context("Failed to serialize project config")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write project config: {}", config_path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert_eq!(config.project.state_key, DEFAULT_STATE_KEY);
        assert_eq!(config.project.limits.max_depth, 256);
        assert_eq!(config.project.policy(), TransitionPolicy::Permissive);
        assert_eq!(config.global.default_format, OutputFormat::Text);
    }

    #[test]
    fn parse_project_config() {
        let toml = r#"
state_key = "team_quiz"
strict_navigation = true
share_base_url = "https://quiz.example.org/"

[limits]
max_depth = 32
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.state_key, "team_quiz");
        assert_eq!(config.policy(), TransitionPolicy::Strict);
        assert_eq!(config.limits.max_depth, 32);
        assert_eq!(config.limits.max_routes, 100_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_global_config() {
        let toml = r#"
default_format = "json"
share_base_url = "https://global.example.org/"
"#;

        let config: GlobalConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.default_format, OutputFormat::Json);
        assert_eq!(
            config.share_base_url.as_deref(),
            Some("https://global.example.org/")
        );
    }

    #[test]
    fn project_share_url_wins() {
        let mut config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig {
                share_base_url: Some("https://global.example.org/".to_string()),
                ..Default::default()
            },
            project_root: None,
        };
        assert_eq!(config.share_base_url(), Some("https://global.example.org/"));

        config.project.share_base_url = Some("https://local.example.org/".to_string());
        assert_eq!(config.share_base_url(), Some("https://local.example.org/"));
    }

    #[test]
    fn rejects_unusable_values() {
        let mut config = ProjectConfig {
            state_key: "../escape".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.state_key = "   ".to_string();
        assert!(config.validate().is_err());

        config.state_key = "ok".to_string();
        config.limits.max_routes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn find_project_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(PROJECT_DIR)).unwrap();

        let sub_dir = dir.path().join("sub").join("dir");
        fs::create_dir_all(&sub_dir).unwrap();

        let root = Config::find_project_root_from(sub_dir);
        // Canonicalize both paths to handle macOS /var -> /private/var symlinks
        let expected = dir.path().canonicalize().ok();
        let actual = root.and_then(|p| p.canonicalize().ok());
        assert_eq!(actual, expected);
    }

    #[test]
    fn config_not_in_project() {
        let config = Config {
            project: ProjectConfig::default(),
            global: GlobalConfig::default(),
            project_root: None,
        };

        assert!(!config.is_in_project());
        assert!(config.require_project_root().is_err());
    }

    #[test]
    fn invalid_project_config_is_reported() {
        let dir = TempDir::new().unwrap();
        let dquiz_dir = dir.path().join(PROJECT_DIR);
        fs::create_dir_all(&dquiz_dir).unwrap();
        fs::write(dquiz_dir.join("config.toml"), "strict_navigation = \"maybe\"").unwrap();

        assert!(Config::for_project(dir.path()).is_err());
    }
}
