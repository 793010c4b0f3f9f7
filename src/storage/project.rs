//! Project management
//!
//! Handles project initialization and provides access to the active dataset
//! and the navigation state slot.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::domain::{validate_and_promote, Dataset};

use super::config::PROJECT_DIR;
use super::state::write_atomic;
use super::{loader, Config, FileStateSlot};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Not in a dquiz project. Run 'dquiz init' first.")]
    NotInProject,

    #[error("No dataset loaded. Run 'dquiz load <file>' first.")]
    NoDataset,

    #[error("Stored dataset is invalid:\n{}", .0.join("\n"))]
    InvalidDataset(Vec<String>),
}

/// A dquiz project
pub struct Project {
    root: PathBuf,
    config: Config,
}

impl Project {
    /// Opens an existing project at the given path
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        if !root.join(PROJECT_DIR).is_dir() {
            return Err(ProjectError::NotInProject.into());
        }

        let config = Config::for_project(&root)?;

        Ok(Self { root, config })
    }

    /// Opens the project at the current directory or a parent
    pub fn open_current() -> Result<Self> {
        let root = Config::find_project_root().ok_or(ProjectError::NotInProject)?;

        Self::open(root)
    }

    /// Initializes a new project at the given path
    pub fn init(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let dquiz_dir = root.join(PROJECT_DIR);

        // Create directory structure
        fs::create_dir_all(&dquiz_dir).with_context(|| {
            format!("Failed to create {} directory: {}", PROJECT_DIR, dquiz_dir.display())
        })?;

        let state_dir = dquiz_dir.join("state");
        fs::create_dir_all(&state_dir).with_context(|| {
            format!("Failed to create state directory: {}", state_dir.display())
        })?;

        // Create default config
        let config_path = dquiz_dir.join("config.toml");
        if !config_path.exists() {
            let default_config = r#"# decision-quiz configuration

# Name of the navigation state record under state/
state_key = "decision_quiz_state_v1"

# Only accept answers offered by the current question
strict_navigation = false

# Base URL for 'dquiz share'
# share_base_url = "https://example.org/quiz"

[limits]
max_depth = 256
max_routes = 100000
"#;
            fs::write(&config_path, default_config)
                .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
        }

        // Create .gitignore for .dquiz
        let gitignore_path = dquiz_dir.join(".gitignore");
        if !gitignore_path.exists() {
            let gitignore = r#"# Navigation state is per user
state/
"#;
            fs::write(&gitignore_path, gitignore).with_context(|| {
                format!("Failed to write .gitignore: {}", gitignore_path.display())
            })?;
        }

        Self::open(root)
    }

    /// Returns the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the .dquiz directory path
    pub fn dquiz_dir(&self) -> PathBuf {
        self.root.join(PROJECT_DIR)
    }

    /// Returns the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the active dataset
    pub fn dataset_path(&self) -> PathBuf {
        self.dquiz_dir().join("dataset.json")
    }

    /// Returns the navigation state slot for the configured key
    pub fn state_slot(&self) -> FileStateSlot {
        FileStateSlot::for_project(&self.root, &self.config.project.state_key)
    }

    /// Returns true if a dataset has been loaded
    pub fn has_dataset(&self) -> bool {
        self.dataset_path().is_file()
    }

    /// Reads the active dataset, which must still pass the load gate
    pub fn dataset(&self) -> Result<Dataset> {
        let path = self.dataset_path();
        if !path.is_file() {
            return Err(ProjectError::NoDataset.into());
        }

        let candidate = loader::acquire(&path)?;
        validate_and_promote(candidate).map_err(|errors| ProjectError::InvalidDataset(errors).into())
    }

    /// Replaces the active dataset
    pub fn save_dataset(&self, dataset: &Dataset) -> Result<()> {
        let content =
            serde_json::to_vec_pretty(dataset).context("Failed to serialize dataset")?;
        write_atomic(&self.dataset_path(), &content)?;
        tracing::debug!(path = %self.dataset_path().display(), "active dataset replaced");
        Ok(())
    }
}
