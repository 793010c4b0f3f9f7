//! # Storage Layer
//!
//! The collaborators the navigation engine talks to, made concrete for a
//! local, git-friendly project directory.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Active dataset | JSON | `.dquiz/dataset.json` |
//! | Navigation state | JSON | `.dquiz/state/{key}.json` |
//! | Config | TOML | `.dquiz/config.toml` |
//!
//! Dataset files given to `load`, `validate`, `routes` and `report` may be
//! JSON or YAML (`.yaml`/`.yml`).
//!
//! ## Concurrency Safety
//!
//! - [`FileStateSlot`] takes a shared lock for reads and an exclusive lock
//!   for writes (`fs2`)
//! - All writes are atomic (temp file + rename)
//!
//! ## Project Structure
//!
//! ```text
//! .dquiz/
//! ├── dataset.json          # Active dataset
//! ├── state/                # Navigation state records
//! ├── config.toml           # Project configuration
//! └── .gitignore            # Ignores state
//! ```

mod config;
mod loader;
mod locator;
mod project;
mod state;

pub use config::{
    Config, ConfigError, GlobalConfig, OutputFormat, ProjectConfig, DEFAULT_STATE_KEY,
    PROJECT_DIR,
};
pub use loader::{acquire, is_stdin, AcquisitionError, SourceFormat};
pub use locator::FragmentLocator;
pub use project::{Project, ProjectError};
pub use state::FileStateSlot;
