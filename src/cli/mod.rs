//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project management | `init`, `load` |
//! | Walk | Interactive navigation | `show`, `answer`, `back`, `reset`, `share` |
//! | Check | Dataset analysis | `validate`, `routes`, `report` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output and library logs:
//! ```bash
//! dquiz --verbose routes quiz.json
//! ```
//!
//! ## Entry Point
//!
//! Parse a [`Cli`] and hand it to [`run()`].

mod app;
mod check;
mod output;
mod walk;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
