//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{check, walk};
use crate::domain::ReportKind;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "dquiz")]
#[command(author, version, about = "Walk, check and report on decision-tree quizzes")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new quiz project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Make a dataset file the active quiz and start over at its root
    Load {
        /// JSON or YAML dataset, `-` for stdin
        file: PathBuf,
    },

    /// Show the current question
    Show {
        /// Jump to a node before showing it
        #[arg(long, conflicts_with = "link")]
        at: Option<String>,

        /// Open a shared link
        #[arg(long)]
        link: Option<String>,
    },

    /// Answer the current question by option number or target node id
    Answer {
        /// Option number (1-based) or node id
        choice: String,
    },

    /// Undo the last answer
    Back,

    /// Start over at the root
    Reset,

    /// Print a link to the current node
    Share {
        /// Base URL (defaults to `share_base_url` from config)
        #[arg(long)]
        base: Option<String>,
    },

    /// Check a dataset for structural and graph problems
    Validate {
        /// Dataset file (defaults to the active dataset)
        file: Option<PathBuf>,
    },

    /// List every route from the root to an outcome
    Routes {
        /// Dataset file (defaults to the active dataset)
        file: Option<PathBuf>,
    },

    /// Write a text or CSV report of all routes
    Report {
        /// Dataset file (defaults to the active dataset)
        file: Option<PathBuf>,

        /// Report kind: txt or csv
        #[arg(long, short, default_value = "txt")]
        kind: ReportKind,

        /// Directory to write the report into
        #[arg(long, short, default_value = ".")]
        out: PathBuf,

        /// Print the report instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
}

/// Runs a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let format = cli
        .format
        .unwrap_or_else(|| config.global.default_format.into());
    let output = Output::new(format, cli.verbose);

    output.verbose("dquiz starting");

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.verbose_ctx(
                "init",
                &format!("Created .dquiz directory at: {}", project.dquiz_dir().display()),
            );
            output.success(&format!(
                "Initialized quiz project at {}",
                project.root().display()
            ));
        }

        Commands::Load { file } => walk::load(&output, &file)?,
        Commands::Show { at, link } => walk::show(&output, at.as_deref(), link.as_deref())?,
        Commands::Answer { choice } => walk::answer(&output, &choice)?,
        Commands::Back => walk::back(&output)?,
        Commands::Reset => walk::reset(&output)?,
        Commands::Share { base } => walk::share(&output, &config, base.as_deref())?,

        Commands::Validate { file } => check::validate(&output, file.as_deref())?,
        Commands::Routes { file } => check::routes(&output, &config, file.as_deref())?,
        Commands::Report {
            file,
            kind,
            out,
            stdout,
        } => {
            let target = if stdout { None } else { Some(out.as_path()) };
            check::report(&output, &config, file.as_deref(), kind, target)?
        }
    }

    Ok(())
}
