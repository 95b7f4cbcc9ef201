//! Main CLI application structure

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::session::Session;
use super::{doc, query, tui};
use crate::domain::DocumentId;
use crate::storage::{Config, Project};

#[derive(Parser)]
#[command(name = "tutor")]
#[command(author, version, about = "Step-by-step tutorials with progress tracking")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config setting)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a tutorial project with a starter guide
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List tutorials with progress
    Tutorials,

    /// Show a tutorial's steps and completion
    Status {
        /// Tutorial type (defaults to `default_tutorial`)
        #[arg(long, short)]
        tutorial: Option<String>,
    },

    /// Render a document
    Show {
        /// Document ID
        id: String,
    },

    /// Mark a document complete
    Complete {
        /// Document ID
        id: String,
    },

    /// Copy a code block that has a filename header
    Copy {
        /// Document ID
        id: String,

        /// Which block to copy, counting from 1
        #[arg(long, short)]
        block: Option<usize>,

        /// Print the block instead of using the clipboard
        #[arg(long)]
        stdout: bool,
    },

    /// Browse a tutorial interactively
    Open {
        /// Tutorial type (defaults to `default_tutorial`)
        #[arg(long, short)]
        tutorial: Option<String>,

        /// Document to open immediately
        #[arg(long, conflicts_with = "query")]
        id: Option<String>,

        /// Navigation query string, e.g. `?id=stripe-account`
        #[arg(long)]
        query: Option<String>,
    },
}

/// Sets up stderr logging: `RUST_LOG`, else debug under `--verbose`
fn init_tracing(verbose: bool) {
    let default = if verbose { "tutorial_kit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn resolve_format(explicit: Option<OutputFormat>) -> OutputFormat {
    if let Some(format) = explicit {
        return format;
    }
    match Config::load_global() {
        Ok(global) => global.default_format.into(),
        Err(e) => {
            tracing::warn!("ignoring global config: {:#}", e);
            OutputFormat::default()
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = Output::new(resolve_format(cli.format));

    match cli.command {
        Commands::Init { path } => {
            tracing::debug!(%path, "initializing project");
            let project = Project::init(&path)?;
            tracing::debug!(dir = %project.tutor_dir().display(), "created project directory");
            output.success(&format!("Initialized tutor project at {}", project.root().display()));
        }

        Commands::Tutorials => query::tutorials(&output)?,
        Commands::Status { tutorial } => query::status(&output, tutorial.as_deref())?,

        Commands::Show { id } => doc::show(&output, &id)?,
        Commands::Complete { id } => doc::complete(&output, &id)?,
        Commands::Copy { id, block, stdout } => doc::copy(&output, &id, block, stdout)?,

        Commands::Open { tutorial, id, query } => {
            let session = Session::open()?;
            let doc_type = session.doc_type(tutorial.as_deref())?;
            let toast_ticks = session.project().config().project.viewer.toast_ticks;

            let mut orchestrator = session.into_orchestrator(doc_type);
            if let Some(id) = id {
                let id: DocumentId = id.parse().context("Invalid document ID")?;
                orchestrator.select(id);
            } else if let Some(query) = query {
                orchestrator.apply_query(&query);
            }

            tui::run(orchestrator, toast_ticks)?;
        }
    }

    tracing::debug!("command completed");
    Ok(())
}
