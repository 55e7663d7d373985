//! `modelgraph` — configures a Manager from a graph file and walks named paths.
//!
//! **Usage:**
//! ```text
//! modelgraph --config graph.toml candidates db --hint Project
//! modelgraph --config graph.toml resolve project.db project.db.cluster
//! modelgraph --config graph.toml show project.db.cluster
//! ```
//!
//! Log output goes to stderr and is controlled by `RUST_LOG`
//! (default `modelgraph=info`, or `modelgraph=debug` with `--verbose`).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use modelgraph::serializer::json;
use modelgraph::{Instance, Manager, Model};
use modelgraph_cli::GraphFile;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Walk a lazily resolved model graph.
#[derive(Parser)]
#[command(name = "modelgraph", about = "Resolve named model paths against a graph file")]
struct Cli {
    /// Graph file (TOML) with configuration and declared types.
    #[arg(long, short, global = true, default_value = "graph.toml")]
    config: PathBuf,

    /// Log resolution details.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the candidate type names tried for a name, most specific first.
    Candidates {
        /// Model name as accessed.
        name: String,
        /// Namespace hint appended to every namespace.
        #[arg(long)]
        hint: Option<String>,
        /// Type-name suffixes.
        #[arg(long = "suffix", default_value = "Model")]
        suffixes: Vec<String>,
    },
    /// Resolve dotted paths and print the type each one was built as.
    Resolve {
        /// Paths such as `project.db.cluster`.
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Resolve dotted paths and print the resolved graph as JSON.
    Show {
        /// Paths such as `project.db.cluster`.
        paths: Vec<String>,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "modelgraph=debug,modelgraph_cli=debug"
    } else {
        "modelgraph=info,modelgraph_cli=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Type name `path` was built as, read from its parent's cache.
fn built_as(manager: &Manager, path: &str) -> Result<String> {
    let (parent, name) = match path.rsplit_once('.') {
        Some((parent, name)) => (Some(parent), name),
        None => (None, path),
    };
    let owner = match parent {
        None => None,
        Some(parent) => Some(manager.resolve_path(parent)?),
    };
    let node = match &owner {
        None => manager.node(),
        Some(Instance::Model(model)) => model.node(),
        Some(Instance::Value(_)) => anyhow::bail!("'{path}' is not below a model"),
    };
    node.cached_type_name(name)
        .with_context(|| format!("'{path}' is not resolved"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = GraphFile::load(&cli.config)?;
    let manager = file.manager();
    info!(
        config = %cli.config.display(),
        types = manager.registry().len(),
        namespaces = manager.namespaces().added().len(),
        convention = manager.has_convention(),
        "graph loaded"
    );

    match cli.command {
        Command::Candidates {
            name,
            hint,
            suffixes,
        } => {
            let suffixes: Vec<&str> = suffixes.iter().map(String::as_str).collect();
            for candidate in manager.candidates(&name, hint.as_deref(), &suffixes) {
                let mark = if manager.registry().contains(&candidate) {
                    "*"
                } else {
                    " "
                };
                println!("{mark} {candidate}");
            }
        }
        Command::Resolve { paths } => {
            for path in &paths {
                let instance = manager
                    .resolve_path(path)
                    .with_context(|| format!("Failed to resolve '{path}'"))?;
                let kind = if instance.is_model() { "model" } else { "value" };
                println!("{path} -> {} ({kind})", built_as(&manager, path)?);
            }
        }
        Command::Show { paths } => {
            for path in &paths {
                manager
                    .resolve_path(path)
                    .with_context(|| format!("Failed to resolve '{path}'"))?;
            }
            let rendered = serde_json::to_string_pretty(&json::to_json(&manager))
                .context("Failed to serialize resolved graph")?;
            println!("{rendered}");
        }
    }

    Ok(())
}
