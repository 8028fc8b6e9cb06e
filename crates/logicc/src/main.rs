//! The Logic command-line driver.
//!
//! Provides the `logicc` command with the following subcommands:
//!
//! - `logicc check <program.json>` - Run scope resolution, type inference,
//!   and evaluation over a serialized tree and print per-node results
//! - `logicc prelude` - Print the built-in `Prelude` library as JSON
//!
//! Options for `check`:
//! - `--config` - Path to `logic.toml` (default: next to the program)
//! - `--json` - Print results as a JSON document
//! - `--target` - Stop resolution at a node id and list the names in scope

mod report;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use logic_common::{LogicConfig, NodeId, PRELUDE_LIBRARY};
use logic_syntax::{splice_imports, DirectoryLoader, LibraryLoader, Program};
use logic_typeck::builtins::prelude;
use logic_typeck::{check, resolve_scope};

const CONFIG_FILE: &str = "logic.toml";

#[derive(Parser)]
#[command(name = "logicc", version, about = "The Logic semantic core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check and evaluate a serialized program
    Check {
        /// Path to the program tree (JSON)
        program: PathBuf,

        /// Configuration file (defaults to logic.toml beside the program)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Resolve scope up to this node id and list what is visible there
        #[arg(long)]
        target: Option<u64>,
    },
    /// Print the built-in Prelude library
    Prelude {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Libraries from the configured directories. The built-in prelude is used
/// when no directory provides one.
struct Libraries {
    directories: DirectoryLoader,
}

impl LibraryLoader for Libraries {
    fn load(&self, name: &str) -> Option<Program> {
        self.directories
            .load(name)
            .or_else(|| (name == PRELUDE_LIBRARY).then(prelude))
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {:#}", err);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            program,
            config,
            json,
            target,
        } => {
            let config = load_config(&program, config.as_deref())?;
            init_logging(&config.log.filter);
            check_program(&program, &config, json, target.map(NodeId))
        }
        Commands::Prelude { output } => {
            init_logging(&LogicConfig::default().log.filter);
            let text = serde_json::to_string_pretty(&prelude())?;
            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("failed to write '{}'", path.display()))?,
                None => println!("{}", text),
            }
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_logging(filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(program: &Path, explicit: Option<&Path>) -> Result<LogicConfig> {
    if let Some(path) = explicit {
        return LogicConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()));
    }
    let beside = program
        .parent()
        .map(|dir| dir.join(CONFIG_FILE))
        .filter(|path| path.is_file());
    match beside {
        Some(path) => LogicConfig::from_file(&path)
            .with_context(|| format!("failed to load config '{}'", path.display())),
        None => Ok(LogicConfig::default()),
    }
}

fn load_program(path: &Path) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("'{}' is not a program", path.display()))
}

fn check_program(
    path: &Path,
    config: &LogicConfig,
    json: bool,
    target: Option<NodeId>,
) -> Result<()> {
    let program = load_program(path)?;
    let libraries = Libraries {
        directories: DirectoryLoader::new(config.library.paths.clone()),
    };
    let implicit: &[&str] = if config.analysis.prelude {
        &[PRELUDE_LIBRARY]
    } else {
        &[]
    };
    let program =
        splice_imports(&program, &libraries, implicit).context("failed to splice imports")?;
    debug!(nodes = program.node_count(), "spliced program");

    if let Some(target) = target {
        let scope = resolve_scope(&program, Some(target));
        let report = report::ScopeReport::new(target, &scope);
        return report.print(json);
    }

    let checked = check(&program);
    let values = logic_eval::evaluate_checked(&program, &checked);
    info!(
        typed = checked.inference.node_terms.len(),
        evaluated = values.values.len(),
        "checked program"
    );
    report::Report::new(&program, &checked, &values).print(json)
}
