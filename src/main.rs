//! Liftoff - resolve one pending Leaving Earth decision at the terminal.
//!
//! ## Usage
//!
//! ```text
//! liftoff --snapshot state.json --decision decision.json [OPTIONS]
//!
//! Options:
//!   --config <FILE>        Resolver rule table (defaults to the builtin one)
//!   --log <FILE>           Log entries to print before prompting
//!   --history-dir <DIR>    Historical snapshots referenced by the log
//!   --record <FILE>        Record every answer to a file
//!   --replay <FILE>        Replay answers from a file
//!   --log-level <FILTER>   Tracing filter (defaults to RUST_LOG, then warn)
//! ```
//!
//! Prompts and diagnostics go to stderr. The resolved choice is printed to
//! stdout as JSON. Exit code 3 means the operator chose to exit instead.

use clap::Parser;
use liftoff::history::{DirectoryHistory, HistoryCache, HistoryError, LogEntry, render_entry};
use liftoff::{
    CliPrompter, ConfigError, DecodeError, Decision, InputManager, LoadError, ResolveContext,
    ResolveError, Resolution, ResolverConfig, Snapshot, load_json, resolve,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const EXIT_REQUESTED: u8 = 3;

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve a pending Leaving Earth decision", long_about = None)]
struct Cli {
    /// Snapshot of the game state at decision time.
    #[arg(long)]
    snapshot: PathBuf,
    /// The pending decision.
    #[arg(long)]
    decision: PathBuf,
    /// Resolver rule table overriding the builtin one.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log entries to render before prompting.
    #[arg(long)]
    log: Option<PathBuf>,
    /// Directory of `<history_id>.json` snapshots the log refers to.
    #[arg(long, requires = "log")]
    history_dir: Option<PathBuf>,
    /// Record every answered line to this file.
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,
    /// Replay answers from this file instead of reading stdin.
    #[arg(long)]
    replay: Option<PathBuf>,
    /// Tracing filter, e.g. `debug` or `liftoff::chain=debug`.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error("{action} {path:?}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write choice: {0}")]
    Output(#[from] serde_json::Error),
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .with_writer(io::stderr)
        .init();
}

fn read_decision(path: &Path) -> Result<Decision, CliError> {
    let json = fs::read_to_string(path).map_err(|source| CliError::Io {
        action: "failed to read",
        path: path.to_path_buf(),
        source,
    })?;
    Decision::from_json_str(&json).map_err(|err| match err {
        DecodeError::UnknownKind(kind) => ResolveError::UnexpectedDecision(kind).into(),
        DecodeError::Json(source) => LoadError::Parse {
            path: path.to_path_buf(),
            source,
        }
        .into(),
    })
}

fn input_manager(cli: &Cli) -> Result<InputManager, CliError> {
    if let Some(path) = &cli.replay {
        return InputManager::replay(path).map_err(|source| CliError::Io {
            action: "failed to open replay file",
            path: path.clone(),
            source,
        });
    }
    if let Some(path) = &cli.record {
        return InputManager::record(path).map_err(|source| CliError::Io {
            action: "failed to create record file",
            path: path.clone(),
            source,
        });
    }
    Ok(InputManager::interactive())
}

fn print_log(cli: &Cli, config: &ResolverConfig, snapshot: &Snapshot) -> Result<(), CliError> {
    let Some(log) = &cli.log else {
        return Ok(());
    };
    let entries: Vec<LogEntry> = load_json(log)?;
    let source = DirectoryHistory::new(
        cli.history_dir
            .clone()
            .or_else(|| log.parent().map(Path::to_path_buf))
            .unwrap_or_default(),
    );
    let mut cache = HistoryCache::new(config.history_cache_bytes);
    let mut stderr = io::stderr().lock();
    for entry in &entries {
        let line = render_entry(&mut cache, &source, entry)?;
        writeln!(stderr, "{}", line).map_err(|source| CliError::Io {
            action: "failed to print log to",
            path: PathBuf::from("stderr"),
            source,
        })?;
    }
    info!(entries = entries.len(), year = snapshot.year, "printed game log");
    Ok(())
}

fn run(cli: &Cli) -> Result<Resolution, CliError> {
    let config = match &cli.config {
        Some(path) => ResolverConfig::from_file(path)?,
        None => ResolverConfig::builtin()?,
    };
    let snapshot: Snapshot = load_json(&cli.snapshot)?;
    let decision = read_decision(&cli.decision)?;

    print_log(cli, &config, &snapshot)?;

    let mut prompter = CliPrompter::new(input_manager(cli)?, io::stderr());
    let ctx = ResolveContext::new(&snapshot, &config);
    let resolution = resolve(ctx, &decision, &mut prompter)?;

    if let Resolution::Choice(choice) = &resolution {
        let json = serde_json::to_string(choice)?;
        println!("{}", json);
    }
    Ok(resolution)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    match run(&cli) {
        Ok(Resolution::Choice(_)) => ExitCode::SUCCESS,
        Ok(Resolution::Exit) => ExitCode::from(EXIT_REQUESTED),
        Err(err) => {
            error!("{}", err);
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
