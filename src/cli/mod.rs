//! `ontograph` command line.
//!
//! ```sh
//! ontograph -v --db neo4j:secret@bolt://localhost:7687 root.yaml leaf.yaml
//! ontograph --dry-run root.yaml leaf.yaml > model.cypher
//! ```

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing::warn;

use crate::{
    config::{Config, ConnectionStringError, StoreConfig},
    errors::Error,
    graph::QuerySink,
    logger,
    ontology::FragmentLoader,
    run::{RunController, RunOutcome, RunReport},
    Result,
};

/// Compile domain-model fragments into a property graph.
///
/// The first source is the root fragment and must declare `namespaces`.
/// Without a graph store the statements are printed to stdout.
#[derive(Parser, Debug)]
#[command(name = "ontograph", version, arg_required_else_help = true)]
pub struct Cli {
    /// Print statement descriptions (-v), statement text (-vv) and
    /// dependency traces (-vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Graph store connection, `user:password@protocol://host:port`
    #[arg(long, value_name = "CONNECTION")]
    pub db: Option<String>,

    /// YAML configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print statements instead of executing them, even when a store is
    /// configured
    #[arg(long, conflicts_with = "db")]
    pub dry_run: bool,

    /// Model fragments, root first
    #[arg(required = true, value_name = "SOURCE")]
    pub sources: Vec<PathBuf>,
}

/// Parses the command line, runs and maps the outcome to an exit code.
#[must_use]
pub fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(&cli) {
        Ok(report) => {
            print_summary(&report);
            ExitCode::from(exit_status(report.outcome))
        }
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::from(1)
        }
    }
}

fn execute(cli: &Cli) -> Result<RunReport> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    logger::init(&config.logger, cli.verbose)?;

    let fragments = FragmentLoader::load_all(&cli.sources)?;
    let store = resolve_store(cli, config.store, &mut io::stdin().lock(), &mut io::stderr())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let sink = match store {
            Some(store) => connect(&store).await?,
            None => QuerySink::dry_run(),
        };
        let mut controller = RunController::new(sink);
        controller.run(&fragments).await
    })
}

#[cfg(feature = "neo4j")]
async fn connect(store: &StoreConfig) -> Result<QuerySink> {
    let store = crate::graph::neo4j::Neo4jStore::connect(store)
        .await
        .map_err(Error::from_store)?;
    Ok(QuerySink::connected(store))
}

#[cfg(not(feature = "neo4j"))]
async fn connect(store: &StoreConfig) -> Result<QuerySink> {
    Err(Error::Message(format!(
        "can not connect to `{}`: built without graph store support",
        store.uri
    )))
}

/// Decides which store, if any, the run writes to.
///
/// `--dry-run` wins over everything, `--db` over the configuration file. A
/// malformed `--db` falls back to asking for the connection on `input`.
fn resolve_store<R: BufRead, W: Write>(
    cli: &Cli,
    configured: Option<StoreConfig>,
    input: &mut R,
    output: &mut W,
) -> Result<Option<StoreConfig>> {
    if cli.dry_run {
        return Ok(None);
    }
    let Some(db) = cli.db.as_deref() else {
        return Ok(configured);
    };
    let database = configured.and_then(|store| store.database);
    let mut store = match db.parse::<StoreConfig>() {
        Ok(store) => store,
        Err(err) => {
            warn!(err.msg = %err, "database connection parameter not specified correctly");
            prompt_store(input, output)?
        }
    };
    store.database = database;
    Ok(Some(store))
}

fn prompt_store<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<StoreConfig> {
    writeln!(output, "Please enter connection, user and password manually.")?;
    let uri = ask(input, output, "DB URL (protocol://host:port): ")?;
    if !uri.contains("://") {
        return Err(ConnectionStringError::MissingProtocol(uri).into());
    }
    let user = ask(input, output, "DB user: ")?;
    let password = ask(input, output, "Password: ")?;
    Ok(StoreConfig {
        uri,
        user,
        password,
        database: None,
    })
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::string("no input left while prompting for the connection"));
    }
    Ok(line.trim().to_string())
}

fn exit_status(outcome: RunOutcome) -> u8 {
    match outcome {
        RunOutcome::Success => 0,
        RunOutcome::AbortedWithCleanup | RunOutcome::CompletedWithIssues => 2,
    }
}

fn print_summary(report: &RunReport) {
    let label = match report.outcome {
        RunOutcome::Success => "success:".green().bold(),
        RunOutcome::AbortedWithCleanup => "aborted:".red().bold(),
        RunOutcome::CompletedWithIssues => "issues:".yellow().bold(),
    };
    eprintln!(
        "{label} {} ({} statements, {} warnings)",
        report.summary(),
        report.statements,
        report.diagnostics.warning_count()
    );
}
