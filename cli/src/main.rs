//! Command-line person registry backed by the recorder versioning engine.
//!
//! Every change to a person is kept as an immutable version record:
//! - create: Register a new person
//! - read: Show a person's current (or past) state
//! - update: Change some fields
//! - delete: Tombstone a person; history stays readable
//! - history: List every version of a person
//! - verify: Check a person's graph for damage
//! - repair: Add edges a failed mutation left out
//! - demo: Run a full lifecycle against an in-memory store
//!
//! Configuration via environment:
//! - DATABASE_URL: PostgreSQL connection string
//! - RUST_LOG / LOG_LEVEL: Log filter (default: info), written to stderr
//! - RECORDER_OPERATION_TIMEOUT_MS, RECORDER_CONFLICT_RETRIES: Engine tuning

mod commands;
mod person;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use commands::connect;
use commands::{
    audit::AuditArgs, create::CreateArgs, delete::DeleteArgs, history::HistoryArgs,
    read::ReadArgs, update::UpdateArgs,
};

/// Recorder CLI
///
/// Manage versioned person records from the command line. Output is JSON
/// unless --human is given.
#[derive(Parser)]
#[command(name = "recorder")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output human-readable formatted text instead of JSON
    #[arg(long, global = true)]
    human: bool,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL", global = true, hide_env_values = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new person
    Create(CreateArgs),

    /// Show a person
    Read(ReadArgs),

    /// Change fields of a person
    Update(UpdateArgs),

    /// Delete a person, keeping their history
    Delete(DeleteArgs),

    /// List every version of a person
    History(HistoryArgs),

    /// Check a person's version graph
    Verify(AuditArgs),

    /// Repair a person's version graph
    Repair(AuditArgs),

    /// Run create, update, read and delete against an in-memory store
    Demo,
}

fn init_tracing() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let human = cli.human;
    let url = cli.database_url.as_deref();

    match cli.command {
        Commands::Create(args) => commands::create::execute(&connect(url).await?, human, args).await,
        Commands::Read(args) => commands::read::execute(&connect(url).await?, human, args).await,
        Commands::Update(args) => commands::update::execute(&connect(url).await?, human, args).await,
        Commands::Delete(args) => commands::delete::execute(&connect(url).await?, human, args).await,
        Commands::History(args) => {
            commands::history::execute(&connect(url).await?, human, args).await
        }
        Commands::Verify(args) => commands::audit::verify(&connect(url).await?, human, args).await,
        Commands::Repair(args) => commands::audit::repair(&connect(url).await?, human, args).await,
        Commands::Demo => commands::demo::execute(human).await,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
