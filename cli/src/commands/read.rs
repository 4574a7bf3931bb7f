//! READ command - Show a person's current or past state.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use recorder_core::EntityId;

use super::{PersonEngine, output};

/// Arguments for the read command.
#[derive(Args)]
pub struct ReadArgs {
    /// Person ID
    pub id: EntityId,

    /// Show the state as of this instant (RFC 3339, e.g. 2024-05-01T12:00:00Z)
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// Execute the read command.
pub async fn execute(engine: &PersonEngine, human: bool, args: ReadArgs) -> Result<()> {
    let view = match args.at {
        Some(instant) => engine.as_of(args.id, instant).await?,
        None => engine.read(args.id).await?,
    };
    output(&view, human)
}
