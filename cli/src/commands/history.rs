//! HISTORY command - List every version of a person.

use anyhow::Result;
use clap::Args;
use recorder_core::EntityId;

use super::{PersonEngine, output};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    /// Person ID
    pub id: EntityId,
}

/// Execute the history command.
pub async fn execute(engine: &PersonEngine, human: bool, args: HistoryArgs) -> Result<()> {
    let history = engine.history(args.id).await?;
    output(&history, human)
}
