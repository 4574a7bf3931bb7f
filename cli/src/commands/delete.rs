//! DELETE command - Tombstone a person.

use anyhow::Result;
use clap::Args;
use recorder_core::EntityId;

use super::{PersonEngine, output};

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Person ID
    pub id: EntityId,
}

/// Execute the delete command.
///
/// The person stays readable; the output shows the tombstoned state.
pub async fn execute(engine: &PersonEngine, human: bool, args: DeleteArgs) -> Result<()> {
    let view = engine.delete(args.id).await?;
    output(&view, human)
}
