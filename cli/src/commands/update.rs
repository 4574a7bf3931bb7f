//! UPDATE command - Change some fields of a person.

use anyhow::Result;
use clap::Args;
use recorder_core::EntityId;

use super::{PersonEngine, output};
use crate::person::PersonPatch;

/// Arguments for the update command.
///
/// Fields left out keep their current value.
#[derive(Args)]
pub struct UpdateArgs {
    /// Person ID
    pub id: EntityId,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New age
    #[arg(long)]
    pub age: Option<u32>,

    /// New hair color
    #[arg(long)]
    pub hair_color: Option<String>,
}

/// Execute the update command.
pub async fn execute(engine: &PersonEngine, human: bool, args: UpdateArgs) -> Result<()> {
    let patch = PersonPatch {
        name: args.name,
        age: args.age,
        hair_color: args.hair_color,
    };

    let view = engine.update(args.id, &patch).await?;
    output(&view, human)
}
