//! CREATE command - Register a new person.

use anyhow::Result;
use clap::Args;

use super::{PersonEngine, output};
use crate::person::Person;

/// Arguments for the create command.
#[derive(Args)]
pub struct CreateArgs {
    /// Full name
    pub name: String,

    /// Age in years
    pub age: u32,

    /// Hair color
    #[arg(long)]
    pub hair_color: Option<String>,
}

/// Execute the create command.
pub async fn execute(engine: &PersonEngine, human: bool, args: CreateArgs) -> Result<()> {
    let person = Person {
        name: args.name,
        age: args.age,
        hair_color: args.hair_color,
    };

    let view = engine.create(&person).await?;
    output(&view, human)
}
