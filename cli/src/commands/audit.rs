//! VERIFY and REPAIR commands - Check and fix a person's version graph.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use recorder_core::EntityId;
use recorder_engine::IntegrityReport;

use super::{HumanReadable, PersonEngine, output};

/// Arguments for the verify and repair commands.
#[derive(Args)]
pub struct AuditArgs {
    /// Person ID
    pub id: EntityId,
}

impl HumanReadable for IntegrityReport {
    fn print_human(&self) {
        if self.is_consistent() {
            println!("{}", "Graph is consistent".green().bold());
        } else {
            println!("{}", "Graph has issues".red().bold());
        }
        println!();
        println!("  {} {}", "Entity:".cyan(), self.entity);
        println!("  {} {}", "Records:".cyan(), self.records);

        if !self.repairs.is_empty() {
            println!();
            println!("{}", "Repairs:".yellow());
            for repair in &self.repairs {
                println!("  - {}", repair);
            }
        }

        if !self.issues.is_empty() {
            println!();
            println!("{}", "Issues:".yellow());
            for issue in &self.issues {
                println!("  - {}", issue);
            }
        }
    }
}

/// Execute the verify command.
pub async fn verify(engine: &PersonEngine, human: bool, args: AuditArgs) -> Result<()> {
    let report = engine.verify(args.id).await?;
    output(&report, human)
}

/// Execute the repair command.
pub async fn repair(engine: &PersonEngine, human: bool, args: AuditArgs) -> Result<()> {
    let report = engine.repair(args.id).await?;
    output(&report, human)
}
