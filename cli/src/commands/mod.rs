//! Command implementations for the recorder CLI.
//!
//! Each command module provides:
//! - Args struct for clap argument parsing
//! - execute() function that performs the command
//! - Human-readable and JSON output formatting

pub mod audit;
pub mod create;
pub mod delete;
pub mod demo;
pub mod history;
pub mod read;
pub mod update;

use anyhow::{Context, Result};
use colored::Colorize;
use recorder_core::VersionRecord;
use recorder_engine::{EngineConfig, EntityView, VersioningEngine};
use recorder_store::{PgGraph, StoreConfig};
use serde::Serialize;

use crate::person::Person;

/// Engine over PostgreSQL for person records.
pub type PersonEngine = VersioningEngine<PgGraph, Person>;

/// Connect to the database and build the engine.
pub async fn connect(database_url: Option<&str>) -> Result<PersonEngine> {
    let config = match database_url {
        Some(url) => StoreConfig::with_url(url),
        None => StoreConfig::from_env()?,
    };
    let graph = PgGraph::connect(config)
        .await
        .context("failed to connect to database")?;
    Ok(VersioningEngine::new(graph, EngineConfig::from_env()))
}

/// Print output in JSON or human-readable format.
pub fn output<T: Serialize + HumanReadable>(value: &T, human: bool) -> Result<()> {
    if human {
        value.print_human();
    } else {
        println!("{}", serde_json::to_string_pretty(value)?);
    }
    Ok(())
}

/// Trait for types that can be printed in human-readable format.
pub trait HumanReadable {
    fn print_human(&self);
}

/// Format a timestamp for human display.
pub fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

fn print_person(person: &Person) {
    println!("  {} {}", "Name:".cyan(), person.name);
    println!("  {} {}", "Age:".cyan(), person.age);
    if let Some(hair_color) = &person.hair_color {
        println!("  {} {}", "Hair Color:".cyan(), hair_color);
    }
}

impl HumanReadable for EntityView<Person> {
    fn print_human(&self) {
        if self.is_tombstoned() {
            println!("{}", "Person (deleted)".red().bold());
        } else {
            println!("{}", "Person".green().bold());
        }
        println!("{}", "=".repeat(60));
        println!();
        println!("  {} {}", "ID:".cyan(), self.id);
        println!("  {} {}", "Created:".cyan(), format_timestamp(&self.created_at));
        println!("  {} {}", "Record:".cyan(), self.record_id);
        println!(
            "  {} {} at {}",
            "Last Change:".cyan(),
            self.operation,
            format_timestamp(&self.recorded_at)
        );
        println!();
        print_person(&self.fields);
    }
}

impl HumanReadable for Vec<VersionRecord<Person>> {
    fn print_human(&self) {
        println!("{} ({} versions)", "History".green().bold(), self.len());
        println!("{}", "=".repeat(60));
        for (index, record) in self.iter().enumerate() {
            println!();
            println!(
                "{} {} {}",
                format!("#{}", index + 1).yellow(),
                record.operation.to_string().bold(),
                format_timestamp(&record.created_at).dimmed()
            );
            println!("  {} {}", "Record:".cyan(), record.id);
            print_person(&record.fields);
        }
    }
}
