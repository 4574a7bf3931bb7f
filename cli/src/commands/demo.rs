//! DEMO command - Full lifecycle against an in-memory store.

use anyhow::Result;
use colored::Colorize;
use recorder_core::VersionRecord;
use recorder_engine::{EngineConfig, EntityView, IntegrityReport, VersioningEngine};
use recorder_store::MemoryGraph;
use serde::Serialize;

use super::{HumanReadable, output};
use crate::person::{Person, PersonPatch};

/// Everything the demo did, in order.
#[derive(Debug, Serialize)]
pub struct DemoReport {
    pub created: EntityView<Person>,
    pub updated: EntityView<Person>,
    pub read: EntityView<Person>,
    pub deleted: EntityView<Person>,
    pub history: Vec<VersionRecord<Person>>,
    pub integrity: IntegrityReport,
}

impl HumanReadable for DemoReport {
    fn print_human(&self) {
        for (step, view) in [
            ("create", &self.created),
            ("update", &self.updated),
            ("read", &self.read),
            ("delete", &self.deleted),
        ] {
            println!("{} {}", "==>".blue().bold(), step.bold());
            view.print_human();
            println!();
        }
        self.history.print_human();
        println!();
        self.integrity.print_human();
    }
}

async fn run_demo() -> Result<DemoReport> {
    let engine: VersioningEngine<_, Person> =
        VersioningEngine::new(MemoryGraph::new(), EngineConfig::default());

    let created = engine
        .create(Person {
            name: "Joe".to_string(),
            age: 33,
            hair_color: Some("brown".to_string()),
        })
        .await?;

    let updated = engine
        .update(
            created.id,
            PersonPatch {
                age: Some(34),
                hair_color: Some("grey".to_string()),
                ..Default::default()
            },
        )
        .await?;

    let read = engine.read(created.id).await?;
    let deleted = engine.delete(created.id).await?;
    let history = engine.history(created.id).await?;
    let integrity = engine.verify(created.id).await?;

    Ok(DemoReport {
        created,
        updated,
        read,
        deleted,
        history,
        integrity,
    })
}

/// Execute the demo command.
pub async fn execute(human: bool) -> Result<()> {
    let report = run_demo().await?;
    output(&report, human)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recorder_core::Operation;

    #[tokio::test]
    async fn test_demo_lifecycle() {
        let report = run_demo().await.unwrap();

        assert_eq!(report.updated.fields.age, 34);
        assert_eq!(report.updated.fields.name, "Joe");
        assert_eq!(report.read, report.updated);
        assert!(report.deleted.is_tombstoned());
        assert_eq!(report.deleted.fields, report.updated.fields);

        let operations: Vec<Operation> = report.history.iter().map(|r| r.operation).collect();
        assert_eq!(
            operations,
            vec![Operation::Created, Operation::Updated, Operation::Deleted]
        );
        assert!(report.integrity.is_consistent());
    }
}
