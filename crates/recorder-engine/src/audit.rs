//! Integrity checking and additive repair.
//!
//! Mutations are not atomic across their steps, so a crash or store error
//! between steps can leave an entity without its ACTIVE_RECORD edge, or
//! with a record that is active but missing from HAS_RECORD or from the
//! PRECEDES chain. `verify` reports such damage; `repair` fixes what can be
//! fixed by adding edges. Nothing is ever removed or rewritten.
//!
//! The `previous` property written into every record at creation is what
//! makes the chain reconstructible.

use std::collections::{HashMap, HashSet};
use std::fmt;

use recorder_core::{EdgeKind, EntityId, Operation, Record, RecordId, VersionRecord};
use recorder_store::GraphStore;
use serde::Serialize;
use tracing::warn;

use crate::engine::VersioningEngine;
use crate::error::EngineResult;

/// One structural defect of an entity's graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum IntegrityIssue {
    MissingActiveRecord,
    MultipleActiveRecords { records: Vec<RecordId> },
    ActiveNotInHistory { record: RecordId },
    /// A record on the active record's lineage lacks HAS_RECORD.
    MissingHistoryEdge { record: RecordId },
    /// `to.previous == from` but no PRECEDES edge links them.
    BrokenChain { from: RecordId, to: RecordId },
    NoGenesis,
    MultipleHeads { records: Vec<RecordId> },
    Cycle { record: RecordId },
    Unreachable { record: RecordId },
    ActiveNotAtTail { active: RecordId, tail: RecordId },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingActiveRecord => write!(f, "no ACTIVE_RECORD edge"),
            Self::MultipleActiveRecords { records } => {
                write!(f, "{} ACTIVE_RECORD edges", records.len())
            }
            Self::ActiveNotInHistory { record } => {
                write!(f, "active record {} lacks HAS_RECORD", record)
            }
            Self::MissingHistoryEdge { record } => write!(f, "record {} lacks HAS_RECORD", record),
            Self::BrokenChain { from, to } => write!(f, "no PRECEDES edge {} -> {}", from, to),
            Self::NoGenesis => write!(f, "no record starts the chain"),
            Self::MultipleHeads { records } => write!(f, "{} records start a chain", records.len()),
            Self::Cycle { record } => write!(f, "chain revisits record {}", record),
            Self::Unreachable { record } => {
                write!(f, "record {} is not reachable on the chain", record)
            }
            Self::ActiveNotAtTail { active, tail } => {
                write!(f, "chain ends at {} but {} is active", tail, active)
            }
        }
    }
}

/// An edge added by `repair`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RepairAction {
    AddedHistoryEdge { record: RecordId },
    AddedChainEdge { from: RecordId, to: RecordId },
    AddedActiveRecord { record: RecordId },
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddedHistoryEdge { record } => write!(f, "added HAS_RECORD -> {}", record),
            Self::AddedChainEdge { from, to } => write!(f, "added PRECEDES {} -> {}", from, to),
            Self::AddedActiveRecord { record } => write!(f, "added ACTIVE_RECORD -> {}", record),
        }
    }
}

/// Result of checking one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityReport {
    pub entity: EntityId,
    /// Number of HAS_RECORD members.
    pub records: usize,
    pub issues: Vec<IntegrityIssue>,
    /// Edges added by `repair`; empty for `verify`.
    pub repairs: Vec<RepairAction>,
}

impl IntegrityReport {
    pub fn is_consistent(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Everything `verify` and `repair` need about one entity.
struct Snapshot {
    active: Vec<RecordId>,
    members: HashMap<RecordId, VersionRecord>,
}

impl<S, T> VersioningEngine<S, T>
where
    S: GraphStore + Clone,
    T: Record,
{
    /// Check an entity's graph structure without changing it.
    pub async fn verify(&self, id: EntityId) -> EngineResult<IntegrityReport> {
        self.entity(id).await?;
        let snapshot = self.snapshot(id).await?;
        let mut issues = Vec::new();

        let active = match snapshot.active.as_slice() {
            [] => {
                issues.push(IntegrityIssue::MissingActiveRecord);
                None
            }
            [one] => Some(*one),
            many => {
                issues.push(IntegrityIssue::MultipleActiveRecords {
                    records: many.to_vec(),
                });
                None
            }
        };

        if let Some(active) = active {
            if !snapshot.members.contains_key(&active) {
                issues.push(IntegrityIssue::ActiveNotInHistory { record: active });
            }

            let (lineage, cycle) = self.lineage(active).await?;
            for record in &lineage {
                if record.id != active && !snapshot.members.contains_key(&record.id) {
                    issues.push(IntegrityIssue::MissingHistoryEdge { record: record.id });
                }
                if let Some(previous) = record.previous
                    && self
                        .edges
                        .find_between(previous.0, record.id.0, EdgeKind::Precedes)
                        .await?
                        .is_none()
                {
                    issues.push(IntegrityIssue::BrokenChain {
                        from: previous,
                        to: record.id,
                    });
                }
            }
            if let Some(record) = cycle {
                issues.push(IntegrityIssue::Cycle { record });
            }
        }

        let heads = self.heads(&snapshot).await?;
        match heads.len() {
            0 => issues.push(IntegrityIssue::NoGenesis),
            1 => {}
            _ => issues.push(IntegrityIssue::MultipleHeads {
                records: heads.clone(),
            }),
        }

        if let Some(genesis) = genesis(&snapshot, &heads) {
            let (walked, cycle) = self.walk_forward(genesis).await?;
            if let Some(record) = cycle {
                issues.push(IntegrityIssue::Cycle { record });
            }
            let visited: HashSet<RecordId> = walked.iter().copied().collect();
            let mut unreachable: Vec<RecordId> = snapshot
                .members
                .keys()
                .filter(|id| !visited.contains(id))
                .copied()
                .collect();
            unreachable.sort();
            issues.extend(
                unreachable
                    .into_iter()
                    .map(|record| IntegrityIssue::Unreachable { record }),
            );

            if let (Some(active), Some(&tail)) = (active, walked.last())
                && active != tail
            {
                issues.push(IntegrityIssue::ActiveNotAtTail { active, tail });
            }
        }

        Ok(IntegrityReport {
            entity: id,
            records: snapshot.members.len(),
            issues,
            repairs: Vec::new(),
        })
    }

    /// Add the edges a partially applied mutation failed to write, then
    /// verify again.
    ///
    /// Repairs are:
    /// - HAS_RECORD for records on the active record's lineage
    /// - PRECEDES between records linked by `previous`, where both
    ///   endpoints are still free
    /// - ACTIVE_RECORD to the chain tail when it is missing
    ///
    /// Orphan records left by lost swaps are never linked, since nothing
    /// in the entity's graph references them.
    pub async fn repair(&self, id: EntityId) -> EngineResult<IntegrityReport> {
        let before = self.verify(id).await?;
        if before.is_consistent() {
            return Ok(before);
        }

        let mut repairs = Vec::new();
        let snapshot = self.snapshot(id).await?;

        let mut candidates: Vec<VersionRecord> = snapshot.members.values().cloned().collect();
        if let [active] = snapshot.active.as_slice() {
            let (lineage, _) = self.lineage(*active).await?;
            for record in lineage {
                if !snapshot.members.contains_key(&record.id) {
                    if self
                        .edges
                        .create(EdgeKind::HasRecord, id.0, record.id.0)
                        .await?
                        .is_some()
                    {
                        warn!(entity_id = %id, record_id = %record.id, "repaired missing HAS_RECORD");
                        repairs.push(RepairAction::AddedHistoryEdge { record: record.id });
                    }
                    candidates.push(record);
                }
            }
        }

        candidates.sort_by_key(|record| record.created_at);
        for record in &candidates {
            let Some(previous) = record.previous else {
                continue;
            };
            if self
                .edges
                .find_between(previous.0, record.id.0, EdgeKind::Precedes)
                .await?
                .is_some()
            {
                continue;
            }
            let start_taken = self
                .edges
                .read(EdgeKind::Precedes, previous.0)
                .await?
                .is_some();
            let end_taken = self
                .edges
                .read_incoming(EdgeKind::Precedes, record.id.0)
                .await?
                .is_some();
            if start_taken || end_taken {
                warn!(entity_id = %id, from = %previous, to = %record.id, "chain gap cannot be repaired additively");
                continue;
            }
            if self
                .edges
                .create(EdgeKind::Precedes, previous.0, record.id.0)
                .await?
                .is_some()
            {
                warn!(entity_id = %id, from = %previous, to = %record.id, "repaired missing PRECEDES");
                repairs.push(RepairAction::AddedChainEdge {
                    from: previous,
                    to: record.id,
                });
            }
        }

        if snapshot.active.is_empty() {
            let snapshot = self.snapshot(id).await?;
            let heads = self.heads(&snapshot).await?;
            if let Some(genesis) = genesis(&snapshot, &heads) {
                let (walked, _) = self.walk_forward(genesis).await?;
                if let Some(&tail) = walked.last()
                    && self
                        .edges
                        .create(EdgeKind::ActiveRecord, id.0, tail.0)
                        .await?
                        .is_some()
                {
                    warn!(entity_id = %id, record_id = %tail, "repaired missing ACTIVE_RECORD");
                    repairs.push(RepairAction::AddedActiveRecord { record: tail });
                }
            }
        }

        let mut after = self.verify(id).await?;
        after.repairs = repairs;
        Ok(after)
    }

    async fn snapshot(&self, id: EntityId) -> EngineResult<Snapshot> {
        let active = self
            .edges
            .list(EdgeKind::ActiveRecord, id.0)
            .await?
            .into_iter()
            .map(|edge| RecordId::from_uuid(edge.end))
            .collect();

        let mut members = HashMap::new();
        for edge in self.edges.list(EdgeKind::HasRecord, id.0).await? {
            let record = self.nodes.get_record(RecordId::from_uuid(edge.end)).await?;
            members.insert(record.id, record);
        }
        Ok(Snapshot { active, members })
    }

    /// Follow `previous` back from `start`. Returns the records visited,
    /// newest first, and the record where a cycle closed, if any.
    async fn lineage(&self, start: RecordId) -> EngineResult<(Vec<VersionRecord>, Option<RecordId>)> {
        let mut seen = HashSet::new();
        let mut lineage = Vec::new();
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Ok((lineage, Some(id)));
            }
            let record = self.nodes.get_record(id).await?;
            cursor = record.previous;
            lineage.push(record);
        }
        Ok((lineage, None))
    }

    /// Follow PRECEDES edges from `start`. Returns the ids visited in order
    /// and the record where a cycle closed, if any.
    async fn walk_forward(&self, start: RecordId) -> EngineResult<(Vec<RecordId>, Option<RecordId>)> {
        let mut seen = HashSet::new();
        let mut walked = Vec::new();
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Ok((walked, Some(id)));
            }
            walked.push(id);
            cursor = self
                .edges
                .read(EdgeKind::Precedes, id.0)
                .await?
                .map(|edge| RecordId::from_uuid(edge.end));
        }
        Ok((walked, None))
    }

    /// History members with no incoming PRECEDES edge, oldest first.
    async fn heads(&self, snapshot: &Snapshot) -> EngineResult<Vec<RecordId>> {
        let mut heads = Vec::new();
        for record in snapshot.members.values() {
            if self
                .edges
                .read_incoming(EdgeKind::Precedes, record.id.0)
                .await?
                .is_none()
            {
                heads.push(record);
            }
        }
        heads.sort_by_key(|record| (record.created_at, record.id));
        Ok(heads.into_iter().map(|record| record.id).collect())
    }
}

/// The head to walk from: the CREATED one if present, else the oldest.
fn genesis(snapshot: &Snapshot, heads: &[RecordId]) -> Option<RecordId> {
    heads
        .iter()
        .find(|id| {
            snapshot
                .members
                .get(id)
                .is_some_and(|record| record.operation == Operation::Created)
        })
        .or_else(|| heads.first())
        .copied()
}
