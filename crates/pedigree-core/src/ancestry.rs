//! Ancestry traversal: bounded, cycle-safe walk over mother/father edges

use crate::error::{Error, Result};
use crate::horse::{Horse, HorseId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Family tree query: a root horse and how many generations to climb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestryQuery {
    pub root: HorseId,
    pub generations: u32,
}

impl AncestryQuery {
    /// Build a query, rejecting negative or oversized generation counts
    pub fn new(root: HorseId, generations: i64) -> Result<Self> {
        if generations < 0 {
            return Err(Error::InvalidInput(format!(
                "generations must be a non-negative integer, got {}",
                generations
            )));
        }
        let generations = u32::try_from(generations).map_err(|_| {
            Error::InvalidInput(format!("generations out of range: {}", generations))
        })?;
        Ok(Self { root, generations })
    }

    /// Build a query from a raw generation count as typed by a user
    pub fn parse(root: HorseId, generations: &str) -> Result<Self> {
        let parsed = generations.trim().parse::<i64>().map_err(|_| {
            Error::InvalidInput(format!(
                "generations must be a non-negative integer, got '{}'",
                generations
            ))
        })?;
        Self::new(root, parsed)
    }
}

/// One visited horse with its distance from the root.
///
/// Records are output only; the path is not part of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestorRecord {
    #[serde(flatten)]
    pub horse: Horse,

    /// Hops from the root (root = 0)
    pub generation: u32,

    /// Dash-joined ids from the root down to this horse
    pub path_signature: String,

    #[serde(skip)]
    path: Vec<HorseId>,
}

impl AncestorRecord {
    fn new(horse: Horse, generation: u32, path: Vec<HorseId>) -> Self {
        Self {
            path_signature: signature(&path),
            horse,
            generation,
            path,
        }
    }

    pub fn id(&self) -> HorseId {
        self.horse.id
    }

    /// Ids from the root to this horse
    pub fn path(&self) -> &[HorseId] {
        &self.path
    }
}

fn signature(path: &[HorseId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_emitted: usize,
    pub edges_followed: usize,
    pub cycles_suppressed: usize,
    pub dangling_references: usize,
    pub max_generation_reached: u32,
}

struct Frame<'a> {
    horse: &'a Horse,
    generation: u32,
    path: Vec<HorseId>,
}

/// Ancestry resolver over an in-memory snapshot of the herd
pub struct AncestryResolver;

impl AncestryResolver {
    /// Resolve the ancestors of `query.root`, ordered by path signature
    pub fn resolve(query: &AncestryQuery, horses: &[Horse]) -> Vec<AncestorRecord> {
        Self::resolve_with_stats(query, horses).0
    }

    pub fn resolve_with_stats(
        query: &AncestryQuery,
        horses: &[Horse],
    ) -> (Vec<AncestorRecord>, TraversalStats) {
        tracing::debug!(
            "Resolving ancestry: root={}, generations={}",
            query.root,
            query.generations
        );

        let index: HashMap<HorseId, &Horse> = horses.iter().map(|h| (h.id, h)).collect();
        let mut stats = TraversalStats::default();

        let Some(root) = index.get(&query.root) else {
            tracing::debug!("Root horse {} not present, empty ancestry", query.root);
            return (Vec::new(), stats);
        };

        let mut records = Vec::new();
        let mut stack = vec![Frame {
            horse: *root,
            generation: 0,
            path: vec![root.id],
        }];

        while let Some(frame) = stack.pop() {
            stats.nodes_emitted += 1;
            stats.max_generation_reached = stats.max_generation_reached.max(frame.generation);

            if frame.generation < query.generations {
                // Pushed father-first so the mother is popped and expanded first
                let mut parents: Vec<HorseId> = frame.horse.parent_ids().collect();
                // A horse listed as both mother and father is expanded once
                parents.dedup();
                for parent_id in parents.into_iter().rev() {
                    if frame.path.contains(&parent_id) {
                        tracing::warn!(
                            "Cyclic parent edge {} -> {} ignored",
                            frame.horse.id,
                            parent_id
                        );
                        stats.cycles_suppressed += 1;
                        continue;
                    }
                    let Some(parent) = index.get(&parent_id) else {
                        tracing::debug!(
                            "Horse {} references missing parent {}",
                            frame.horse.id,
                            parent_id
                        );
                        stats.dangling_references += 1;
                        continue;
                    };

                    stats.edges_followed += 1;
                    let mut path = frame.path.clone();
                    path.push(parent_id);
                    stack.push(Frame {
                        horse: *parent,
                        generation: frame.generation + 1,
                        path,
                    });
                }
            }

            records.push(AncestorRecord::new(
                frame.horse.clone(),
                frame.generation,
                frame.path,
            ));
        }

        records.sort_by(|a, b| a.path_signature.cmp(&b.path_signature));

        tracing::debug!(
            "Ancestry of {} resolved: {} records, {} edges, {} cycles suppressed",
            query.root,
            stats.nodes_emitted,
            stats.edges_followed,
            stats.cycles_suppressed
        );

        (records, stats)
    }
}

/// Nested family tree rebuilt from the flat resolver output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestryTree {
    #[serde(flatten)]
    pub record: AncestorRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother: Option<Box<AncestryTree>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father: Option<Box<AncestryTree>>,
}

impl AncestryTree {
    /// Reassemble records into a tree rooted at the generation-0 record
    pub fn from_records(records: &[AncestorRecord]) -> Option<Self> {
        let by_path: HashMap<&[HorseId], &AncestorRecord> =
            records.iter().map(|r| (r.path(), r)).collect();
        let root = records.iter().find(|r| r.generation == 0)?;
        Some(Self::build(root, &by_path))
    }

    fn build(record: &AncestorRecord, by_path: &HashMap<&[HorseId], &AncestorRecord>) -> Self {
        let child = |parent: Option<HorseId>| {
            parent.and_then(|id| {
                let mut path = record.path().to_vec();
                path.push(id);
                by_path
                    .get(path.as_slice())
                    .map(|r| Box::new(Self::build(r, by_path)))
            })
        };

        let father_id = record
            .horse
            .father_id
            .filter(|id| record.horse.mother_id != Some(*id));

        Self {
            mother: child(record.horse.mother_id),
            father: child(father_id),
            record: record.clone(),
        }
    }

    /// Number of horses in the tree, counting repeated ancestors each time
    pub fn size(&self) -> usize {
        1 + self.mother.as_ref().map_or(0, |m| m.size())
            + self.father.as_ref().map_or(0, |f| f.size())
    }
}
