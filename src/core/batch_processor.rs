//! Batch processing with account-based grouping
//!
//! This module provides the `BatchProcessor` struct, which processes a batch of
//! ledger commands concurrently while keeping the outcome identical to
//! processing them one by one in input order.
//!
//! # Design
//!
//! Two commands conflict when they touch a common account reference. Conflicts
//! are transitive through transfers: `a -> b` followed by `b -> c` ties `a`,
//! `b` and `c` together. The processor joins references with a union-find and
//! splits the batch into groups whose reference sets are disjoint:
//!
//! ```text
//! open a | open b | open c | a -> b | deposit c
//!   └─ group 0: open a, open b, a -> b
//!   └─ group 1: open c, deposit c
//! ```
//!
//! Each group runs on its own tokio task and applies its commands in input
//! order. Groups never share an account, so their interleaving cannot change
//! any balance or outcome.

use std::collections::HashMap;

use super::LedgerEngine;
use crate::types::{LedgerCommand, LedgerError};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: LedgerCommand,

    /// The result of processing (success or error)
    pub result: Result<(), LedgerError>,
}

/// Batch processor with account-based grouping
///
/// The processor is cheap to clone; clones share the same engine.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    engine: LedgerEngine,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over `engine`
    pub fn new(engine: LedgerEngine) -> Self {
        Self { engine }
    }

    /// The engine commands are applied to
    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    /// Split a batch into groups of commands over disjoint account references
    ///
    /// # Guarantees
    ///
    /// - Each command appears in exactly one group
    /// - Commands inside a group keep their input order
    /// - Two commands sharing a reference, directly or through a chain of
    ///   transfers, land in the same group
    /// - Groups are ordered by the position of their first command
    ///
    /// Commands are returned with their position in the batch.
    pub fn partition_by_accounts(
        &self,
        batch: Vec<LedgerCommand>,
    ) -> Vec<Vec<(usize, LedgerCommand)>> {
        let mut sets = DisjointSets::default();

        let roots: Vec<usize> = batch
            .iter()
            .map(|command| {
                let mut references = command.references().into_iter();
                // Every command names at least one reference
                let first = references.next().map_or(0, |r| sets.index_of(r));
                for reference in references {
                    let other = sets.index_of(reference);
                    sets.union(first, other);
                }
                first
            })
            .collect();

        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<(usize, LedgerCommand)>> = Vec::new();

        for (position, (command, index)) in batch.into_iter().zip(roots).enumerate() {
            let root = sets.find(index);
            let group = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[group].push((position, command));
        }

        groups
    }

    /// Process the commands of one group sequentially
    ///
    /// All commands are processed even if some fail. Results are in input order.
    pub async fn process_group(
        &self,
        commands: Vec<(usize, LedgerCommand)>,
    ) -> Vec<(usize, ProcessingResult)> {
        let mut results = Vec::with_capacity(commands.len());

        for (position, command) in commands {
            let result = self.engine.process(command.clone());
            if let Err(e) = &result {
                tracing::warn!(command = command.name(), error = %e, "Command rejected");
            }
            results.push((position, ProcessingResult { command, result }));
        }

        results
    }

    /// Process a batch of commands with account-based grouping
    ///
    /// This method:
    /// 1. Partitions the batch into groups over disjoint references
    /// 2. Spawns a tokio task per group
    /// 3. Waits for all tasks to complete
    ///
    /// Results are returned in input order. A panicked group task is logged and
    /// its results are missing from the output.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let groups = self.partition_by_accounts(batch);
        tracing::debug!(groups = groups.len(), "Batch partitioned");

        let mut tasks = Vec::with_capacity(groups.len());
        for commands in groups {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_group(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => tracing::error!(error = %e, "Group task panicked"),
            }
        }

        results.sort_by_key(|(position, _)| *position);
        results.into_iter().map(|(_, result)| result).collect()
    }
}

/// Union-find over account references
#[derive(Debug, Default)]
struct DisjointSets {
    indices: HashMap<String, usize>,
    parents: Vec<usize>,
}

impl DisjointSets {
    fn index_of(&mut self, reference: &str) -> usize {
        if let Some(index) = self.indices.get(reference) {
            return *index;
        }

        let index = self.parents.len();
        self.parents.push(index);
        self.indices.insert(reference.to_string(), index);
        index
    }

    fn find(&mut self, mut index: usize) -> usize {
        while self.parents[index] != index {
            // Path halving
            self.parents[index] = self.parents[self.parents[index]];
            index = self.parents[index];
        }
        index
    }

    fn union(&mut self, a: usize, b: usize) {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a != root_b {
            self.parents[root_b] = root_a;
        }
    }
}
