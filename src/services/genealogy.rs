//! Genealogy index over the raw link tables.
//!
//! Built fresh from a snapshot at the start of every trace: O(link rows),
//! cheap at the data sizes involved (hundreds to low thousands of rows), and
//! a rebuild always yields an identical index for identical store state.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::store::StoreSnapshot;

/// Four adjacency maps over the lot→batch→run join graph. Neighbor lists
/// preserve link insertion order with duplicate rows collapsed, so traversal
/// output is deterministic given identical insertion history.
#[derive(Debug, Default)]
pub struct GenealogyIndex {
    lot_to_batches: HashMap<Uuid, Vec<Uuid>>,
    batch_to_lots: HashMap<Uuid, Vec<Uuid>>,
    batch_to_runs: HashMap<Uuid, Vec<Uuid>>,
    run_to_batches: HashMap<Uuid, Vec<Uuid>>,
}

fn push_unique(
    map: &mut HashMap<Uuid, Vec<Uuid>>,
    seen: &mut HashSet<(Uuid, Uuid)>,
    from: Uuid,
    to: Uuid,
) {
    if seen.insert((from, to)) {
        map.entry(from).or_default().push(to);
    }
}

impl GenealogyIndex {
    pub fn build(snapshot: &StoreSnapshot) -> Self {
        let mut index = Self::default();
        let mut seen_forward = HashSet::new();
        let mut seen_inverse = HashSet::new();

        for link in &snapshot.batch_ingredient_links {
            push_unique(
                &mut index.lot_to_batches,
                &mut seen_forward,
                link.lot_id,
                link.batch_id,
            );
            push_unique(
                &mut index.batch_to_lots,
                &mut seen_inverse,
                link.batch_id,
                link.lot_id,
            );
        }

        seen_forward.clear();
        seen_inverse.clear();

        for link in &snapshot.run_batch_links {
            push_unique(
                &mut index.batch_to_runs,
                &mut seen_forward,
                link.batch_id,
                link.run_id,
            );
            push_unique(
                &mut index.run_to_batches,
                &mut seen_inverse,
                link.run_id,
                link.batch_id,
            );
        }

        index
    }

    pub fn batches_for_lot(&self, lot_id: Uuid) -> &[Uuid] {
        self.lot_to_batches.get(&lot_id).map_or(&[], Vec::as_slice)
    }

    pub fn lots_for_batch(&self, batch_id: Uuid) -> &[Uuid] {
        self.batch_to_lots.get(&batch_id).map_or(&[], Vec::as_slice)
    }

    pub fn runs_for_batch(&self, batch_id: Uuid) -> &[Uuid] {
        self.batch_to_runs.get(&batch_id).map_or(&[], Vec::as_slice)
    }

    pub fn batches_for_run(&self, run_id: Uuid) -> &[Uuid] {
        self.run_to_batches.get(&run_id).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchIngredientLink, BatchKind, RunBatchLink};

    #[test]
    fn duplicate_link_rows_collapse() {
        let lot = Uuid::new_v4();
        let batch = Uuid::new_v4();
        let snapshot = StoreSnapshot {
            batch_ingredient_links: vec![
                BatchIngredientLink::new(batch, lot),
                BatchIngredientLink::new(batch, lot),
            ],
            ..Default::default()
        };

        let index = GenealogyIndex::build(&snapshot);
        assert_eq!(index.batches_for_lot(lot), &[batch]);
        assert_eq!(index.lots_for_batch(batch), &[lot]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let run = Uuid::new_v4();
        let batch_a = Uuid::new_v4();
        let batch_b = Uuid::new_v4();
        let snapshot = StoreSnapshot {
            run_batch_links: vec![
                RunBatchLink::new(run, batch_a, BatchKind::Dough),
                RunBatchLink::new(run, batch_b, BatchKind::Filling),
            ],
            ..Default::default()
        };

        let first = GenealogyIndex::build(&snapshot);
        let second = GenealogyIndex::build(&snapshot);
        assert_eq!(first.batches_for_run(run), second.batches_for_run(run));
        assert_eq!(first.batches_for_run(run), &[batch_a, batch_b]);
    }

    #[test]
    fn unknown_ids_return_empty_slices() {
        let index = GenealogyIndex::build(&StoreSnapshot::default());
        assert!(index.batches_for_lot(Uuid::new_v4()).is_empty());
        assert!(index.runs_for_batch(Uuid::new_v4()).is_empty());
    }
}
