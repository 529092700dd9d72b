//! Backward and forward genealogy traversal.
//!
//! Each trace is a stateless, single-shot computation: clone a snapshot of
//! the store, build the genealogy index over it, traverse. Code matching is
//! case-insensitive substring containment everywhere ("FL" matches
//! "FL-23-001"); because supplier and batch codes are free text and not
//! unique, substring matches can fan out to more entities than the caller
//! had in mind, which is the inherited, documented search behavior.
//!
//! Ordering is deterministic for identical store state and insertion
//! history: matched entities appear in store insertion order and traversal
//! neighbors in link insertion order, duplicates collapsed to their first
//! occurrence. Dangling link targets (removed lots/batches/runs) are
//! skipped, never an error.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::{BatchKind, IngredientLot, IntermediateBatch, ProductionRun},
    services::genealogy::GenealogyIndex,
    store::{EntityStore, StoreSnapshot},
};

/// How a backward trace identifies its production runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BackwardTraceQuery {
    RunId(Uuid),
    /// Case-insensitive substring match against run product batch codes;
    /// may resolve to multiple runs.
    ProductBatchCode(String),
}

/// Where a recall originates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ForwardTraceKind {
    /// Match ingredient lots by supplier batch code, optionally narrowed to
    /// one ingredient type.
    IngredientLotByCode { ingredient_type_id: Option<Uuid> },
    /// Match dough/filling batches by batch code.
    IntermediateBatchByCode,
    /// Match runs by product batch code directly (e.g. a customer complaint
    /// naming the product code).
    ProductBatchCodeDirect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputLine {
    pub product_id: Uuid,
    /// Resolved from the product catalog; `None` for a dangling reference.
    pub product_name: Option<String>,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub code: String,
    pub kind: BatchKind,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotSummary {
    pub lot_id: Uuid,
    pub ingredient_type_id: Uuid,
    /// Resolved from reference data; `None` for a dangling reference.
    pub ingredient_type_name: Option<String>,
    pub batch_code: String,
    pub best_before: NaiveDate,
    pub received_at: DateTime<Utc>,
}

/// One run's full ingredient genealogy. A run with no resolvable batches
/// still appears with empty lists: visibility of gaps matters more than
/// suppressing them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunGenealogy {
    pub run_id: Uuid,
    pub product_batch_code: String,
    pub run_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub outputs: Vec<OutputLine>,
    pub batches: Vec<BatchSummary>,
    /// Deduplicated by lot id across all of the run's batches.
    pub lots: Vec<LotSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenealogyReport {
    pub runs: Vec<RunGenealogy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunImpact {
    pub run_id: Uuid,
    pub product_batch_code: String,
    pub run_at: DateTime<Utc>,
    pub outputs: Vec<OutputLine>,
    /// Sum of this run's output quantities.
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub matched_lot_count: usize,
    pub impacted_batch_count: usize,
    pub impacted_run_count: usize,
    /// Total units across all impacted runs' outputs. Deliberately not
    /// deduplicated by product: a recall figure reflects units produced.
    pub total_quantity: i64,
}

/// Canonical recall report shape, identical for all three query kinds.
/// Levels that do not apply to a kind are empty (e.g. `matched_lots` for a
/// batch-originated recall). An all-empty report is a valid "zero impact
/// confirmed" result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactReport {
    pub query: String,
    pub kind: ForwardTraceKind,
    pub matched_lots: Vec<LotSummary>,
    pub impacted_batches: Vec<BatchSummary>,
    pub impacted_runs: Vec<RunImpact>,
    pub summary: ImpactSummary,
}

fn code_matches(code: &str, needle_lower: &str) -> bool {
    code.to_lowercase().contains(needle_lower)
}

/// Per-trace view over one snapshot: entity lookups plus the genealogy
/// index.
struct TraceContext<'a> {
    snapshot: &'a StoreSnapshot,
    index: GenealogyIndex,
    lots: HashMap<Uuid, &'a IngredientLot>,
    batches: HashMap<Uuid, &'a IntermediateBatch>,
    runs: HashMap<Uuid, &'a ProductionRun>,
    ingredient_type_names: HashMap<Uuid, &'a str>,
    product_names: HashMap<Uuid, &'a str>,
}

impl<'a> TraceContext<'a> {
    fn new(snapshot: &'a StoreSnapshot) -> Self {
        Self {
            index: GenealogyIndex::build(snapshot),
            lots: snapshot.lots.iter().map(|l| (l.id, l)).collect(),
            batches: snapshot.batches.iter().map(|b| (b.id, b)).collect(),
            runs: snapshot.runs.iter().map(|r| (r.id, r)).collect(),
            ingredient_type_names: snapshot
                .ingredient_types
                .iter()
                .map(|t| (t.id, t.name.as_str()))
                .collect(),
            product_names: snapshot
                .products
                .iter()
                .map(|p| (p.id, p.name.as_str()))
                .collect(),
            snapshot,
        }
    }

    fn lot_summary(&self, lot: &IngredientLot) -> LotSummary {
        LotSummary {
            lot_id: lot.id,
            ingredient_type_id: lot.ingredient_type_id,
            ingredient_type_name: self
                .ingredient_type_names
                .get(&lot.ingredient_type_id)
                .map(|n| (*n).to_string()),
            batch_code: lot.batch_code.clone(),
            best_before: lot.best_before,
            received_at: lot.received_at,
        }
    }

    fn batch_summary(&self, batch: &IntermediateBatch) -> BatchSummary {
        BatchSummary {
            batch_id: batch.id,
            code: batch.code.clone(),
            kind: batch.kind,
            name: batch.name.clone(),
        }
    }

    fn output_lines(&self, run: &ProductionRun) -> Vec<OutputLine> {
        run.outputs
            .iter()
            .map(|o| OutputLine {
                product_id: o.product_id,
                product_name: self.product_names.get(&o.product_id).map(|n| (*n).to_string()),
                quantity: o.quantity,
            })
            .collect()
    }

    fn run_impact(&self, run: &ProductionRun) -> RunImpact {
        RunImpact {
            run_id: run.id,
            product_batch_code: run.product_batch_code.clone(),
            run_at: run.run_at,
            outputs: self.output_lines(run),
            quantity: run.total_quantity(),
        }
    }

    /// Resolvable batches of a run, link order, dangling ids skipped.
    fn run_batches(&self, run_id: Uuid) -> Vec<&'a IntermediateBatch> {
        self.index
            .batches_for_run(run_id)
            .iter()
            .filter_map(|id| self.batches.get(id).copied())
            .collect()
    }

    fn run_genealogy(&self, run: &ProductionRun) -> RunGenealogy {
        let batches = self.run_batches(run.id);

        let mut lots: Vec<LotSummary> = Vec::new();
        let mut seen_lots: Vec<Uuid> = Vec::new();
        for batch in &batches {
            for lot_id in self.index.lots_for_batch(batch.id) {
                if seen_lots.contains(lot_id) {
                    continue;
                }
                seen_lots.push(*lot_id);
                if let Some(lot) = self.lots.get(lot_id) {
                    lots.push(self.lot_summary(lot));
                }
            }
        }

        RunGenealogy {
            run_id: run.id,
            product_batch_code: run.product_batch_code.clone(),
            run_at: run.run_at,
            created_by: run.created_by,
            outputs: self.output_lines(run),
            batches: batches.iter().map(|b| self.batch_summary(b)).collect(),
            lots,
        }
    }

    /// Fans out from a set of batch ids to their summaries and the impacted
    /// runs, both deduplicated in first-seen order. Dangling batch ids are
    /// dropped from the batch list but still traversed for runs: a removed
    /// batch does not erase its downstream impact.
    fn fan_out_from_batches(&self, batch_ids: &[Uuid]) -> (Vec<BatchSummary>, Vec<RunImpact>) {
        let mut batches: Vec<BatchSummary> = Vec::new();
        let mut runs: Vec<RunImpact> = Vec::new();
        let mut seen_runs: Vec<Uuid> = Vec::new();

        for batch_id in batch_ids {
            if let Some(batch) = self.batches.get(batch_id) {
                batches.push(self.batch_summary(batch));
            }
            for run_id in self.index.runs_for_batch(*batch_id) {
                if seen_runs.contains(run_id) {
                    continue;
                }
                seen_runs.push(*run_id);
                if let Some(run) = self.runs.get(run_id) {
                    runs.push(self.run_impact(run));
                }
            }
        }

        (batches, runs)
    }
}

#[derive(Clone)]
pub struct TraceabilityService {
    store: Arc<EntityStore>,
}

impl TraceabilityService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Full ingredient genealogy for the matched production runs.
    #[instrument(skip(self))]
    pub fn trace_backward(&self, query: &BackwardTraceQuery) -> GenealogyReport {
        let snapshot = self.store.snapshot();
        let ctx = TraceContext::new(&snapshot);

        let matched: Vec<&ProductionRun> = match query {
            BackwardTraceQuery::RunId(id) => {
                ctx.snapshot.runs.iter().filter(|r| r.id == *id).collect()
            }
            BackwardTraceQuery::ProductBatchCode(code) => {
                let needle = code.to_lowercase();
                ctx.snapshot
                    .runs
                    .iter()
                    .filter(|r| code_matches(&r.product_batch_code, &needle))
                    .collect()
            }
        };

        GenealogyReport {
            runs: matched.iter().map(|r| ctx.run_genealogy(r)).collect(),
        }
    }

    /// Recall impact analysis. See [`ImpactReport`] for the canonical shape.
    #[instrument(skip(self))]
    pub fn trace_forward(&self, query: &str, kind: ForwardTraceKind) -> ImpactReport {
        let snapshot = self.store.snapshot();
        let ctx = TraceContext::new(&snapshot);
        let needle = query.to_lowercase();

        let mut matched_lots: Vec<LotSummary> = Vec::new();
        let mut impacted_batches: Vec<BatchSummary> = Vec::new();
        let mut impacted_runs: Vec<RunImpact> = Vec::new();

        match &kind {
            ForwardTraceKind::IngredientLotByCode { ingredient_type_id } => {
                let lots: Vec<&IngredientLot> = ctx
                    .snapshot
                    .lots
                    .iter()
                    .filter(|l| {
                        ingredient_type_id.map_or(true, |t| l.ingredient_type_id == t)
                            && code_matches(&l.batch_code, &needle)
                    })
                    .collect();

                let mut batch_ids: Vec<Uuid> = Vec::new();
                for lot in &lots {
                    matched_lots.push(ctx.lot_summary(lot));
                    for batch_id in ctx.index.batches_for_lot(lot.id) {
                        if !batch_ids.contains(batch_id) {
                            batch_ids.push(*batch_id);
                        }
                    }
                }

                let (batches, runs) = ctx.fan_out_from_batches(&batch_ids);
                impacted_batches = batches;
                impacted_runs = runs;
            }
            ForwardTraceKind::IntermediateBatchByCode => {
                let batch_ids: Vec<Uuid> = ctx
                    .snapshot
                    .batches
                    .iter()
                    .filter(|b| code_matches(&b.code, &needle))
                    .map(|b| b.id)
                    .collect();

                let (batches, runs) = ctx.fan_out_from_batches(&batch_ids);
                impacted_batches = batches;
                impacted_runs = runs;
            }
            ForwardTraceKind::ProductBatchCodeDirect => {
                let runs: Vec<&ProductionRun> = ctx
                    .snapshot
                    .runs
                    .iter()
                    .filter(|r| code_matches(&r.product_batch_code, &needle))
                    .collect();

                // Derived backward from the matched runs for display
                // symmetry with the other two kinds.
                let mut seen_batches: Vec<Uuid> = Vec::new();
                for run in &runs {
                    impacted_runs.push(ctx.run_impact(run));
                    for batch in ctx.run_batches(run.id) {
                        if !seen_batches.contains(&batch.id) {
                            seen_batches.push(batch.id);
                            impacted_batches.push(ctx.batch_summary(batch));
                        }
                    }
                }
            }
        }

        let total_quantity = impacted_runs.iter().map(|r| r.quantity).sum();
        let summary = ImpactSummary {
            matched_lot_count: matched_lots.len(),
            impacted_batch_count: impacted_batches.len(),
            impacted_run_count: impacted_runs.len(),
            total_quantity,
        };

        ImpactReport {
            query: query.to_string(),
            kind,
            matched_lots,
            impacted_batches,
            impacted_runs,
            summary,
        }
    }
}
