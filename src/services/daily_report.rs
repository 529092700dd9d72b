//! Daily production summary: what was made on a date and from which lots.
//! Plain structured data for the host's report rendering.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    models::BatchKind,
    services::{genealogy::GenealogyIndex, traceability::OutputLine},
    store::EntityStore,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchLine {
    pub batch_id: Uuid,
    pub code: String,
    pub kind: BatchKind,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Supplier batch codes of the lots consumed, link order.
    pub lot_codes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLine {
    pub run_id: Uuid,
    pub product_batch_code: String,
    pub run_at: DateTime<Utc>,
    pub dough_batch_codes: Vec<String>,
    pub filling_batch_codes: Vec<String>,
    pub outputs: Vec<OutputLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyProductionReport {
    pub date: NaiveDate,
    pub batches: Vec<BatchLine>,
    pub runs: Vec<RunLine>,
}

#[derive(Clone)]
pub struct DailyReportService {
    store: Arc<EntityStore>,
}

impl DailyReportService {
    pub fn new(store: Arc<EntityStore>) -> Self {
        Self { store }
    }

    /// Batches and runs of one calendar date (UTC), insertion order, with
    /// their consumed codes resolved. Dangling references are skipped.
    #[instrument(skip(self))]
    pub fn daily_report(&self, date: NaiveDate) -> DailyProductionReport {
        let snapshot = self.store.snapshot();
        let index = GenealogyIndex::build(&snapshot);

        let lot_codes: HashMap<Uuid, &str> = snapshot
            .lots
            .iter()
            .map(|l| (l.id, l.batch_code.as_str()))
            .collect();
        let batches_by_id: HashMap<Uuid, _> =
            snapshot.batches.iter().map(|b| (b.id, b)).collect();
        let product_names: HashMap<Uuid, &str> = snapshot
            .products
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();

        let batches = snapshot
            .batches
            .iter()
            .filter(|b| b.created_at.date_naive() == date)
            .map(|b| BatchLine {
                batch_id: b.id,
                code: b.code.clone(),
                kind: b.kind,
                name: b.name.clone(),
                created_at: b.created_at,
                lot_codes: index
                    .lots_for_batch(b.id)
                    .iter()
                    .filter_map(|id| lot_codes.get(id).map(|c| (*c).to_string()))
                    .collect(),
            })
            .collect();

        let runs = snapshot
            .runs
            .iter()
            .filter(|r| r.run_at.date_naive() == date)
            .map(|r| {
                let mut dough_batch_codes = Vec::new();
                let mut filling_batch_codes = Vec::new();
                for batch_id in index.batches_for_run(r.id) {
                    if let Some(batch) = batches_by_id.get(batch_id) {
                        match batch.kind {
                            BatchKind::Dough => dough_batch_codes.push(batch.code.clone()),
                            BatchKind::Filling => filling_batch_codes.push(batch.code.clone()),
                        }
                    }
                }
                RunLine {
                    run_id: r.id,
                    product_batch_code: r.product_batch_code.clone(),
                    run_at: r.run_at,
                    dough_batch_codes,
                    filling_batch_codes,
                    outputs: r
                        .outputs
                        .iter()
                        .map(|o| OutputLine {
                            product_id: o.product_id,
                            product_name: product_names
                                .get(&o.product_id)
                                .map(|n| (*n).to_string()),
                            quantity: o.quantity,
                        })
                        .collect(),
                }
            })
            .collect();

        DailyProductionReport {
            date,
            batches,
            runs,
        }
    }
}
