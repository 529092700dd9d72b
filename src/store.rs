//! In-memory entity store.
//!
//! Explicit handle, no global singleton: constructed once at process start,
//! mutated through the services, and read by the tracers via cloned
//! snapshots. A single `RwLock` serializes writers, which is what upholds
//! the one-entry-per-(date, ingredient type) daily-log invariant under
//! concurrent batch creation; readers never block writers for the duration
//! of a trace because they compute over their own snapshot.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{
    BatchIngredientLink, BatchKind, DailyLogEntry, IngredientLot, IngredientType,
    IntermediateBatch, Product, ProductionRun, ReceivingReport, RunBatchLink,
};

/// Immutable copy of the store contents taken at the start of a trace.
/// Collections preserve insertion order.
#[derive(Clone, Debug, Default)]
pub struct StoreSnapshot {
    pub ingredient_types: Vec<IngredientType>,
    pub products: Vec<Product>,
    pub lots: Vec<IngredientLot>,
    pub receiving_reports: Vec<ReceivingReport>,
    pub daily_log: Vec<DailyLogEntry>,
    pub batches: Vec<IntermediateBatch>,
    pub batch_ingredient_links: Vec<BatchIngredientLink>,
    pub runs: Vec<ProductionRun>,
    pub run_batch_links: Vec<RunBatchLink>,
}

#[derive(Debug, Default)]
struct StoreInner {
    data: StoreSnapshot,
    next_lot_sequence: u64,
}

#[derive(Debug, Default)]
pub struct EntityStore {
    inner: RwLock<StoreInner>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clones the full dataset for a stateless trace computation.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.read().data.clone()
    }

    // --- Reference data ---

    pub fn insert_ingredient_type(&self, ingredient_type: IngredientType) {
        self.write().data.ingredient_types.push(ingredient_type);
    }

    pub fn get_ingredient_type(&self, id: Uuid) -> Option<IngredientType> {
        self.read()
            .data
            .ingredient_types
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn list_ingredient_types(&self) -> Vec<IngredientType> {
        self.read().data.ingredient_types.clone()
    }

    pub fn insert_product(&self, product: Product) {
        self.write().data.products.push(product);
    }

    pub fn get_product(&self, id: Uuid) -> Option<Product> {
        self.read()
            .data
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn list_products(&self) -> Vec<Product> {
        self.read().data.products.clone()
    }

    // --- Ingredient lots ---

    /// Inserts a lot, assigning its insertion sequence. Returns the stored
    /// value (the caller's `sequence` field is overwritten).
    pub fn insert_lot(&self, mut lot: IngredientLot) -> IngredientLot {
        let mut inner = self.write();
        lot.sequence = inner.next_lot_sequence;
        inner.next_lot_sequence += 1;
        inner.data.lots.push(lot.clone());
        lot
    }

    pub fn get_lot(&self, id: Uuid) -> Option<IngredientLot> {
        self.read().data.lots.iter().find(|l| l.id == id).cloned()
    }

    pub fn list_lots(&self) -> Vec<IngredientLot> {
        self.read().data.lots.clone()
    }

    pub fn list_lots_for_type(&self, ingredient_type_id: Uuid) -> Vec<IngredientLot> {
        self.read()
            .data
            .lots
            .iter()
            .filter(|l| l.ingredient_type_id == ingredient_type_id)
            .cloned()
            .collect()
    }

    pub fn update_lot_batch_code(&self, id: Uuid, batch_code: String) -> Option<IngredientLot> {
        let mut inner = self.write();
        let lot = inner.data.lots.iter_mut().find(|l| l.id == id)?;
        lot.batch_code = batch_code;
        Some(lot.clone())
    }

    /// Administrative removal. Link rows pointing at the lot are left in
    /// place and treated as dangling by the tracers.
    pub fn remove_lot(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let before = inner.data.lots.len();
        inner.data.lots.retain(|l| l.id != id);
        inner.data.lots.len() < before
    }

    // --- Receiving reports ---

    /// Inserts a report together with its line lots in one write, so a
    /// concurrent snapshot never sees the report without its lots.
    pub fn insert_receiving_report(
        &self,
        report: ReceivingReport,
        lots: Vec<IngredientLot>,
    ) -> Vec<IngredientLot> {
        let mut inner = self.write();
        let mut stored = Vec::with_capacity(lots.len());
        for mut lot in lots {
            lot.sequence = inner.next_lot_sequence;
            inner.next_lot_sequence += 1;
            inner.data.lots.push(lot.clone());
            stored.push(lot);
        }
        inner.data.receiving_reports.push(report);
        stored
    }

    pub fn get_receiving_report(&self, id: Uuid) -> Option<ReceivingReport> {
        self.read()
            .data
            .receiving_reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn remove_receiving_report(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let before = inner.data.receiving_reports.len();
        inner.data.receiving_reports.retain(|r| r.id != id);
        inner.data.receiving_reports.len() < before
    }

    // --- Daily active log ---

    pub fn get_daily_log_entry(
        &self,
        date: NaiveDate,
        ingredient_type_id: Uuid,
    ) -> Option<DailyLogEntry> {
        self.read()
            .data
            .daily_log
            .iter()
            .find(|e| e.date == date && e.ingredient_type_id == ingredient_type_id)
            .cloned()
    }

    pub fn list_daily_log_entries(&self, date: NaiveDate) -> Vec<DailyLogEntry> {
        self.read()
            .data
            .daily_log
            .iter()
            .filter(|e| e.date == date)
            .cloned()
            .collect()
    }

    /// Upsert by the (date, ingredient type) natural key: any existing entry
    /// for the pair is replaced, never duplicated.
    pub fn upsert_daily_log_entry(
        &self,
        date: NaiveDate,
        ingredient_type_id: Uuid,
        lot_id: Uuid,
    ) -> DailyLogEntry {
        let mut inner = self.write();
        inner
            .data
            .daily_log
            .retain(|e| !(e.date == date && e.ingredient_type_id == ingredient_type_id));
        let entry = DailyLogEntry::new(date, ingredient_type_id, lot_id);
        inner.data.daily_log.push(entry.clone());
        entry
    }

    pub fn remove_daily_log_entry(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let before = inner.data.daily_log.len();
        inner.data.daily_log.retain(|e| e.id != id);
        inner.data.daily_log.len() < before
    }

    // --- Intermediate batches ---

    /// Inserts a batch atomically with its consumed-lot links.
    pub fn insert_batch(&self, batch: IntermediateBatch, links: Vec<BatchIngredientLink>) {
        let mut inner = self.write();
        inner.data.batches.push(batch);
        inner.data.batch_ingredient_links.extend(links);
    }

    pub fn get_batch(&self, id: Uuid) -> Option<IntermediateBatch> {
        self.read()
            .data
            .batches
            .iter()
            .find(|b| b.id == id)
            .cloned()
    }

    pub fn list_batches(&self, kind: Option<BatchKind>) -> Vec<IntermediateBatch> {
        self.read()
            .data
            .batches
            .iter()
            .filter(|b| kind.map_or(true, |k| b.kind == k))
            .cloned()
            .collect()
    }

    pub fn list_batch_ingredient_links(&self) -> Vec<BatchIngredientLink> {
        self.read().data.batch_ingredient_links.clone()
    }

    pub fn remove_batch(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let before = inner.data.batches.len();
        inner.data.batches.retain(|b| b.id != id);
        inner.data.batches.len() < before
    }

    // --- Production runs ---

    /// Inserts a run atomically with its consumed-batch links.
    pub fn insert_run(&self, run: ProductionRun, links: Vec<RunBatchLink>) {
        let mut inner = self.write();
        inner.data.runs.push(run);
        inner.data.run_batch_links.extend(links);
    }

    pub fn get_run(&self, id: Uuid) -> Option<ProductionRun> {
        self.read().data.runs.iter().find(|r| r.id == id).cloned()
    }

    pub fn list_runs(&self) -> Vec<ProductionRun> {
        self.read().data.runs.clone()
    }

    pub fn list_run_batch_links(&self) -> Vec<RunBatchLink> {
        self.read().data.run_batch_links.clone()
    }

    pub fn remove_run(&self, id: Uuid) -> bool {
        let mut inner = self.write();
        let before = inner.data.runs.len();
        inner.data.runs.retain(|r| r.id != id);
        inner.data.runs.len() < before
    }
}
