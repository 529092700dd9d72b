//! Intermediate batch creation (dough and filling).
//!
//! Creating a batch is a documented two-step transaction: first the batch
//! and its lot links are inserted atomically, then the daily log is upserted
//! for each consumed ingredient type so the day's active-lot selections
//! reflect what was actually used. The second step is explicit rather than
//! hidden inside the store so it can be tested in isolation.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{BatchIngredientLink, BatchKind, IngredientLot, IntermediateBatch},
    store::EntityStore,
};

/// Input for creating an intermediate batch.
#[derive(Debug, Clone)]
pub struct CreateBatchInput {
    pub code: String,
    pub kind: BatchKind,
    pub name: String,
    pub created_by: Uuid,
    /// Lots actually consumed. Usually pre-filled from the active-lot
    /// resolver, but the operator's final selection is what lands here.
    pub lot_ids: Vec<Uuid>,
    /// Defaults to now.
    pub created_at: Option<DateTime<Utc>>,
    /// Production date for the daily-log confirmation step. Defaults to the
    /// creation timestamp's calendar date (UTC).
    pub production_date: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct BatchService {
    store: Arc<EntityStore>,
    event_sender: Arc<EventSender>,
}

impl BatchService {
    pub fn new(store: Arc<EntityStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    /// Creates a batch with its consumed-lot links, then confirms the day's
    /// active lots. Rejects an empty or unresolvable lot set.
    #[instrument(skip(self, input), fields(code = %input.code, kind = %input.kind))]
    pub async fn create_batch(&self, input: CreateBatchInput) -> Result<Uuid, ServiceError> {
        let mut lot_ids: Vec<Uuid> = Vec::new();
        for id in input.lot_ids {
            if !lot_ids.contains(&id) {
                lot_ids.push(id);
            }
        }

        if lot_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "A batch requires at least one ingredient lot".to_string(),
            ));
        }

        let mut lots: Vec<IngredientLot> = Vec::with_capacity(lot_ids.len());
        for id in &lot_ids {
            let lot = self.store.get_lot(*id).ok_or_else(|| {
                ServiceError::ValidationError(format!("Ingredient lot {} not found", id))
            })?;
            lots.push(lot);
        }

        let mut batch = IntermediateBatch::new(input.code, input.kind, input.name, input.created_by);
        if let Some(created_at) = input.created_at {
            batch.created_at = created_at;
        }
        let batch_id = batch.id;
        let links = lot_ids
            .iter()
            .map(|lot_id| BatchIngredientLink::new(batch_id, *lot_id))
            .collect();

        self.store.insert_batch(batch.clone(), links);

        // Step two: creating a batch confirms today's active lot selections.
        let date = input
            .production_date
            .unwrap_or_else(|| batch.created_at.date_naive());
        for lot in &lots {
            self.store
                .upsert_daily_log_entry(date, lot.ingredient_type_id, lot.id);
            self.event_sender
                .send_or_log(Event::DailyLogUpdated {
                    date,
                    ingredient_type_id: lot.ingredient_type_id,
                    lot_id: lot.id,
                })
                .await;
        }

        self.event_sender
            .send_or_log(Event::BatchCreated {
                batch_id,
                kind: batch.kind,
                code: batch.code,
            })
            .await;

        Ok(batch_id)
    }

    /// Batches of one kind (or all), newest first.
    pub fn list_batches(&self, kind: Option<BatchKind>) -> Vec<IntermediateBatch> {
        let mut batches = self.store.list_batches(kind);
        batches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        batches
    }

    /// Administrative removal. Link rows referencing the batch stay behind
    /// as dangling references.
    #[instrument(skip(self))]
    pub async fn remove_batch(&self, batch_id: Uuid) -> Result<(), ServiceError> {
        if !self.store.remove_batch(batch_id) {
            return Err(ServiceError::NotFound(format!(
                "Batch {} not found",
                batch_id
            )));
        }

        self.event_sender
            .send_or_log(Event::BatchRemoved(batch_id))
            .await;
        Ok(())
    }
}
