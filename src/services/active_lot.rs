//! Daily active-lot resolution.
//!
//! Answers "which received lot is in use for this ingredient on this date".
//! Consulted by batch-creation flows with today's date to pre-select
//! ingredients; the operator may override the suggestion, and the override
//! is what ends up in the batch's lot links.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{DailyLogEntry, IngredientLot},
    store::EntityStore,
};

#[derive(Clone)]
pub struct ActiveLotService {
    store: Arc<EntityStore>,
    event_sender: Arc<EventSender>,
}

impl ActiveLotService {
    pub fn new(store: Arc<EntityStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    /// Resolves the active lot for an ingredient type on a date.
    ///
    /// 1. An exact (date, type) daily-log entry wins, with no freshness
    ///    re-check; a dangling lot reference falls through to the fallback.
    /// 2. Otherwise carry forward: the most recently received lot of the
    ///    type regardless of date, `received_at` descending with ties broken
    ///    by highest insertion sequence.
    /// 3. `None` when no lot of the type exists. Callers treat that as
    ///    "ingredient unavailable today", not as a failure.
    #[instrument(skip(self))]
    pub fn resolve_active_lot(
        &self,
        date: NaiveDate,
        ingredient_type_id: Uuid,
    ) -> Option<IngredientLot> {
        if let Some(entry) = self.store.get_daily_log_entry(date, ingredient_type_id) {
            if let Some(lot) = self.store.get_lot(entry.lot_id) {
                return Some(lot);
            }
        }

        self.store
            .list_lots_for_type(ingredient_type_id)
            .into_iter()
            .max_by_key(|l| (l.received_at, l.sequence))
    }

    /// Received lots of an ingredient type, newest first.
    pub fn lots_for_ingredient(&self, ingredient_type_id: Uuid) -> Vec<IngredientLot> {
        let mut lots = self.store.list_lots_for_type(ingredient_type_id);
        lots.sort_by(|a, b| {
            (b.received_at, b.sequence).cmp(&(a.received_at, a.sequence))
        });
        lots
    }

    /// Operator override: pins a lot as the day's active lot for its
    /// ingredient type. The lot must exist and belong to the given type.
    #[instrument(skip(self))]
    pub async fn set_active_lot(
        &self,
        date: NaiveDate,
        ingredient_type_id: Uuid,
        lot_id: Uuid,
    ) -> Result<DailyLogEntry, ServiceError> {
        let lot = self
            .store
            .get_lot(lot_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        if lot.ingredient_type_id != ingredient_type_id {
            return Err(ServiceError::ValidationError(format!(
                "Lot {} belongs to a different ingredient type",
                lot_id
            )));
        }

        let entry = self
            .store
            .upsert_daily_log_entry(date, ingredient_type_id, lot_id);

        self.event_sender
            .send_or_log(Event::DailyLogUpdated {
                date,
                ingredient_type_id,
                lot_id,
            })
            .await;

        Ok(entry)
    }

    /// Administrative removal of a daily-log entry.
    #[instrument(skip(self))]
    pub async fn remove_entry(&self, entry_id: Uuid) -> Result<(), ServiceError> {
        if !self.store.remove_daily_log_entry(entry_id) {
            return Err(ServiceError::NotFound(format!(
                "Daily log entry {} not found",
                entry_id
            )));
        }

        self.event_sender
            .send_or_log(Event::DailyLogEntryRemoved(entry_id))
            .await;

        Ok(())
    }
}
