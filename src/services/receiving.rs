//! Goods-in: single lot receipt and multi-line receiving reports.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{IngredientLot, ReceivingReport, StorageCondition, Unit},
    store::EntityStore,
};

/// Input for receiving a single lot.
#[derive(Debug, Clone)]
pub struct ReceiveLotInput {
    pub ingredient_type_id: Uuid,
    pub batch_code: String,
    /// Defaults to now.
    pub received_at: Option<DateTime<Utc>>,
    pub best_before: NaiveDate,
    pub received_by: Uuid,
    pub quantity: Option<Decimal>,
    pub unit: Option<Unit>,
    pub storage: StorageCondition,
    pub notes: Option<String>,
}

/// One line of a receiving report. Timestamp and receiver come from the
/// report itself.
#[derive(Debug, Clone)]
pub struct ReceivingLineInput {
    pub ingredient_type_id: Uuid,
    pub batch_code: String,
    pub best_before: NaiveDate,
    pub quantity: Option<Decimal>,
    pub unit: Option<Unit>,
    pub storage: StorageCondition,
    pub notes: Option<String>,
}

/// Input for creating a receiving report with its lines.
#[derive(Debug, Clone)]
pub struct CreateReceivingReportInput {
    pub received_at: Option<DateTime<Utc>>,
    pub received_by: Uuid,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ReceivingService {
    store: Arc<EntityStore>,
    event_sender: Arc<EventSender>,
}

impl ReceivingService {
    pub fn new(store: Arc<EntityStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    fn require_ingredient_type(&self, id: Uuid) -> Result<(), ServiceError> {
        self.store
            .get_ingredient_type(id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::ValidationError(format!("Unknown ingredient type {}", id)))
    }

    /// Records one received lot.
    #[instrument(skip(self, input), fields(batch_code = %input.batch_code))]
    pub async fn receive_lot(&self, input: ReceiveLotInput) -> Result<IngredientLot, ServiceError> {
        self.require_ingredient_type(input.ingredient_type_id)?;

        let mut lot = IngredientLot::new(
            input.ingredient_type_id,
            input.batch_code,
            input.received_at.unwrap_or_else(Utc::now),
            input.best_before,
            input.received_by,
            input.storage,
        );
        lot.quantity = input.quantity;
        lot.unit = input.unit;
        lot.notes = input.notes;

        let lot = self.store.insert_lot(lot);

        self.event_sender
            .send_or_log(Event::LotReceived {
                lot_id: lot.id,
                ingredient_type_id: lot.ingredient_type_id,
                batch_code: lot.batch_code.clone(),
            })
            .await;

        Ok(lot)
    }

    /// Creates a receiving report and its line lots in one step. Lines
    /// inherit the report's timestamp and receiver.
    #[instrument(skip(self, input, lines), fields(line_count = lines.len()))]
    pub async fn create_receiving_report(
        &self,
        input: CreateReceivingReportInput,
        lines: Vec<ReceivingLineInput>,
    ) -> Result<ReceivingReport, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::ValidationError(
                "A receiving report requires at least one line".to_string(),
            ));
        }
        for line in &lines {
            self.require_ingredient_type(line.ingredient_type_id)?;
        }

        let received_at = input.received_at.unwrap_or_else(Utc::now);
        let report_id = Uuid::new_v4();

        let lots: Vec<IngredientLot> = lines
            .into_iter()
            .map(|line| {
                let mut lot = IngredientLot::new(
                    line.ingredient_type_id,
                    line.batch_code,
                    received_at,
                    line.best_before,
                    input.received_by,
                    line.storage,
                );
                lot.quantity = line.quantity;
                lot.unit = line.unit;
                lot.notes = line.notes;
                lot.receiving_report_id = Some(report_id);
                lot
            })
            .collect();

        let report = ReceivingReport {
            id: report_id,
            received_at,
            received_by: input.received_by,
            reference: input.reference,
            notes: input.notes,
            lot_ids: lots.iter().map(|l| l.id).collect(),
        };

        let stored = self.store.insert_receiving_report(report.clone(), lots);

        self.event_sender
            .send_or_log(Event::ReceivingReportCreated {
                report_id,
                line_count: stored.len(),
            })
            .await;

        Ok(report)
    }

    /// Batch-code correction: the only lot mutation permitted after receipt.
    #[instrument(skip(self))]
    pub async fn correct_batch_code(
        &self,
        lot_id: Uuid,
        batch_code: String,
    ) -> Result<IngredientLot, ServiceError> {
        let old = self
            .store
            .get_lot(lot_id)
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        let updated = self
            .store
            .update_lot_batch_code(lot_id, batch_code.clone())
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        self.event_sender
            .send_or_log(Event::LotBatchCodeCorrected {
                lot_id,
                old_code: old.batch_code,
                new_code: batch_code,
            })
            .await;

        Ok(updated)
    }

    /// Administrative removal. Genealogy link rows pointing at the lot stay
    /// behind as dangling references.
    #[instrument(skip(self))]
    pub async fn remove_lot(&self, lot_id: Uuid) -> Result<(), ServiceError> {
        if !self.store.remove_lot(lot_id) {
            return Err(ServiceError::NotFound(format!("Lot {} not found", lot_id)));
        }

        self.event_sender.send_or_log(Event::LotRemoved(lot_id)).await;
        Ok(())
    }

    /// Administrative removal of a report document. Its lots stay.
    #[instrument(skip(self))]
    pub async fn remove_receiving_report(&self, report_id: Uuid) -> Result<(), ServiceError> {
        if !self.store.remove_receiving_report(report_id) {
            return Err(ServiceError::NotFound(format!(
                "Receiving report {} not found",
                report_id
            )));
        }

        self.event_sender
            .send_or_log(Event::ReceivingReportRemoved(report_id))
            .await;
        Ok(())
    }
}
