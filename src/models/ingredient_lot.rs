use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ingredient_type::{StorageCondition, Unit};

/// One physical receipt of an ingredient.
///
/// The supplier batch code is free text and NOT unique: re-deliveries and
/// different ingredient types may share a code. Lots are never mutated after
/// receipt except for batch-code correction, and deletion is administrative
/// only; traceability link rows referencing a deleted lot are tolerated as
/// dangling by the tracers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IngredientLot {
    pub id: Uuid,
    pub ingredient_type_id: Uuid,
    /// Supplier batch code as printed on the delivery, e.g. "FL-23-001".
    pub batch_code: String,
    pub received_at: DateTime<Utc>,
    pub best_before: NaiveDate,
    pub received_by: Uuid,
    pub quantity: Option<Decimal>,
    pub unit: Option<Unit>,
    pub storage: StorageCondition,
    /// Parent receiving report, when the lot arrived as one line of a
    /// multi-line delivery.
    pub receiving_report_id: Option<Uuid>,
    pub notes: Option<String>,
    /// Store-assigned insertion sequence. Breaks `received_at` ties in the
    /// active-lot fallback deterministically (highest sequence wins).
    pub sequence: u64,
}

impl IngredientLot {
    pub fn new(
        ingredient_type_id: Uuid,
        batch_code: impl Into<String>,
        received_at: DateTime<Utc>,
        best_before: NaiveDate,
        received_by: Uuid,
        storage: StorageCondition,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            ingredient_type_id,
            batch_code: batch_code.into(),
            received_at,
            best_before,
            received_by,
            quantity: None,
            unit: None,
            storage,
            receiving_report_id: None,
            notes: None,
            sequence: 0,
        }
    }
}
