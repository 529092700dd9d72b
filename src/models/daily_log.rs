use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Names which lot is "active" for an ingredient type on a calendar date.
///
/// Natural key: (date, ingredient_type_id). The store upserts by that key,
/// so at most one entry exists per pair at any instant. Entries are written
/// when an operator sets the day's lot explicitly and when batch creation
/// confirms the lots it consumed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub ingredient_type_id: Uuid,
    pub lot_id: Uuid,
    pub updated_at: DateTime<Utc>,
}

impl DailyLogEntry {
    pub fn new(date: NaiveDate, ingredient_type_id: Uuid, lot_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            ingredient_type_id,
            lot_id,
            updated_at: Utc::now(),
        }
    }
}
