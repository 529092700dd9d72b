use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery document grouping the lots received together. Lots created
/// under a report inherit its timestamp and receiver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceivingReport {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub received_by: Uuid,
    /// Delivery reference / supplier note.
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub lot_ids: Vec<Uuid>,
}
