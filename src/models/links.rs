//! Explicit many-to-many link rows.
//!
//! Genealogy references are append-only: a link row is never repointed to a
//! different lot or batch after insertion. Whole-row deletion happens only
//! as a side effect of administrative entity removal, which leaves dangling
//! rows the tracers must tolerate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::batch::BatchKind;

/// Batch consumed lot. One row per (batch, lot) pair; the batch row carries
/// the dough/filling discriminant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchIngredientLink {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub lot_id: Uuid,
}

impl BatchIngredientLink {
    pub fn new(batch_id: Uuid, lot_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            batch_id,
            lot_id,
        }
    }
}

/// Production run consumed batch. Carries an explicit kind column so the
/// dough and filling sets of a run can be reconstructed without consulting
/// the batch row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunBatchLink {
    pub id: Uuid,
    pub run_id: Uuid,
    pub batch_id: Uuid,
    pub kind: BatchKind,
}

impl RunBatchLink {
    pub fn new(run_id: Uuid, batch_id: Uuid, kind: BatchKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            batch_id,
            kind,
        }
    }
}
