use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One (product, quantity) output of a production run. Quantities are unit
/// counts; recall aggregation sums them without deduplicating by product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductOutput {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// A finished-goods event: one or more products made from one or more
/// intermediate batches on a given day. Consumed batches live in
/// [`RunBatchLink`](super::links::RunBatchLink) rows; the combined
/// dough+filling set is non-empty at creation.
///
/// `product_batch_code` conventionally encodes the production date (ddmmyy)
/// and is what customer-facing recall queries search by.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionRun {
    pub id: Uuid,
    pub product_batch_code: String,
    pub run_at: DateTime<Utc>,
    /// Lead operator.
    pub created_by: Uuid,
    /// All operators present for the run.
    pub operator_ids: Vec<Uuid>,
    pub outputs: Vec<ProductOutput>,
}

impl ProductionRun {
    /// Sum of all output quantities, across products.
    pub fn total_quantity(&self) -> i64 {
        self.outputs.iter().map(|o| o.quantity).sum()
    }
}
