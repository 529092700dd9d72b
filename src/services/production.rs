//! Production run creation: the finished-goods event.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    events::{Event, EventSender},
    models::{BatchKind, ProductOutput, ProductionRun, RunBatchLink},
    store::EntityStore,
};

/// Input for creating a production run.
#[derive(Debug, Clone)]
pub struct CreateRunInput {
    /// Conventionally the production date as ddmmyy, e.g. "250101".
    pub product_batch_code: String,
    /// Defaults to now.
    pub run_at: Option<DateTime<Utc>>,
    pub created_by: Uuid,
    pub operator_ids: Vec<Uuid>,
    pub outputs: Vec<ProductOutput>,
    pub dough_batch_ids: Vec<Uuid>,
    pub filling_batch_ids: Vec<Uuid>,
}

#[derive(Clone)]
pub struct ProductionService {
    store: Arc<EntityStore>,
    event_sender: Arc<EventSender>,
}

impl ProductionService {
    pub fn new(store: Arc<EntityStore>, event_sender: Arc<EventSender>) -> Self {
        Self {
            store,
            event_sender,
        }
    }

    fn check_batches(&self, ids: &[Uuid], kind: BatchKind) -> Result<(), ServiceError> {
        for id in ids {
            let batch = self.store.get_batch(*id).ok_or_else(|| {
                ServiceError::ValidationError(format!("Batch {} not found", id))
            })?;
            if batch.kind != kind {
                return Err(ServiceError::ValidationError(format!(
                    "Batch {} is {}, expected {}",
                    id, batch.kind, kind
                )));
            }
        }
        Ok(())
    }

    /// Creates a run atomically with its batch links. The combined
    /// dough+filling set and the output set must both be non-empty.
    #[instrument(skip(self, input), fields(product_batch_code = %input.product_batch_code))]
    pub async fn create_run(&self, input: CreateRunInput) -> Result<Uuid, ServiceError> {
        if input.dough_batch_ids.is_empty() && input.filling_batch_ids.is_empty() {
            return Err(ServiceError::ValidationError(
                "A production run requires at least one batch".to_string(),
            ));
        }
        if input.outputs.is_empty() {
            return Err(ServiceError::ValidationError(
                "A production run requires at least one product output".to_string(),
            ));
        }
        if input.outputs.iter().any(|o| o.quantity <= 0) {
            return Err(ServiceError::ValidationError(
                "Output quantities must be positive".to_string(),
            ));
        }
        for output in &input.outputs {
            if self.store.get_product(output.product_id).is_none() {
                return Err(ServiceError::ValidationError(format!(
                    "Unknown product {}",
                    output.product_id
                )));
            }
        }

        self.check_batches(&input.dough_batch_ids, BatchKind::Dough)?;
        self.check_batches(&input.filling_batch_ids, BatchKind::Filling)?;

        let run = ProductionRun {
            id: Uuid::new_v4(),
            product_batch_code: input.product_batch_code,
            run_at: input.run_at.unwrap_or_else(Utc::now),
            created_by: input.created_by,
            operator_ids: input.operator_ids,
            outputs: input.outputs,
        };
        let run_id = run.id;

        let mut links: Vec<RunBatchLink> = Vec::new();
        for id in &input.dough_batch_ids {
            if links.iter().all(|l| l.batch_id != *id) {
                links.push(RunBatchLink::new(run_id, *id, BatchKind::Dough));
            }
        }
        for id in &input.filling_batch_ids {
            if links.iter().all(|l| l.batch_id != *id) {
                links.push(RunBatchLink::new(run_id, *id, BatchKind::Filling));
            }
        }

        let code = run.product_batch_code.clone();
        self.store.insert_run(run, links);

        self.event_sender
            .send_or_log(Event::ProductionRunCreated {
                run_id,
                product_batch_code: code,
            })
            .await;

        Ok(run_id)
    }

    /// Runs newest first.
    pub fn list_runs(&self) -> Vec<ProductionRun> {
        let mut runs = self.store.list_runs();
        runs.sort_by(|a, b| b.run_at.cmp(&a.run_at).then(b.id.cmp(&a.id)));
        runs
    }

    /// Administrative removal. Link rows referencing the run stay behind.
    #[instrument(skip(self))]
    pub async fn remove_run(&self, run_id: Uuid) -> Result<(), ServiceError> {
        if !self.store.remove_run(run_id) {
            return Err(ServiceError::NotFound(format!("Run {} not found", run_id)));
        }

        self.event_sender
            .send_or_log(Event::ProductionRunRemoved(run_id))
            .await;
        Ok(())
    }
}
