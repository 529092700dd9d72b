//! Domain events emitted by the mutating services.
//!
//! Events are the audit trail feed: every production activity that changes
//! the store publishes one. Rendering/persisting the trail is the host
//! application's concern; it consumes the receiver returned by
//! [`AppState::new`](crate::AppState::new).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

use crate::models::BatchKind;

/// The various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    LotReceived {
        lot_id: Uuid,
        ingredient_type_id: Uuid,
        batch_code: String,
    },
    LotBatchCodeCorrected {
        lot_id: Uuid,
        old_code: String,
        new_code: String,
    },
    LotRemoved(Uuid),
    ReceivingReportCreated {
        report_id: Uuid,
        line_count: usize,
    },
    ReceivingReportRemoved(Uuid),
    DailyLogUpdated {
        date: NaiveDate,
        ingredient_type_id: Uuid,
        lot_id: Uuid,
    },
    DailyLogEntryRemoved(Uuid),
    BatchCreated {
        batch_id: Uuid,
        kind: BatchKind,
        code: String,
    },
    BatchRemoved(Uuid),
    ProductionRunCreated {
        run_id: Uuid,
        product_batch_code: String,
    },
    ProductionRunRemoved(Uuid),
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender over an existing channel.
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a bounded channel and the sender half wrapped for services.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging instead of failing when the receiver has been
    /// dropped. Store mutations are not rolled back because the audit feed
    /// went away.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!(error = %e, "event dropped");
        }
    }
}
