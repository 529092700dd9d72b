//! Baketrace library
//!
//! Genealogy resolution over bakery production data: which ingredient lots
//! fed a finished product batch (backward trace), and which finished
//! batches an ingredient lot or intermediate batch reached (forward trace /
//! recall impact). The crate owns the in-memory entity store, the daily
//! active-lot policy, and the traversal services; UI, printing, auth and
//! persistence belong to the host application.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    config::AppConfig,
    events::{Event, EventSender},
    services::{
        active_lot::ActiveLotService, batches::BatchService, daily_report::DailyReportService,
        production::ProductionService, receiving::ReceivingService,
        traceability::TraceabilityService,
    },
    store::EntityStore,
};

/// Bundle of all domain services, sharing one store and event channel.
#[derive(Clone)]
pub struct AppServices {
    pub receiving: ReceivingService,
    pub active_lot: ActiveLotService,
    pub batches: BatchService,
    pub production: ProductionService,
    pub traceability: TraceabilityService,
    pub daily_report: DailyReportService,
}

/// Application state: the explicit store handle plus the services built
/// over it. Constructed once at process start; the host consumes the
/// returned event receiver (audit trail, notifications, ...).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<EntityStore>,
    pub config: AppConfig,
    pub event_sender: Arc<EventSender>,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> (Self, mpsc::Receiver<Event>) {
        let store = Arc::new(EntityStore::new());
        let (event_sender, event_receiver) = EventSender::channel(config.event_buffer_size);
        let event_sender = Arc::new(event_sender);

        let services = AppServices {
            receiving: ReceivingService::new(Arc::clone(&store), Arc::clone(&event_sender)),
            active_lot: ActiveLotService::new(Arc::clone(&store), Arc::clone(&event_sender)),
            batches: BatchService::new(Arc::clone(&store), Arc::clone(&event_sender)),
            production: ProductionService::new(Arc::clone(&store), Arc::clone(&event_sender)),
            traceability: TraceabilityService::new(Arc::clone(&store)),
            daily_report: DailyReportService::new(Arc::clone(&store)),
        };

        (
            Self {
                store,
                config,
                event_sender,
                services,
            },
            event_receiver,
        )
    }
}
