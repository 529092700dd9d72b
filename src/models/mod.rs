//! Core entity types held by the [`EntityStore`](crate::store::EntityStore).
//!
//! Reference data (ingredient types, product catalog) is created by
//! configuration; production data (lots, batches, runs, link rows, daily
//! log entries) is created by production activity and is append-only apart
//! from rare administrative deletions.

pub mod batch;
pub mod daily_log;
pub mod ingredient_lot;
pub mod ingredient_type;
pub mod links;
pub mod product;
pub mod production_run;
pub mod receiving_report;

pub use batch::{BatchKind, IntermediateBatch};
pub use daily_log::DailyLogEntry;
pub use ingredient_lot::IngredientLot;
pub use ingredient_type::{IngredientType, StorageCondition, Unit};
pub use links::{BatchIngredientLink, RunBatchLink};
pub use product::Product;
pub use production_run::{ProductOutput, ProductionRun};
pub use receiving_report::ReceivingReport;
