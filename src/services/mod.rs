// Resolution and traversal
pub mod active_lot;
pub mod genealogy;
pub mod traceability;

// Production recording
pub mod batches;
pub mod production;
pub mod receiving;

// Reporting
pub mod daily_report;
