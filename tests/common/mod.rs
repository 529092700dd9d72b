#![allow(dead_code)]

use baketrace::{
    config::AppConfig,
    events::Event,
    models::{
        BatchKind, IngredientLot, IngredientType, Product, ProductOutput, StorageCondition, Unit,
    },
    services::{batches::CreateBatchInput, production::CreateRunInput, receiving::ReceiveLotInput},
    AppState,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

pub struct TestContext {
    pub state: AppState,
    pub events: mpsc::Receiver<Event>,
}

pub fn test_context() -> TestContext {
    let (state, events) = AppState::new(AppConfig::default());
    TestContext { state, events }
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn operator() -> Uuid {
    Uuid::new_v4()
}

pub fn seed_ingredient_type(state: &AppState, name: &str) -> IngredientType {
    let ingredient_type = IngredientType::new(name, Unit::Kg, StorageCondition::Ambient);
    state
        .store
        .insert_ingredient_type(ingredient_type.clone());
    ingredient_type
}

pub fn seed_product(state: &AppState, name: &str, sku: &str) -> Product {
    let product = Product::new(name, sku);
    state.store.insert_product(product.clone());
    product
}

pub async fn receive_lot(
    state: &AppState,
    ingredient_type_id: Uuid,
    batch_code: &str,
    received_at: DateTime<Utc>,
) -> IngredientLot {
    state
        .services
        .receiving
        .receive_lot(ReceiveLotInput {
            ingredient_type_id,
            batch_code: batch_code.to_string(),
            received_at: Some(received_at),
            best_before: day(2026, 12, 31),
            received_by: operator(),
            quantity: None,
            unit: None,
            storage: StorageCondition::Ambient,
            notes: None,
        })
        .await
        .expect("lot received")
}

pub async fn make_batch(
    state: &AppState,
    kind: BatchKind,
    code: &str,
    lot_ids: Vec<Uuid>,
    production_date: NaiveDate,
) -> Uuid {
    state
        .services
        .batches
        .create_batch(CreateBatchInput {
            code: code.to_string(),
            kind,
            name: format!("{} {}", kind, code),
            created_by: operator(),
            lot_ids,
            created_at: production_date
                .and_hms_opt(8, 0, 0)
                .map(|dt| DateTime::from_naive_utc_and_offset(dt, Utc)),
            production_date: Some(production_date),
        })
        .await
        .expect("batch created")
}

pub async fn make_run(
    state: &AppState,
    product_batch_code: &str,
    run_at: DateTime<Utc>,
    dough_batch_ids: Vec<Uuid>,
    filling_batch_ids: Vec<Uuid>,
    outputs: Vec<ProductOutput>,
) -> Uuid {
    state
        .services
        .production
        .create_run(CreateRunInput {
            product_batch_code: product_batch_code.to_string(),
            run_at: Some(run_at),
            created_by: operator(),
            operator_ids: vec![],
            outputs,
            dough_batch_ids,
            filling_batch_ids,
        })
        .await
        .expect("run created")
}
