//! Recording production activity: lot receipt, batch creation with its
//! daily-log confirmation step, and run creation validation.

mod common;

use assert_matches::assert_matches;
use baketrace::{
    errors::ServiceError,
    events::Event,
    models::{BatchKind, ProductOutput, StorageCondition},
    services::{
        batches::CreateBatchInput,
        production::CreateRunInput,
        receiving::{CreateReceivingReportInput, ReceivingLineInput},
    },
};
use common::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::test]
async fn create_batch_rejects_empty_lot_set() {
    let ctx = test_context();

    let result = ctx
        .state
        .services
        .batches
        .create_batch(CreateBatchInput {
            code: "DOUGH-01".to_string(),
            kind: BatchKind::Dough,
            name: "White Sourdough".to_string(),
            created_by: operator(),
            lot_ids: vec![],
            created_at: None,
            production_date: Some(day(2025, 6, 1)),
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn create_batch_rejects_unknown_lot() {
    let ctx = test_context();

    let result = ctx
        .state
        .services
        .batches
        .create_batch(CreateBatchInput {
            code: "DOUGH-01".to_string(),
            kind: BatchKind::Dough,
            name: "White Sourdough".to_string(),
            created_by: operator(),
            lot_ids: vec![Uuid::new_v4()],
            created_at: None,
            production_date: Some(day(2025, 6, 1)),
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn create_batch_confirms_daily_log_for_each_ingredient() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let salt = seed_ingredient_type(&ctx.state, "Salt");

    let flour_lot = receive_lot(&ctx.state, flour.id, "FL-01", at(2025, 6, 1, 6)).await;
    let salt_lot = receive_lot(&ctx.state, salt.id, "SLT-01", at(2025, 6, 1, 6)).await;

    let date = day(2025, 6, 2);
    make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![flour_lot.id, salt_lot.id],
        date,
    )
    .await;

    let flour_entry = ctx.state.store.get_daily_log_entry(date, flour.id);
    let salt_entry = ctx.state.store.get_daily_log_entry(date, salt.id);
    assert_eq!(flour_entry.map(|e| e.lot_id), Some(flour_lot.id));
    assert_eq!(salt_entry.map(|e| e.lot_id), Some(salt_lot.id));
}

#[tokio::test]
async fn create_batch_deduplicates_lot_ids() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let lot = receive_lot(&ctx.state, flour.id, "FL-01", at(2025, 6, 1, 6)).await;

    let batch_id = make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![lot.id, lot.id],
        day(2025, 6, 1),
    )
    .await;

    let links = ctx.state.store.list_batch_ingredient_links();
    let for_batch: Vec<_> = links.iter().filter(|l| l.batch_id == batch_id).collect();
    assert_eq!(for_batch.len(), 1);
}

#[tokio::test]
async fn create_run_rejects_empty_batch_set() {
    let ctx = test_context();
    let product = seed_product(&ctx.state, "Sourdough Loaf", "SD-800");

    let result = ctx
        .state
        .services
        .production
        .create_run(CreateRunInput {
            product_batch_code: "250601".to_string(),
            run_at: Some(at(2025, 6, 1, 10)),
            created_by: operator(),
            operator_ids: vec![],
            outputs: vec![ProductOutput {
                product_id: product.id,
                quantity: 10,
            }],
            dough_batch_ids: vec![],
            filling_batch_ids: vec![],
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn create_run_rejects_kind_mismatch() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let product = seed_product(&ctx.state, "Sourdough Loaf", "SD-800");
    let lot = receive_lot(&ctx.state, flour.id, "FL-01", at(2025, 6, 1, 6)).await;
    let dough = make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![lot.id],
        day(2025, 6, 1),
    )
    .await;

    // A dough batch offered as filling must be rejected.
    let result = ctx
        .state
        .services
        .production
        .create_run(CreateRunInput {
            product_batch_code: "250601".to_string(),
            run_at: Some(at(2025, 6, 1, 10)),
            created_by: operator(),
            operator_ids: vec![],
            outputs: vec![ProductOutput {
                product_id: product.id,
                quantity: 10,
            }],
            dough_batch_ids: vec![],
            filling_batch_ids: vec![dough],
        })
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn create_run_rejects_empty_or_nonpositive_outputs() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let product = seed_product(&ctx.state, "Sourdough Loaf", "SD-800");
    let lot = receive_lot(&ctx.state, flour.id, "FL-01", at(2025, 6, 1, 6)).await;
    let dough = make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![lot.id],
        day(2025, 6, 1),
    )
    .await;

    let base = CreateRunInput {
        product_batch_code: "250601".to_string(),
        run_at: Some(at(2025, 6, 1, 10)),
        created_by: operator(),
        operator_ids: vec![],
        outputs: vec![],
        dough_batch_ids: vec![dough],
        filling_batch_ids: vec![],
    };

    let empty = ctx.state.services.production.create_run(base.clone()).await;
    assert_matches!(empty, Err(ServiceError::ValidationError(_)));

    let mut nonpositive = base;
    nonpositive.outputs = vec![ProductOutput {
        product_id: product.id,
        quantity: 0,
    }];
    let result = ctx.state.services.production.create_run(nonpositive).await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn receiving_report_lines_inherit_timestamp_and_receiver() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let butter = seed_ingredient_type(&ctx.state, "Butter");

    let received_at = at(2025, 6, 1, 7);
    let receiver = operator();
    let report = ctx
        .state
        .services
        .receiving
        .create_receiving_report(
            CreateReceivingReportInput {
                received_at: Some(received_at),
                received_by: receiver,
                reference: Some("DELIV-443".to_string()),
                notes: None,
            },
            vec![
                ReceivingLineInput {
                    ingredient_type_id: flour.id,
                    batch_code: "FL-02".to_string(),
                    best_before: day(2026, 1, 1),
                    quantity: Some(dec!(1000)),
                    unit: None,
                    storage: StorageCondition::Ambient,
                    notes: None,
                },
                ReceivingLineInput {
                    ingredient_type_id: butter.id,
                    batch_code: "BT-11".to_string(),
                    best_before: day(2025, 9, 1),
                    quantity: Some(dec!(50)),
                    unit: None,
                    storage: StorageCondition::Chilled,
                    notes: None,
                },
            ],
        )
        .await
        .expect("report created");

    assert_eq!(report.lot_ids.len(), 2);
    for lot_id in &report.lot_ids {
        let lot = ctx.state.store.get_lot(*lot_id).expect("lot stored");
        assert_eq!(lot.received_at, received_at);
        assert_eq!(lot.received_by, receiver);
        assert_eq!(lot.receiving_report_id, Some(report.id));
    }
}

#[tokio::test]
async fn receiving_report_rejects_empty_lines() {
    let ctx = test_context();

    let result = ctx
        .state
        .services
        .receiving
        .create_receiving_report(
            CreateReceivingReportInput {
                received_at: None,
                received_by: operator(),
                reference: None,
                notes: None,
            },
            vec![],
        )
        .await;
    assert_matches!(result, Err(ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn production_activity_emits_events() {
    let mut ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");

    let lot = receive_lot(&ctx.state, flour.id, "FL-01", at(2025, 6, 1, 6)).await;
    make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![lot.id],
        day(2025, 6, 1),
    )
    .await;

    let mut saw_lot_received = false;
    let mut saw_daily_log = false;
    let mut saw_batch_created = false;
    while let Ok(event) = ctx.events.try_recv() {
        match event {
            Event::LotReceived { lot_id, .. } => saw_lot_received = lot_id == lot.id,
            Event::DailyLogUpdated { lot_id, .. } => saw_daily_log = lot_id == lot.id,
            Event::BatchCreated { code, .. } => saw_batch_created = code == "DOUGH-01",
            _ => {}
        }
    }
    assert!(saw_lot_received && saw_daily_log && saw_batch_created);
}

#[tokio::test]
async fn removing_unknown_entities_reports_not_found() {
    let ctx = test_context();

    let lot = ctx.state.services.receiving.remove_lot(Uuid::new_v4()).await;
    assert_matches!(lot, Err(ServiceError::NotFound(_)));

    let batch = ctx.state.services.batches.remove_batch(Uuid::new_v4()).await;
    assert_matches!(batch, Err(ServiceError::NotFound(_)));

    let run = ctx.state.services.production.remove_run(Uuid::new_v4()).await;
    assert_matches!(run, Err(ServiceError::NotFound(_)));
}

#[tokio::test]
async fn correct_batch_code_is_the_only_lot_mutation() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let lot = receive_lot(&ctx.state, flour.id, "FL-TYPO", at(2025, 6, 1, 6)).await;

    let updated = ctx
        .state
        .services
        .receiving
        .correct_batch_code(lot.id, "FL-23-001".to_string())
        .await
        .expect("corrected");

    assert_eq!(updated.batch_code, "FL-23-001");
    assert_eq!(updated.received_at, lot.received_at);
    assert_eq!(updated.sequence, lot.sequence);
}
