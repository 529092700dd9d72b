//! Daily production report assembly.

mod common;

use baketrace::models::{BatchKind, ProductOutput};
use common::*;

#[tokio::test]
async fn daily_report_collects_the_dates_batches_and_runs() {
    let ctx = test_context();
    let flour = seed_ingredient_type(&ctx.state, "Flour");
    let jam = seed_ingredient_type(&ctx.state, "Strawberry Jam");
    let doughnut = seed_product(&ctx.state, "Jam Doughnut", "DN-JAM");

    let flour_lot = receive_lot(&ctx.state, flour.id, "FL-001", at(2025, 3, 10, 6)).await;
    let jam_lot = receive_lot(&ctx.state, jam.id, "JAM-01", at(2025, 3, 10, 6)).await;

    let dough = make_batch(
        &ctx.state,
        BatchKind::Dough,
        "DOUGH-01",
        vec![flour_lot.id],
        day(2025, 3, 10),
    )
    .await;
    let filling = make_batch(
        &ctx.state,
        BatchKind::Filling,
        "FILL-01",
        vec![jam_lot.id],
        day(2025, 3, 10),
    )
    .await;
    make_run(
        &ctx.state,
        "100325",
        at(2025, 3, 10, 11),
        vec![dough],
        vec![filling],
        vec![ProductOutput {
            product_id: doughnut.id,
            quantity: 60,
        }],
    )
    .await;

    // A run on another day must not show up.
    make_run(
        &ctx.state,
        "110325",
        at(2025, 3, 11, 11),
        vec![dough],
        vec![filling],
        vec![ProductOutput {
            product_id: doughnut.id,
            quantity: 30,
        }],
    )
    .await;

    let report = ctx
        .state
        .services
        .daily_report
        .daily_report(at(2025, 3, 10, 0).date_naive());

    assert_eq!(report.batches.len(), 2);
    let dough_line = report
        .batches
        .iter()
        .find(|b| b.code == "DOUGH-01")
        .expect("dough line");
    assert_eq!(dough_line.lot_codes, vec!["FL-001".to_string()]);

    assert_eq!(report.runs.len(), 1);
    let run_line = &report.runs[0];
    assert_eq!(run_line.product_batch_code, "100325");
    assert_eq!(run_line.dough_batch_codes, vec!["DOUGH-01".to_string()]);
    assert_eq!(run_line.filling_batch_codes, vec!["FILL-01".to_string()]);
    assert_eq!(run_line.outputs[0].product_name.as_deref(), Some("Jam Doughnut"));
}
