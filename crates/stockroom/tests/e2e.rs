// SPDX-FileCopyrightText: 2026 Stockroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the `stockroom` binary against a mock store.
//!
//! Each test starts its own StoreFixture, writes a config file pointing at
//! it, and runs the compiled binary. Tests are independent and
//! order-insensitive.

use std::path::Path;
use std::process::{Command, Output};

use serde_json::{Value, json};
use stockroom_test_utils::StoreFixture;

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn stockroom(config: &Path, args: &[&str]) -> Output {
    let config = config.to_path_buf();
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_stockroom"))
            .arg("--config")
            .arg(&config)
            .args(&args)
            .env_remove("RUST_LOG")
            .env_remove("STOCKROOM_STORE_URL")
            .env_remove("STOCKROOM_STORE_API_KEY")
            .output()
            .expect("run stockroom binary")
    })
    .await
    .expect("join blocking task")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stockroom failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

async fn stocked_store() -> StoreFixture {
    let fixture = StoreFixture::start().await;
    fixture
        .serve_rows(
            "products",
            json!([
                {"id": "A", "name": "Arroz", "stock_quantity": 100, "base_price": 5.0},
                {"id": "B", "name": "Feijao", "stock_quantity": 5, "base_price": 8.0}
            ]),
        )
        .await;
    fixture
        .serve_rows(
            "order_products",
            json!([
                {"product_id": "A", "quantity": 30, "orders": {"id": "o1", "status": "Reservado"}},
                {"product_id": "A", "quantity": 20, "orders": {"id": "o2", "status": "Reservado"}},
                {"product_id": "B", "quantity": 10, "orders": {"id": "o2", "status": "Reservado"}}
            ]),
        )
        .await;
    fixture
}

#[tokio::test(flavor = "multi_thread")]
async fn inventory_json_reports_negative_availability() {
    let fixture = stocked_store().await;
    let (_dir, config) = fixture.write_config();

    let rows = stdout_json(&stockroom(&config, &["--json", "inventory"]).await);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["product_id"], "A");
    assert_eq!(rows[0]["reserved"], 50);
    assert_eq!(rows[0]["available"], 50);
    assert_eq!(rows[1]["available"], -5);
    assert_eq!(rows[1]["level"], "out_of_stock");
}

#[tokio::test(flavor = "multi_thread")]
async fn alerts_plain_output_lists_out_of_stock() {
    let fixture = stocked_store().await;
    let (_dir, config) = fixture.write_config();

    let output = stockroom(&config, &["--plain", "alerts"]).await;
    assert!(output.status.success());
    let text = String::from_utf8_lossy(&output.stdout);
    assert!(text.contains("[OUT]"));
    assert!(text.contains("Feijao"));
    assert!(!text.contains("Arroz"));
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_json_has_headline_figures() {
    let fixture = stocked_store().await;
    fixture
        .serve_rows(
            "orders",
            json!([
                {"id": "o1", "status": "Reservado", "total_amount": 150.0},
                {"id": "o2", "status": "Reservado", "total_amount": 180.0}
            ]),
        )
        .await;
    let (_dir, config) = fixture.write_config();

    let report = stdout_json(&stockroom(&config, &["--json", "dashboard"]).await);
    assert_eq!(report["product_count"], 2);
    assert_eq!(report["total_stock"], 105);
    assert_eq!(report["total_reserved"], 60);
    assert_eq!(report["orders_by_status"]["Reservado"], 2);
    assert_eq!(report["recent_orders"].as_array().unwrap().len(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn backwards_set_status_exits_non_zero() {
    let fixture = StoreFixture::start().await;
    fixture
        .serve_rows("orders", json!([{"id": "o1", "status": "Faturado"}]))
        .await;
    let (_dir, config) = fixture.write_config();

    let output = stockroom(&config, &["set-status", "o1", "Reservado"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid status transition: Faturado -> Reservado"));
}

#[tokio::test(flavor = "multi_thread")]
async fn store_error_is_reported_with_body() {
    let fixture = StoreFixture::start().await;
    fixture
        .reject("GET", "products", 401, r#"{"message":"Invalid API key"}"#)
        .await;
    fixture.serve_rows("order_products", json!([])).await;
    let (_dir, config) = fixture.write_config();

    let output = stockroom(&config, &["inventory"]).await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid API key"));
}

#[tokio::test(flavor = "multi_thread")]
async fn doctor_json_reports_every_check() {
    let fixture = StoreFixture::start().await;
    fixture.serve_health().await;
    let (_dir, config) = fixture.write_config();

    let checks = stdout_json(&stockroom(&config, &["--json", "doctor"]).await);
    let names: Vec<&str> = checks
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Configuration", "Credentials", "Store"]);
    assert!(checks.as_array().unwrap().iter().all(|c| c["status"] == "pass"));
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_config_exits_with_diagnostic() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = dir.path().join("stockroom.toml");
    std::fs::write(&config, "[store]\nurll = \"http://x\"\n").unwrap();

    let output = stockroom(&config, &["inventory"]).await;
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("url"), "stderr: {stderr}");
}

