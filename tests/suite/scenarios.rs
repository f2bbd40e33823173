//! End-to-end calculator scenarios against a mock calculation service.

use std::time::{Duration, Instant};

use serde_json::json;

use abacus_core::MemoryStore;
use abacus_engine::NOTICE_DURATION;

use crate::common::{
    app_for, http_service, mount_failure, mount_success, press, start_calculator_mock,
};

#[tokio::test]
async fn five_plus_three_shows_eight_and_records_history() {
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "+", "num1": 5.0, "num2": 3.0}),
        "5 + 3",
        8.0,
    )
    .await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "5+3=");
    assert!(app.is_calculating());
    app.settle().await;

    assert!(!app.is_calculating());
    assert_eq!(app.display(), "8");
    assert_eq!(app.operator_line(), "");
    let entry = app.history().get(0).expect("history entry");
    assert_eq!(entry.operation_label, "5 + 3");
    assert_eq!(entry.result, 8.0);
}

#[tokio::test]
async fn two_power_ten_sends_base_and_exponent() {
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "power", "base": 2.0, "exponent": 10.0}),
        "2 ^ 10",
        1024.0,
    )
    .await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "2^10=");
    app.settle().await;

    assert_eq!(app.display(), "1024");
    assert_eq!(app.history().len(), 1);
}

#[tokio::test]
async fn divide_by_zero_error_is_shown_for_three_seconds() {
    let server = start_calculator_mock().await;
    mount_failure(&server, 400, "Cannot divide by zero").await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "8/0=");
    app.settle().await;

    assert_eq!(app.operator_line(), "Error: Cannot divide by zero");
    assert_eq!(app.display(), "0");
    assert!(app.history().is_empty());

    app.tick_at(Instant::now() + Duration::from_secs(1));
    assert_eq!(app.operator_line(), "Error: Cannot divide by zero");

    app.tick_at(Instant::now() + NOTICE_DURATION + Duration::from_millis(50));
    assert_eq!(app.operator_line(), "");
    assert_eq!(app.display(), "0");

    press(&mut app, "4");
    assert_eq!(app.operator_line(), "8 ÷");
}

#[tokio::test]
async fn unreachable_service_shows_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let service = http_service(&format!("http://127.0.0.1:{port}"));
    let mut app = abacus_engine::App::new(service, Box::new(MemoryStore::new()));

    press(&mut app, "1+1=");
    app.settle().await;

    assert_eq!(
        app.operator_line(),
        "Error: Network error: Unable to connect to server"
    );
    assert_eq!(app.display(), "1");
    assert!(app.history().is_empty());
}

#[tokio::test]
async fn second_decimal_point_is_ignored() {
    let server = start_calculator_mock().await;
    let mut app = app_for(&server, MemoryStore::new());

    press(&mut app, "0..");
    assert_eq!(app.calculator().current_operand(), "0.");
    press(&mut app, "5.");
    assert_eq!(app.calculator().current_operand(), "0.5");
    assert_eq!(app.display(), "0.5");
}

#[tokio::test]
async fn chained_operators_resolve_left_to_right() {
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "*", "num1": 4.0, "num2": 5.0}),
        "4 * 5",
        20.0,
    )
    .await;
    mount_success(
        &server,
        json!({"operation": "-", "num1": 20.0, "num2": 7.0}),
        "20 - 7",
        13.0,
    )
    .await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "4*5-");
    app.settle().await;
    assert_eq!(app.operator_line(), "20 -");

    press(&mut app, "7=");
    app.settle().await;
    assert_eq!(app.display(), "13");
    assert_eq!(app.history().get(0).unwrap().operation_label, "20 - 7");
}

#[tokio::test]
async fn log_with_pending_operand_uses_current_as_base() {
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "log", "number": 8.0, "base": 2.0}),
        "log_2(8)",
        3.0,
    )
    .await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "8+2l");
    app.settle().await;
    assert_eq!(app.display(), "3");
}

#[tokio::test]
async fn negative_results_and_sign_toggle() {
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "cos", "num1": null, "angle": -180.0}),
        "cos(-180)",
        -1.0,
    )
    .await;

    let mut app = app_for(&server, MemoryStore::new());
    press(&mut app, "180no");
    app.settle().await;
    assert_eq!(app.display(), "-1");

    press(&mut app, "<");
    assert_eq!(app.display(), "0");
}
