//! History persistence through the file-backed store.

use serde_json::{Value, json};

use abacus_core::{HISTORY_KEY, KeyValueStore, MAX_HISTORY_ENTRIES};

use crate::common::{app_for, file_store, mount_success, press, start_calculator_mock};

#[tokio::test]
async fn history_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "+", "num1": 5.0, "num2": 3.0}),
        "5 + 3",
        8.0,
    )
    .await;

    {
        let mut app = app_for(&server, file_store(dir.path()));
        press(&mut app, "5+3=");
        app.settle().await;
        assert_eq!(app.history().len(), 1);
    }

    let file = dir.path().join(format!("{HISTORY_KEY}.json"));
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(stored[0]["operation"], "5 + 3");
    assert_eq!(stored[0]["result"], 8.0);
    assert!(stored[0]["timestamp"].is_string());

    let reloaded = app_for(&server, file_store(dir.path()));
    assert_eq!(reloaded.history().len(), 1);
    assert_eq!(reloaded.history().get(0).unwrap().operation_label, "5 + 3");
}

#[tokio::test]
async fn corrupt_history_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{HISTORY_KEY}.json")), "{not json").unwrap();

    let server = start_calculator_mock().await;
    let app = app_for(&server, file_store(dir.path()));
    assert!(app.history().is_empty());
}

#[tokio::test]
async fn stored_history_is_capped_on_load_and_on_record() {
    let dir = tempfile::tempdir().unwrap();
    let entries: Vec<Value> = (0..60)
        .map(|i| {
            json!({
                "operation": format!("{i} + 0"),
                "result": f64::from(i),
                "timestamp": "2024-05-01T12:30:00Z"
            })
        })
        .collect();
    file_store(dir.path())
        .set(HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
        .unwrap();

    let server = start_calculator_mock().await;
    mount_success(
        &server,
        json!({"operation": "+", "num1": 1.0, "num2": 1.0}),
        "1 + 1",
        2.0,
    )
    .await;

    let mut app = app_for(&server, file_store(dir.path()));
    assert_eq!(app.history().len(), MAX_HISTORY_ENTRIES);
    assert_eq!(app.history().get(0).unwrap().operation_label, "0 + 0");

    press(&mut app, "1+1=");
    app.settle().await;
    assert_eq!(app.history().len(), MAX_HISTORY_ENTRIES);
    assert_eq!(app.history().get(0).unwrap().operation_label, "1 + 1");
    assert_eq!(app.history().get(1).unwrap().operation_label, "0 + 0");

    let reloaded = app_for(&server, file_store(dir.path()));
    assert_eq!(reloaded.history().len(), MAX_HISTORY_ENTRIES);
    assert_eq!(reloaded.history().get(0).unwrap().result, 2.0);
}
