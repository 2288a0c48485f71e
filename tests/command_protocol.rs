//! Caller command and admin endpoint tests.

use reqwest::StatusCode;
use serde_json::{json, Value};
use tamper_engine::protocol::Command;
use tamper_engine::store::PatternRegistration;
use tamper_engine::TamperSpec;

mod common;

#[tokio::test]
async fn test_meta_tamper_command_round_trip() {
    let bridge = common::start_bridge(common::test_config()).await;

    let command = Command::MetaTamper(PatternRegistration::for_urls(
        ["http://x.test/a", "http://x.test/b"],
        TamperSpec::new().unset_header("Referer"),
    ));
    let reply = bridge.post("/command", &command.to_message()).await;
    assert_eq!(reply, json!({ "success": true }));

    let reply = bridge.post("/command", &json!({ "command": "print" })).await;
    assert_eq!(reply["msg"], "0 direct, 1 patterns");

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 0,
                "url": "http://x.test/b",
                "requestId": "r1",
                "requestHeaders": [{ "name": "Referer", "value": "http://x.test/" }]
            }),
        )
        .await;
    assert_eq!(outcome["requestHeaders"], json!([]));
}

#[tokio::test]
async fn test_rejected_messages() {
    let bridge = common::start_bridge(common::test_config()).await;

    let reply = bridge.post("/command", &json!({ "options": {} })).await;
    assert_eq!(reply["success"], false);

    let reply = bridge.post("/command", &json!({ "command": "explode" })).await;
    assert_eq!(reply["success"], false);
    assert!(reply["msg"].as_str().unwrap().contains("explode"));

    let reply = bridge.post("/command", &json!({ "command": "RegisterCb" })).await;
    assert_eq!(reply["success"], false);

    let reply = bridge
        .post(
            "/command",
            &json!({ "command": "MetaTamper", "options": { "regexes": [["(", ""]], "tamper": {} } }),
        )
        .await;
    assert_eq!(reply["success"], false);
}

#[tokio::test]
async fn test_send_background_acknowledged() {
    let bridge = common::start_bridge(common::test_config()).await;

    let reply = bridge
        .post("/command", &json!({ "command": "sendBackground", "options": "hello" }))
        .await;
    assert_eq!(reply, json!({ "success": true, "msg": "hello" }));
}

#[tokio::test]
async fn test_admin_requires_api_key() {
    let bridge = common::start_bridge(common::test_config()).await;

    let res = bridge.client.get(bridge.url("/admin/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = bridge
        .client
        .get(bridge.url("/admin/status"))
        .bearer_auth("wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = bridge
        .client
        .get(bridge.url("/admin/status"))
        .bearer_auth(common::TEST_API_KEY)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: Value = res.json().await.unwrap();
    assert_eq!(status["status"], "operational");
    assert_eq!(status["direct_entries"], 0);
}

#[tokio::test]
async fn test_admin_disabled_by_default() {
    let bridge = common::start_bridge(Default::default()).await;

    let res = bridge.client.get(bridge.url("/admin/status")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
