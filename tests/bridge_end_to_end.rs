//! End-to-end tests for the hook endpoints.

use serde_json::{json, Value};
use tamper_engine::codec::tag_url;
use tamper_engine::store::PatternRegistration;
use tamper_engine::TamperSpec;

mod common;

fn header<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    headers
        .as_array()?
        .iter()
        .find(|h| h["name"] == name)
        .and_then(|h| h["value"].as_str())
}

#[tokio::test]
async fn test_pattern_applies_to_matching_request() {
    let bridge = common::start_bridge(common::test_config()).await;

    let reply = bridge
        .post(
            "/command",
            &json!({
                "command": "MetaTamper",
                "options": {
                    "urls": ["http://x.test/a"],
                    "tamper": { "headers": { "Origin": "evil.test" } }
                }
            }),
        )
        .await;
    assert_eq!(reply, json!({ "success": true }));

    let outcome = bridge
        .post(
            "/hooks/intercept",
            &json!({ "tabId": 1, "frameId": 0, "url": "http://x.test/a" }),
        )
        .await;
    assert_eq!(outcome, json!({}));

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 0,
                "url": "http://x.test/a",
                "requestId": "r1",
                "requestHeaders": []
            }),
        )
        .await;
    assert_eq!(
        outcome["requestHeaders"],
        json!([{ "name": "Origin", "value": "evil.test" }])
    );

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 0,
                "url": "http://x.test/other",
                "requestId": "r2",
                "requestHeaders": []
            }),
        )
        .await;
    assert_eq!(outcome, json!({}));
}

#[tokio::test]
async fn test_tagged_url_full_lifecycle() {
    let bridge = common::start_bridge(common::test_config()).await;

    let spec = TamperSpec::new()
        .set_header("X-Debug", "1")
        .remove_header("Cookie")
        .set_response_header("Access-Control-Allow-Origin", "*")
        .once();
    let tagged = tag_url("http://x.test/api", &spec).unwrap();

    let outcome = bridge
        .post(
            "/hooks/intercept",
            &json!({ "tabId": 3, "frameId": 0, "url": tagged }),
        )
        .await;
    assert_eq!(outcome["redirectUrl"], "http://x.test/api");

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 3,
                "frameId": 0,
                "url": "http://x.test/api",
                "requestId": "r1",
                "requestHeaders": [
                    { "name": "Cookie", "value": "sid=1" },
                    { "name": "Accept", "value": "*/*" }
                ]
            }),
        )
        .await;
    let sent = &outcome["requestHeaders"];
    assert_eq!(header(sent, "X-Debug"), Some("1"));
    assert_eq!(header(sent, "Accept"), Some("*/*"));
    assert_eq!(header(sent, "Cookie"), None);

    let outcome = bridge
        .post(
            "/hooks/headers-received",
            &json!({ "requestId": "r1", "statusCode": 200, "responseHeaders": [] }),
        )
        .await;
    assert_eq!(
        header(&outcome["responseHeaders"], "Access-Control-Allow-Origin"),
        Some("*")
    );

    // Retired after the terminal response.
    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 3,
                "frameId": 0,
                "url": "http://x.test/api",
                "requestId": "r2",
                "requestHeaders": []
            }),
        )
        .await;
    assert_eq!(outcome, json!({}));
}

#[tokio::test]
async fn test_redirect_carries_spec_to_location() {
    let bridge = common::start_bridge(common::test_config()).await;

    let tagged = tag_url("http://a.test/", &TamperSpec::new().set_header("X-Hop", "yes")).unwrap();
    bridge
        .post(
            "/hooks/intercept",
            &json!({ "tabId": 1, "frameId": 2, "url": tagged }),
        )
        .await;
    bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 2,
                "url": "http://a.test/",
                "requestId": "r1",
                "requestHeaders": []
            }),
        )
        .await;

    let outcome = bridge
        .post(
            "/hooks/headers-received",
            &json!({
                "requestId": "r1",
                "statusCode": 302,
                "responseHeaders": [{ "name": "Location", "value": "http://b.test/next" }]
            }),
        )
        .await;
    assert_eq!(outcome, json!({}));

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 2,
                "url": "http://b.test/next",
                "requestId": "r1",
                "requestHeaders": []
            }),
        )
        .await;
    assert_eq!(header(&outcome["requestHeaders"], "X-Hop"), Some("yes"));

    let store: Value = bridge
        .client
        .get(bridge.url("/admin/store"))
        .bearer_auth(common::TEST_API_KEY)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let keys: Vec<&str> = store["direct"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|entry| entry["key"].as_str())
        .collect();
    assert_eq!(keys, vec!["1::2::http://b.test/next"]);
}

#[tokio::test]
async fn test_malformed_redirect_passes_through() {
    let bridge = common::start_bridge(common::test_config()).await;

    let tagged = tag_url(
        "http://a.test/",
        &TamperSpec::new().set_response_header("X-Never", "1"),
    )
    .unwrap();
    bridge
        .post("/hooks/intercept", &json!({ "tabId": 1, "frameId": 0, "url": tagged }))
        .await;
    bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 0,
                "url": "http://a.test/",
                "requestId": "r9",
                "requestHeaders": []
            }),
        )
        .await;

    let outcome = bridge
        .post(
            "/hooks/headers-received",
            &json!({ "requestId": "r9", "statusCode": 301, "responseHeaders": [] }),
        )
        .await;
    assert_eq!(outcome, json!({}));
}

#[tokio::test]
async fn test_preset_patterns_from_config() {
    let mut config = common::test_config();
    config.patterns.push(PatternRegistration::for_regex(
        "^https://api\\.",
        "i",
        TamperSpec::new().set_header("X-Preset", "on"),
    ));
    let bridge = common::start_bridge(config).await;

    let outcome = bridge
        .post(
            "/hooks/headers-send",
            &json!({
                "tabId": 1,
                "frameId": 0,
                "url": "HTTPS://API.example.test/v1",
                "requestId": "r1",
                "requestHeaders": []
            }),
        )
        .await;
    assert_eq!(header(&outcome["requestHeaders"], "X-Preset"), Some("on"));
}
