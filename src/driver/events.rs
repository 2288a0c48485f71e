//! Hook payloads exchanged with the host network layer.
//!
//! Outcome fields are `None` when the engine leaves the request alone, and
//! are then omitted from the JSON the host receives.

use serde::{Deserialize, Serialize};

use crate::headers::HeaderEntry;

/// URL seen before any bytes are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptEvent {
    pub tab_id: i64,
    pub frame_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterceptOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Request headers finalized; the host request identifier is now known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersSendEvent {
    pub tab_id: i64,
    pub frame_id: i64,
    pub url: String,
    pub request_id: String,
    #[serde(default)]
    pub request_headers: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersSendOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<Vec<HeaderEntry>>,
}

/// Response headers available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersReceivedEvent {
    pub request_id: String,
    pub status_code: u16,
    #[serde(default)]
    pub response_headers: Vec<HeaderEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadersReceivedOutcome {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
}
