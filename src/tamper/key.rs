//! Composite key identifying a direct association.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = "::";

/// "This URL, in this frame, of this tab", rendered as `tabId::frameId::url`.
///
/// Two in-flight requests for the same URL in the same frame share a key;
/// whichever is stored last wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    pub tab_id: i64,
    pub frame_id: i64,
    pub url: String,
}

impl CompositeKey {
    pub fn new(tab_id: i64, frame_id: i64, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            frame_id,
            url: url.into(),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.tab_id, self.frame_id, self.url)
    }
}

impl FromStr for CompositeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, SEPARATOR);
        let (Some(tab), Some(frame), Some(url)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(format!("malformed composite key: {s}"));
        };
        let tab_id = tab
            .parse()
            .map_err(|_| format!("invalid tab id in composite key: {tab}"))?;
        let frame_id = frame
            .parse()
            .map_err(|_| format!("invalid frame id in composite key: {frame}"))?;
        Ok(Self::new(tab_id, frame_id, url))
    }
}

impl Serialize for CompositeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompositeKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
