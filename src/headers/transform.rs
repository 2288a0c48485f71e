//! Header list transforms.
//!
//! # Responsibilities
//! - Overwrite or append header values
//! - Drop headers by name
//!
//! # Design Decisions
//! - Names compare case-insensitively (per HTTP spec)
//! - Existing names keep their original casing; only new entries take the
//!   caller's casing
//! - Absent names are no-ops, never errors

use serde::{Deserialize, Serialize};

/// One header line as delivered by the host.
///
/// The host sends either a text `value` or a raw `binaryValue`. Whichever
/// one arrived is sent back untouched unless the header is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary_value: Option<Vec<u8>>,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
            binary_value: None,
        }
    }

    pub fn binary(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: None,
            binary_value: Some(bytes.into()),
        }
    }

    /// Replace the content with a text value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
        self.binary_value = None;
    }
}

/// Set each `(name, value)` pair on `headers`.
///
/// Every existing occurrence of a name takes the new value; a name with no
/// occurrence is appended.
pub fn set_headers<'a, I>(headers: &mut Vec<HeaderEntry>, to_set: I)
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    for (name, value) in to_set {
        let mut found = false;
        for entry in headers.iter_mut().filter(|h| h.name.eq_ignore_ascii_case(name)) {
            entry.set_value(value);
            found = true;
        }
        if !found {
            headers.push(HeaderEntry::new(name, value));
        }
    }
}

/// Remove every header whose name matches any of `names`.
pub fn remove_headers<S: AsRef<str>>(headers: &mut Vec<HeaderEntry>, names: &[S]) {
    if names.is_empty() {
        return;
    }
    headers.retain(|h| !names.iter().any(|n| h.name.eq_ignore_ascii_case(n.as_ref())));
}

/// First text value of a header, by case-insensitive name.
pub fn find_header<'a>(headers: &'a [HeaderEntry], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .and_then(|h| h.value.as_deref())
}
