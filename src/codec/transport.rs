//! Tagged URL transport.
//!
//! Wire format: `<originalUrl>$TamperApi:<token>` where `<token>` is the
//! unpadded base64url encoding of the spec's UTF-8 JSON. The token alphabet
//! is `A-Z a-z 0-9 - _`, so it never contains the `/` that terminates it.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Result, TamperError};
use crate::tamper::TamperSpec;

/// Marker separating the real URL from the embedded token.
pub const TAG_DELIMITER: &str = "$TamperApi:";

/// Encode a spec as a URL-safe token.
pub fn encode_token(spec: &TamperSpec) -> Result<String> {
    let json = serde_json::to_vec(spec)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Exact inverse of [`encode_token`]. Trailing padding is tolerated.
pub fn decode_token(token: &str) -> Result<TamperSpec> {
    let bytes = URL_SAFE_NO_PAD
        .decode(token.trim_end_matches('='))
        .map_err(|e| TamperError::Decode(e.to_string()))?;
    let json = String::from_utf8(bytes).map_err(|e| TamperError::Decode(e.to_string()))?;
    serde_json::from_str(&json).map_err(|e| TamperError::Decode(e.to_string()))
}

/// Append a spec token to `url`.
pub fn tag_url(url: &str, spec: &TamperSpec) -> Result<String> {
    Ok(format!("{url}{TAG_DELIMITER}{}", encode_token(spec)?))
}

/// A URL split into its real target and embedded token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedUrl<'a> {
    /// URL with the delimiter and token cut out.
    pub url: String,
    pub token: &'a str,
}

/// Find a tag in `url`. The token runs from the delimiter up to, but not
/// including, the next `/`; anything after that stays part of the URL.
pub fn split_tagged_url(url: &str) -> Option<TaggedUrl<'_>> {
    let start = url.find(TAG_DELIMITER)?;
    let token_start = start + TAG_DELIMITER.len();
    let rest = &url[token_start..];
    let token_len = rest.find('/').unwrap_or(rest.len());

    let mut stripped = String::with_capacity(url.len());
    stripped.push_str(&url[..start]);
    stripped.push_str(&rest[token_len..]);

    Some(TaggedUrl {
        url: stripped,
        token: &rest[..token_len],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_tag_then_split() {
        let spec = TamperSpec::new().set_header("Origin", "evil.test").once();
        let tagged = tag_url("http://x.test/a?q=1", &spec).unwrap();
        assert!(tagged.starts_with("http://x.test/a?q=1$TamperApi:"));

        let split = split_tagged_url(&tagged).unwrap();
        assert_eq!(split.url, "http://x.test/a?q=1");
        assert_eq!(decode_token(split.token).unwrap(), spec);
    }

    #[test]
    fn test_token_stops_at_path_separator() {
        let split = split_tagged_url("http://x.test$TamperApi:abc/rest").unwrap();
        assert_eq!(split.token, "abc");
        assert_eq!(split.url, "http://x.test/rest");
    }

    #[test]
    fn test_untagged_url() {
        assert!(split_tagged_url("http://x.test/a").is_none());
    }

    #[test]
    fn test_empty_spec_round_trip() {
        let spec = TamperSpec::default();
        assert_eq!(decode_token(&encode_token(&spec).unwrap()).unwrap(), spec);
    }

    #[test]
    fn test_padded_token_accepted() {
        let token = encode_token(&TamperSpec::new().set_header("A", "b")).unwrap();
        let padded = format!("{token}==");
        assert!(decode_token(&padded).is_ok());
    }

    #[test]
    fn test_invalid_token_is_decode_error() {
        assert!(matches!(decode_token("!!!"), Err(TamperError::Decode(_))));

        let not_json = URL_SAFE_NO_PAD.encode("not json");
        assert!(matches!(decode_token(&not_json), Err(TamperError::Decode(_))));

        let not_utf8 = URL_SAFE_NO_PAD.encode([0xff, 0xfe]);
        assert!(matches!(decode_token(&not_utf8), Err(TamperError::Decode(_))));
    }

    proptest! {
        #[test]
        fn prop_token_round_trip(
            entries in prop::collection::vec(("\\PC{1,6}", prop::option::of("\\PC{0,10}")), 0..5),
            remove in prop::collection::vec("\\PC{1,6}", 0..3),
            once in any::<bool>(),
        ) {
            let mut spec = TamperSpec {
                headers: entries.into_iter().collect(),
                remove,
                ..Default::default()
            };
            spec.response.headers.insert("Grüße", Some("日本語 ✓".to_string()));
            spec.options.once = once;

            let token = encode_token(&spec).unwrap();
            prop_assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            prop_assert_eq!(decode_token(&token).unwrap(), spec);
        }
    }
}
