//! Spec transport codec for one-off, per-request tampering.

pub mod transport;

pub use transport::{decode_token, encode_token, split_tagged_url, tag_url, TaggedUrl, TAG_DELIMITER};
