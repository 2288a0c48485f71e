//! Header manipulation.
//!
//! Pure functions over the ordered `{name, value}` lists the host delivers at
//! each interception point.

pub mod transform;

pub use transform::{find_header, remove_headers, set_headers, HeaderEntry};
