//! Modification specs.
//!
//! # Data Flow
//! ```text
//! caller JSON / TOML / tagged URL token
//!     → spec.rs (deserialize, every field defaulted)
//!     → normalize.rs (null header values become removals)
//!     → store (keyed by key.rs CompositeKey or attached to a pattern)
//! ```

pub mod key;
pub mod normalize;
pub mod spec;

pub use key::CompositeKey;
pub use normalize::normalize;
pub use spec::{HeaderChanges, HeaderTable, TamperOptions, TamperSpec};
