//! Tamper store subsystem.
//!
//! # Data Flow
//! ```text
//! MetaTamper command / config preset
//!     → pattern.rs (validate, compile matchers via matcher.rs)
//!     → tamper_store.rs patterns (newest first)
//!
//! tagged URL / resolved spec
//!     → tamper_store.rs direct (tabId::frameId::url)
//!
//! Request lookup:
//!     direct key hit → spec
//!     else first matching pattern → spec
//!     else None
//! ```

pub mod matcher;
pub mod pattern;
pub mod tamper_store;

pub use pattern::{PatternAssociation, PatternRegistration, RegexSource};
pub use tamper_store::{StoreSnapshot, TamperStore};
