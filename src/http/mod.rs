//! HTTP host bridge.
//!
//! # Data Flow
//! ```text
//! host shim (webRequest hooks, page messages)
//!     → server.rs (Axum setup, middleware)
//!     → hooks.rs (JSON payload → driver / protocol)
//!     → store (behind one mutex)
//!     → JSON outcome back to the host
//! ```

pub mod hooks;
pub mod server;

pub use server::{AppState, HttpServer};
