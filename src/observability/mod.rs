//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! store, driver, protocol, bridge produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID (`x-request-id`) on every bridge span
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
