//! Header tamper engine.
//!
//! Resolves, for every request a host routes through it, which modification
//! spec applies: one carried in a tagged URL or one registered against a URL
//! pattern. The spec follows the request from interception through header
//! send and header receipt, across redirects.

pub mod admin;
pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod protocol;
pub mod store;
pub mod tamper;

pub use config::TamperConfig;
pub use driver::LifecycleDriver;
pub use error::{Result, TamperError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::TamperStore;
pub use tamper::TamperSpec;
