//! Request lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Intercepted      {tabId, frameId, url}
//!     → tagged? decode token, store under untagged URL, redirect
//! HeadersSent      {tabId, frameId, url, requestId, requestHeaders}
//!     → store.get → set/remove request headers → bind requestId
//! ResponseReceived {requestId, statusCode, responseHeaders}
//!     → store.get_by_request_id → set/remove response headers
//!     → redirect: re-key to Location | once: retire | else keep
//! ```

pub mod events;
pub mod lifecycle;

pub use events::{
    HeadersReceivedEvent, HeadersReceivedOutcome, HeadersSendEvent, HeadersSendOutcome,
    InterceptEvent, InterceptOutcome,
};
pub use lifecycle::LifecycleDriver;
