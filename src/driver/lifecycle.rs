//! Request lifecycle driver.
//!
//! # Responsibilities
//! - Intercept: unpack tagged URLs into direct associations
//! - HeadersSend: resolve a spec, rewrite request headers, bind the host
//!   request identifier
//! - HeadersReceived: rewrite response headers, then follow the redirect,
//!   retire the one-shot spec, or keep it
//!
//! # Design Decisions
//! - The store is passed in by `&mut` on every event; the caller decides
//!   how handlers are serialized
//! - A transform failure never blocks delivery: the host gets an empty
//!   outcome and sends the request as it was

use tracing::{debug, info, warn};

use crate::codec::{decode_token, split_tagged_url};
use crate::config::EngineConfig;
use crate::driver::events::{
    HeadersReceivedEvent, HeadersReceivedOutcome, HeadersSendEvent, HeadersSendOutcome,
    InterceptEvent, InterceptOutcome,
};
use crate::error::{Result, TamperError};
use crate::headers::{find_header, remove_headers, set_headers};
use crate::observability::metrics;
use crate::store::TamperStore;

/// Applies store decisions at the three interception points.
#[derive(Debug, Clone)]
pub struct LifecycleDriver {
    redirect_statuses: Vec<u16>,
}

impl Default for LifecycleDriver {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl LifecycleDriver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            redirect_statuses: config.redirect_statuses.clone(),
        }
    }

    /// URL seen before any bytes are sent.
    pub fn intercept(&self, store: &mut TamperStore, event: &InterceptEvent) -> InterceptOutcome {
        let Some(tagged) = split_tagged_url(&event.url) else {
            return InterceptOutcome::default();
        };

        match decode_token(tagged.token) {
            Ok(mut spec) => {
                spec.request_id = None;
                store.set(event.tab_id, event.frame_id, &tagged.url, spec);
                debug!(
                    tab_id = event.tab_id,
                    frame_id = event.frame_id,
                    url = %tagged.url,
                    "Tagged request stored, redirecting to untagged URL"
                );
                InterceptOutcome {
                    redirect_url: Some(tagged.url),
                }
            }
            Err(e) => {
                metrics::record_decode_failure();
                warn!(
                    tab_id = event.tab_id,
                    frame_id = event.frame_id,
                    error = %e,
                    "Ignoring tagged URL with undecodable token"
                );
                InterceptOutcome::default()
            }
        }
    }

    /// Request headers finalized; apply request-phase changes.
    pub fn headers_send(&self, store: &mut TamperStore, event: HeadersSendEvent) -> HeadersSendOutcome {
        let Some(mut spec) = store.get(event.tab_id, event.frame_id, &event.url) else {
            return HeadersSendOutcome::default();
        };

        let mut headers = event.request_headers;
        set_headers(&mut headers, spec.headers.values());
        remove_headers(&mut headers, &spec.remove);

        spec.request_id = Some(event.request_id.clone());
        store.set(event.tab_id, event.frame_id, &event.url, spec);
        metrics::record_spec_applied("request");

        debug!(
            tab_id = event.tab_id,
            frame_id = event.frame_id,
            url = %event.url,
            request_id = %event.request_id,
            "Request headers tampered"
        );

        HeadersSendOutcome {
            request_headers: Some(headers),
        }
    }

    /// Response headers available; apply response-phase changes and decide
    /// what happens to the spec.
    pub fn headers_received(
        &self,
        store: &mut TamperStore,
        event: HeadersReceivedEvent,
    ) -> Result<HeadersReceivedOutcome> {
        let Some(spec) = store.get_by_request_id(&event.request_id) else {
            return Ok(HeadersReceivedOutcome::default());
        };
        // Direct entries are always keyed by `set`.
        let Some(key) = spec.key.clone() else {
            return Ok(HeadersReceivedOutcome::default());
        };

        let location = if self.redirect_statuses.contains(&event.status_code) {
            let location = find_header(&event.response_headers, "location").ok_or_else(|| {
                TamperError::MalformedRedirect {
                    request_id: event.request_id.clone(),
                    status: event.status_code,
                }
            })?;
            Some(resolve_location(&key.url, location))
        } else {
            None
        };

        let response_headers = if spec.response.is_empty() {
            None
        } else {
            let mut headers = event.response_headers;
            set_headers(&mut headers, spec.response.headers.values());
            remove_headers(&mut headers, &spec.response.remove);
            metrics::record_spec_applied("response");
            Some(headers)
        };

        match location {
            Some(target) => {
                store.remove_direct(&key);
                info!(
                    request_id = %event.request_id,
                    status = event.status_code,
                    from = %key.url,
                    to = %target,
                    "Spec follows redirect"
                );
                store.set(key.tab_id, key.frame_id, &target, spec);
                metrics::record_redirect_followed();
            }
            None if spec.options.once => {
                store.remove_direct(&key);
                metrics::record_spec_retired();
                debug!(request_id = %event.request_id, key = %key, "One-shot spec retired");
            }
            None => {}
        }

        Ok(HeadersReceivedOutcome { response_headers })
    }
}

/// Absolute `Location` values are used verbatim; relative ones are joined
/// onto the URL that was redirected.
fn resolve_location(base: &str, location: &str) -> String {
    if url::Url::parse(location).is_ok() {
        return location.to_string();
    }
    url::Url::parse(base)
        .and_then(|base| base.join(location))
        .map(String::from)
        .unwrap_or_else(|_| location.to_string())
}
