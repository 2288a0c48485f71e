//! The tamper store: which spec applies to which request.
//!
//! # Responsibilities
//! - Hold direct associations keyed by `tabId::frameId::url`
//! - Hold pattern associations, newest first
//! - Resolve a request to at most one spec
//! - Find a direct association again by host request identifier
//!
//! # Design Decisions
//! - Direct associations always win over patterns
//! - Among patterns the most recently registered wins
//! - Values move in and clones move out, so no caller ever aliases store
//!   state
//! - Absence is `None`, never an error

use serde::Serialize;
use std::collections::{HashMap, VecDeque};

use crate::error::Result;
use crate::observability::metrics;
use crate::store::pattern::{PatternAssociation, PatternRegistration};
use crate::tamper::{normalize, CompositeKey, TamperSpec};

/// Correlation state shared by every in-flight request.
#[derive(Debug, Default)]
pub struct TamperStore {
    direct: HashMap<CompositeKey, TamperSpec>,
    patterns: VecDeque<PatternAssociation>,
}

impl TamperStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pattern association ahead of all earlier ones.
    pub fn add_pattern(&mut self, registration: PatternRegistration) -> Result<()> {
        let association = PatternAssociation::compile(registration)?;
        self.patterns.push_front(association);
        self.record_size();
        Ok(())
    }

    /// Store `spec` under `(tab_id, frame_id, url)`, replacing any entry
    /// already there.
    pub fn set(&mut self, tab_id: i64, frame_id: i64, url: &str, spec: TamperSpec) {
        let key = CompositeKey::new(tab_id, frame_id, url);
        let mut spec = normalize(spec);
        spec.key = Some(key.clone());
        self.direct.insert(key, spec);
        self.record_size();
    }

    /// Resolve the spec for a request: direct association first, then the
    /// first matching pattern.
    pub fn get(&self, tab_id: i64, frame_id: i64, url: &str) -> Option<TamperSpec> {
        let key = CompositeKey::new(tab_id, frame_id, url);
        if let Some(spec) = self.direct.get(&key) {
            return Some(spec.clone());
        }

        self.patterns
            .iter()
            .find(|p| p.matches(url))
            .map(|p| p.tamper().clone())
    }

    /// Drop a direct association. Returns whether one was present.
    pub fn remove_direct(&mut self, key: &CompositeKey) -> bool {
        let removed = self.direct.remove(key).is_some();
        if removed {
            self.record_size();
        }
        removed
    }

    /// Find the direct association bound to a host request identifier.
    pub fn get_by_request_id(&self, request_id: &str) -> Option<TamperSpec> {
        self.direct
            .values()
            .find(|spec| spec.request_id.as_deref() == Some(request_id))
            .cloned()
    }

    pub fn direct_len(&self) -> usize {
        self.direct.len()
    }

    pub fn pattern_len(&self) -> usize {
        self.patterns.len()
    }

    /// Point-in-time copy of the whole store, direct entries sorted by key.
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut direct: Vec<TamperSpec> = self.direct.values().cloned().collect();
        direct.sort_by_cached_key(|spec| spec.key.as_ref().map(ToString::to_string));

        StoreSnapshot {
            direct,
            patterns: self.patterns.iter().map(PatternAssociation::to_registration).collect(),
        }
    }

    fn record_size(&self) {
        metrics::record_store_size(self.direct.len(), self.patterns.len());
    }
}

/// Serializable view of the store.
#[derive(Debug, Clone, Serialize)]
pub struct StoreSnapshot {
    pub direct: Vec<TamperSpec>,
    pub patterns: Vec<PatternRegistration>,
}
