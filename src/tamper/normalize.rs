//! Spec normalization.
//!
//! A normalized spec carries no removal markers in either header table: each
//! null-valued entry has been moved into the phase's `remove` list. Since
//! removals are applied after header-setting, a name present in both places
//! ends up removed.

use crate::tamper::spec::{HeaderTable, TamperSpec};

/// Canonicalize a caller-supplied spec. Idempotent.
pub fn normalize(mut spec: TamperSpec) -> TamperSpec {
    migrate_removals(&mut spec.headers, &mut spec.remove);
    migrate_removals(&mut spec.response.headers, &mut spec.response.remove);
    spec
}

fn migrate_removals(headers: &mut HeaderTable, remove: &mut Vec<String>) {
    for name in headers.take_removals() {
        if !remove.contains(&name) {
            remove.push(name);
        }
    }
}
