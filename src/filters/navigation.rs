//! Cuts navigation properties out of definitions.
//!
//! A navigation property is one whose schema is a bare `$ref` or an array of
//! `$ref`s. Response envelopes keep theirs: their `value` is exactly such a
//! reference.

use super::{DocumentFilter, FilterContext};
use crate::schema::RESPONSE_ENVELOPE_MARKER;
use crate::swagger::Document;
use tracing::debug;

/// Remove navigation properties unless `include_navigation_properties`.
/// Returns how many properties were removed.
pub fn prune(document: &mut Document, include_navigation_properties: bool) -> usize {
    if include_navigation_properties {
        return 0;
    }
    let mut removed = 0;
    for (name, schema) in document.definitions.iter_mut() {
        if name.contains(RESPONSE_ENVELOPE_MARKER) {
            continue;
        }
        let before = schema.properties.len();
        schema
            .properties
            .retain(|_, p| !(p.is_reference_array() || p.is_bare_reference()));
        let dropped = before - schema.properties.len();
        if dropped > 0 {
            debug!(definition = %name, dropped, "Navigation properties removed");
            removed += dropped;
        }
    }
    removed
}

/// [`prune`] as a pipeline stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationLimiter {
    pub include_navigation_properties: bool,
}

impl DocumentFilter for NavigationLimiter {
    fn apply(&self, document: &mut Document, _context: &FilterContext<'_>) {
        prune(document, self.include_navigation_properties);
    }
}
