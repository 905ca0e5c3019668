//! Combines the conventional and OData documents into one.
//!
//! The conventional document is the base: for every keyed collection the
//! conventional entry wins a collision, list collections are unioned with the
//! conventional entries first, and scalar metadata (`info`, `host`,
//! `basePath`) is taken from it unchanged.

use crate::swagger::Document;
use http::Method;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Identity of a described route: method plus normalized path.
pub trait RouteIdentity {
    fn method(&self) -> &Method;
    fn path(&self) -> &str;

    /// Lowercase method and [`normalize_path`] of the path.
    fn identity(&self) -> (String, String) {
        (
            self.method().as_str().to_ascii_lowercase(),
            normalize_path(self.path()),
        )
    }
}

/// Leading `/` ensured, query string dropped, lowercased.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.split('?').next().unwrap_or(path);
    let path = path.to_ascii_lowercase();
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

/// Keep the first description per identity, in input order.
#[must_use]
pub fn dedup_descriptions<T: RouteIdentity>(descriptions: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    descriptions
        .into_iter()
        .filter(|d| {
            let fresh = seen.insert(d.identity());
            if !fresh {
                debug!(
                    method = %d.method(),
                    path = %d.path(),
                    "Duplicate description dropped"
                );
            }
            fresh
        })
        .collect()
}

fn merge_map<V>(base: &mut BTreeMap<String, V>, other: BTreeMap<String, V>) {
    for (key, value) in other {
        base.entry(key).or_insert(value);
    }
}

fn union<T: PartialEq>(base: &mut Vec<T>, other: Vec<T>) {
    let mut deduped: Vec<T> = Vec::with_capacity(base.len() + other.len());
    for item in base.drain(..).chain(other) {
        if !deduped.contains(&item) {
            deduped.push(item);
        }
    }
    *base = deduped;
}

/// Merge `odata` into `convention`. Never fails.
#[must_use]
pub fn merge(convention: Document, odata: Document) -> Document {
    let mut merged = convention;
    let before = merged.paths.len();

    merge_map(&mut merged.paths, odata.paths);
    merge_map(&mut merged.definitions, odata.definitions);
    merge_map(&mut merged.parameters, odata.parameters);
    merge_map(&mut merged.responses, odata.responses);
    merge_map(&mut merged.security_definitions, odata.security_definitions);
    merge_map(&mut merged.extensions, odata.extensions);

    let mut tags = std::mem::take(&mut merged.tags);
    let mut seen: HashSet<String> = tags.iter().map(|t| t.name.clone()).collect();
    tags.extend(odata.tags.into_iter().filter(|t| seen.insert(t.name.clone())));
    merged.tags = tags;

    union(&mut merged.consumes, odata.consumes);
    union(&mut merged.produces, odata.produces);
    union(&mut merged.schemes, odata.schemes);
    union(&mut merged.security, odata.security);

    debug!(
        conventional_paths = before,
        merged_paths = merged.paths.len(),
        definitions = merged.definitions.len(),
        "Merged OData document into conventional document"
    );
    merged
}
