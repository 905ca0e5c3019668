//! Makes operation ids unique across a document.
//!
//! Ids leaving the binder are `<Controller>_<Action>`, so every overload of
//! an action shares one. Two passes settle that:
//!
//! 1. an id without `By` on an operation with path parameters gets
//!    `By<P1>And<P2>...` appended, parameters in declared order;
//! 2. ids still shared are numbered `_1`, `_2`, ... in document order, the
//!    first holder included.

use super::{DocumentFilter, FilterContext};
use crate::swagger::Document;
use std::collections::HashMap;
use tracing::debug;

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Rewrite operation ids in place. Operations without an id are left alone.
pub fn uniquify(document: &mut Document) {
    for (_, _, operation) in document.operations_mut() {
        let Some(id) = operation.operation_id.as_deref() else {
            continue;
        };
        if id.contains("By") {
            continue;
        }
        let names: Vec<String> = operation
            .path_parameters()
            .map(|p| title_case(&p.name))
            .collect();
        if names.is_empty() {
            continue;
        }
        let suffixed = format!("{id}By{}", names.join("And"));
        operation.operation_id = Some(suffixed);
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for (_, _, operation) in document.operations() {
        if let Some(id) = &operation.operation_id {
            *counts.entry(id.clone()).or_default() += 1;
        }
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for (path, method, operation) in document.operations_mut() {
        let Some(id) = operation.operation_id.take() else {
            continue;
        };
        if counts.get(&id).copied().unwrap_or(0) > 1 {
            let n = seen.entry(id.clone()).or_default();
            *n += 1;
            let numbered = format!("{id}_{n}");
            debug!(path = %path, method = %method, from = %id, to = %numbered, "Operation id numbered");
            operation.operation_id = Some(numbered);
        } else {
            operation.operation_id = Some(id);
        }
    }
}

/// [`uniquify`] as a pipeline stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationIdUniquifier;

impl DocumentFilter for OperationIdUniquifier {
    fn apply(&self, document: &mut Document, _context: &FilterContext<'_>) {
        uniquify(document);
    }
}
