//! # Paths Module
//!
//! Walks an [`EdmModel`](crate::edm::EdmModel) and produces one
//! [`PathCandidate`] per HTTP method and URL template the OData conventions
//! could serve: entity-set collections, single entities, operation imports and
//! bound operations.
//!
//! Candidates are not yet validated against a host. The binder decides which
//! of them are actually reachable and rewrites their operation ids; see
//! [`crate::binder`].
//!
//! ## Template shapes
//!
//! | Kind | Template |
//! |------|----------|
//! | Entity set | `/Customers` |
//! | Entity | `/Customers({Id})`, `/Products('{Id}')`, `/Lines(OrderId={OrderId},Sku='{Sku}')` |
//! | Function import | `/MostExpensive(currency='{currency}')` |
//! | Action import | `/ResetData` |
//! | Bound to collection | `/Customers/Default.Top(count={count})` |
//! | Bound to entity | `/Customers({Id})/Default.Rate` |
//!
//! Functions always carry parentheses; actions never do.

mod build;
mod custom;
mod template;
#[cfg(test)]
mod tests;

pub use build::build_paths_for_model;
pub use custom::{CustomOperation, CustomRoute};
pub use template::{
    entity_path, entity_set_path, function_parameters_segment, is_quoted, key_segment,
    placeholder,
};

use crate::swagger::Operation;
use http::Method;

/// What kind of OData resource a candidate addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    EntitySet,
    Entity,
    OperationImport,
    BoundToCollection,
    BoundToEntity,
    /// Registered by hand, never resolved against the host
    Custom,
}

/// A not-yet-validated (method, template, operation) triple.
///
/// `template` is relative to the OData route prefix and always starts with
/// `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCandidate {
    pub method: Method,
    pub template: String,
    pub operation: Operation,
    pub kind: PathKind,
}

impl PathCandidate {
    #[must_use]
    pub fn new(method: Method, template: String, operation: Operation, kind: PathKind) -> Self {
        Self {
            method,
            template,
            operation,
            kind,
        }
    }
}
