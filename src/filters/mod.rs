//! # Filters Module
//!
//! Post-processing stages that run over a finished document.
//!
//! Two built-in stages run on the OData document before it is merged:
//! - [`operation_ids`] makes every operation id unique;
//! - [`navigation`] cuts navigation properties out of the definitions.
//!
//! After the merge, user [`DocumentFilter`]s run in registration order, then
//! user [`OperationFilter`]s, once per operation in document order.
//!
//! ## Example
//!
//! ```rust
//! use odata_swagger::filters::{DocumentFilter, FilterContext};
//! use odata_swagger::swagger::{Document, Info};
//!
//! struct Retitle;
//!
//! impl DocumentFilter for Retitle {
//!     fn apply(&self, document: &mut Document, _context: &FilterContext<'_>) {
//!         document.info.title = "Retitled".into();
//!     }
//! }
//!
//! let mut doc = Document::new(Info::new("v1", "API"));
//! Retitle.apply(&mut doc, &FilterContext { api_version: "v1", root_url: "http://localhost/" });
//! assert_eq!(doc.info.title, "Retitled");
//! ```

pub mod navigation;
pub mod operation_ids;

pub use navigation::{prune, NavigationLimiter};
pub use operation_ids::{uniquify, OperationIdUniquifier};

use crate::swagger::{Document, Operation};
use http::Method;

/// What a document is being generated for.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub api_version: &'a str,
    pub root_url: &'a str,
}

/// Where an operation sits in the document.
#[derive(Debug, Clone, Copy)]
pub struct OperationContext<'a> {
    pub api_version: &'a str,
    pub path: &'a str,
    pub method: &'a Method,
}

/// Rewrites a whole document.
pub trait DocumentFilter: Send + Sync {
    fn apply(&self, document: &mut Document, context: &FilterContext<'_>);
}

/// Rewrites one operation at a time.
pub trait OperationFilter: Send + Sync {
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>);
}

impl<F> DocumentFilter for F
where
    F: Fn(&mut Document, &FilterContext<'_>) + Send + Sync,
{
    fn apply(&self, document: &mut Document, context: &FilterContext<'_>) {
        self(document, context)
    }
}

impl<F> OperationFilter for F
where
    F: Fn(&mut Operation, &OperationContext<'_>) + Send + Sync,
{
    fn apply(&self, operation: &mut Operation, context: &OperationContext<'_>) {
        self(operation, context)
    }
}

/// Run `filters` over every operation of `document`.
pub fn apply_operation_filters(
    document: &mut Document,
    filters: &[std::sync::Arc<dyn OperationFilter>],
    api_version: &str,
) {
    if filters.is_empty() {
        return;
    }
    for (path, method, operation) in document.operations_mut() {
        let context = OperationContext {
            api_version,
            path,
            method: &method,
        };
        for filter in filters {
            filter.apply(operation, &context);
        }
    }
}
