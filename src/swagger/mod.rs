//! # Swagger Module
//!
//! Swagger 2.0 document types: the shape both the OData-derived and the
//! conventional document take, and the shape handed to serializers.
//!
//! Maps are `BTreeMap`s so serialized output is stable between runs, which is
//! what makes cached and freshly generated documents byte-comparable. Schema
//! properties are the exception: [`Properties`] keeps declaration order.

mod types;

pub use types::*;
