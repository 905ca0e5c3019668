//! # EDM Module
//!
//! The entity data model the documentation is derived from: entity, complex
//! and enum types, entity sets, and bound or unbound operations.
//!
//! A model is immutable once built and is shared between concurrent document
//! generations behind an `Arc`. Models are either assembled in code or loaded
//! from a YAML/JSON definition:
//!
//! ```yaml
//! namespace: Default
//! entity_types:
//!   - name: Customer
//!     key: [Id]
//!     properties:
//!       - { name: Id, type: Edm.Int32 }
//!       - { name: Orders, type: Collection(Order) }
//! entity_sets:
//!   - { name: Customers, entity_type: Customer }
//! operations:
//!   - name: Rate
//!     kind: action
//!     bound: true
//!     parameters:
//!       - { name: bindingParameter, type: Customer }
//!       - { name: rating, type: Edm.Int32 }
//! ```

mod load;
mod types;

#[cfg(test)]
mod tests;

pub use load::*;
pub use types::*;
