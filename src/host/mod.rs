//! # Host Module
//!
//! The live host the documentation is reconciled against: an ordered route
//! table of OData and conventional routes, the controllers requests are
//! dispatched to, and the routing conventions that map an OData path onto a
//! controller action.
//!
//! ## Overview
//!
//! - [`HostDescription`] - route table plus [`ControllerRegistry`]
//! - [`ODataRoute`] - prefix, model and [`ConventionChain`]
//! - [`parse_path`] - template to [`ODataPath`]
//! - [`ConventionChain`] - ordered [`ControllerSelector`]s and
//!   [`ActionSelector`]s, first `Some` wins
//! - [`load_host`] - YAML/JSON host files referencing model files
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use odata_swagger::edm::parse_model;
//! use odata_swagger::host::{ActionDescriptor, ActionParameter, ControllerDescriptor, HostDescription, ODataRoute};
//! use std::sync::Arc;
//!
//! let model = Arc::new(parse_model(r#"
//! namespace: Default
//! entity_types:
//!   - { name: Customer, key: [Id], properties: [{ name: Id, type: Edm.Int32 }] }
//! entity_sets:
//!   - { name: Customers, entity_type: Customer }
//! "#).unwrap());
//!
//! let host = HostDescription::default()
//!     .odata_route(ODataRoute::new("odata", "odata", model))
//!     .controller(
//!         ControllerDescriptor::new("Customers")
//!             .action(ActionDescriptor::new("Get", &[Method::GET]))
//!             .action(ActionDescriptor::new("Get", &[Method::GET]).parameter(ActionParameter::uri("key"))),
//!     );
//! assert_eq!(host.odata_routes().count(), 1);
//! ```

mod controller;
mod conventions;
mod load;
pub(crate) mod methods;
mod path;
mod route;

pub use controller::*;
pub use conventions::*;
pub use load::*;
pub use path::*;
pub use route::*;
