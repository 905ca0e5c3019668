//! # odata-swagger
//!
//! **odata-swagger** produces Swagger 2.0 documentation for OData services. It walks an
//! Entity Data Model, synthesizes the paths, parameters and response schemas the model
//! implies, keeps only the operations the host can actually dispatch, and merges the
//! result with the document describing the host's conventional routes.
//!
//! ## Architecture
//!
//! Leaves first:
//!
//! - **[`mapping`]** - Primitive EDM kinds to Swagger `type`/`format`
//! - **[`schema`]** - Definitions for structured types, response envelopes, the error schema
//! - **[`paths`]** - Path candidates for entity sets, entities and operations
//! - **[`host`]** - Route table, controllers, OData path parsing, routing conventions
//! - **[`router`]** - Which route of the host table claims a synthetic request
//! - **[`binder`]** - Candidates reconciled against the host into route descriptors
//! - **[`conventional`]** - The conventional document and conflict resolution
//! - **[`merge`]** - Conventional and OData documents combined
//! - **[`filters`]** - Operation-id uniquifier, navigation limiter, user filters
//! - **[`generator`]** - The pipeline, API versions and cached documents
//!
//! Supporting modules: [`edm`], [`swagger`], [`cache`], [`config`], [`error`],
//! [`hot_reload`], [`logging`] and [`cli`].
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Gen as generator
//!     participant Paths as paths
//!     participant Binder as binder
//!     participant Conv as conventional
//!     participant Merge as merge
//!
//!     Gen->>Paths: build_paths_for_model(registry)
//!     Paths-->>Gen: Vec<PathCandidate>
//!     Gen->>Binder: resolve_all(candidates)
//!     Binder-->>Gen: Vec<RouteDescriptor>
//!     Gen->>Gen: uniquify ids, prune navigation
//!     Gen->>Conv: build_document(api)
//!     Gen->>Merge: merge(conventional, odata)
//!     Merge-->>Gen: Document
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use odata_swagger::config::GeneratorOptions;
//! use odata_swagger::conventional::ConventionalApi;
//! use odata_swagger::edm::parse_model;
//! use odata_swagger::generator::DocumentGenerator;
//! use odata_swagger::host::{ActionDescriptor, ControllerDescriptor, HostDescription, ODataRoute};
//! use std::sync::Arc;
//!
//! let model = parse_model(r#"
//! namespace: Default
//! entity_types:
//!   - name: Customer
//!     key: [Id]
//!     properties:
//!       - { name: Id, type: Edm.Int32 }
//! entity_sets:
//!   - { name: Customers, entity_type: Customer }
//! "#).unwrap();
//!
//! let host = HostDescription::default()
//!     .odata_route(ODataRoute::new("odata", "odata", Arc::new(model)))
//!     .controller(
//!         ControllerDescriptor::new("Customers")
//!             .action(ActionDescriptor::new("Get", &[Method::GET])),
//!     );
//!
//! let generator = DocumentGenerator::new(
//!     GeneratorOptions::builder().api_version("v1", "Customers API").build(),
//!     host,
//!     Arc::new(ConventionalApi::default()),
//! );
//! let doc = generator.get_document("http://localhost:5000/", "v1").unwrap();
//! let get = doc.operation("/odata/Customers", &Method::GET).unwrap();
//! assert_eq!(get.operation_id.as_deref(), Some("Customers_Get"));
//! ```
//!
//! ## Command Line
//!
//! ```bash
//! odata-swagger generate --host host.yaml --conventional api.yaml --output swagger.json
//! odata-swagger inspect --host host.yaml
//! ```

pub mod binder;
pub mod cache;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod edm;
pub mod error;
pub mod filters;
pub mod generator;
pub mod host;
pub mod hot_reload;
pub mod logging;
pub mod mapping;
pub mod merge;
pub mod paths;
pub mod router;
pub mod schema;
pub mod swagger;

pub use error::{Error, Result};
pub use generator::DocumentGenerator;
