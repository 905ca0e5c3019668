//! # Router Module
//!
//! Matches synthetic requests against the host's ordered route table so the
//! binder can tell whether an OData candidate is actually reachable.
//!
//! ## Overview
//!
//! A path belongs to the first route in table order that claims it:
//! - an OData route claims `/prefix` and every path below it;
//! - a conventional route claims paths its template matches, with one
//!   capture per `{param}` segment.
//!
//! A conventional route placed before an OData route can therefore shadow
//! OData paths, and those candidates are left out of the documentation.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use odata_swagger::edm::EdmModel;
//! use odata_swagger::host::{HostDescription, ODataRoute};
//! use odata_swagger::router::Router;
//! use std::sync::Arc;
//!
//! let host = HostDescription::default()
//!     .conventional_route("DefaultApi", "api/{controller}/{id}")
//!     .odata_route(ODataRoute::new("odata", "odata", Arc::new(EdmModel::default())));
//! let router = Router::new(&host);
//!
//! let m = router.route(&Method::GET, "/api/values/5").unwrap();
//! assert_eq!(m.get_param("id"), Some("5"));
//! assert!(router.route(&Method::GET, "/odata/Customers").unwrap().is_odata);
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use core::{ParamVec, RouteMatch, Router, MAX_INLINE_PARAMS};
