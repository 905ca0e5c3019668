//! Reconciles path candidates against the live host.
//!
//! A candidate survives only when a synthetic request for it reaches the
//! candidate's own OData route, its template parses against the route's
//! model, and the route's convention chain finds a controller action able to
//! serve it. Survivors become [`RouteDescriptor`]s carrying the
//! `<Controller>_<Action>` operation id.

use crate::error::Result;
use crate::host::{HostDescription, ODataRoute, SyntheticRequest};
use crate::mapping::TypeMappings;
use crate::merge::{dedup_descriptions, RouteIdentity};
use crate::paths::PathCandidate;
use crate::router::Router;
use crate::swagger::{Operation, Parameter, ParameterLocation, Response};
use http::Method;
use tracing::{debug, info};

/// Where a descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorOrigin {
    /// Resolved through the named OData route
    OData { route: String },
    /// Registered by hand under the named OData route
    Custom { route: String },
}

/// A reachable operation: method, full path, documentation and the action
/// that serves it.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDescriptor {
    pub method: Method,
    /// Path relative to the document base path, with a leading `/`
    pub path: String,
    pub operation: Operation,
    pub controller: String,
    pub action: String,
    pub origin: DescriptorOrigin,
}

impl RouteIdentity for RouteDescriptor {
    fn method(&self) -> &Method {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }
}

/// Resolves candidates of one OData route.
pub struct Binder<'h> {
    host: &'h HostDescription,
    router: &'h Router,
    route_index: usize,
    route: &'h ODataRoute,
    mappings: &'h TypeMappings,
}

impl<'h> Binder<'h> {
    #[must_use]
    pub fn new(
        host: &'h HostDescription,
        router: &'h Router,
        route_index: usize,
        route: &'h ODataRoute,
        mappings: &'h TypeMappings,
    ) -> Self {
        Self {
            host,
            router,
            route_index,
            route,
            mappings,
        }
    }

    /// Resolve one candidate; `None` when no action of the host serves it.
    #[must_use]
    pub fn resolve(&self, candidate: PathCandidate) -> Option<RouteDescriptor> {
        let path = self.route.route_path(&candidate.template);
        match self.router.route(&candidate.method, &path) {
            Some(m) if m.route_index == self.route_index => {}
            Some(m) => {
                debug!(
                    method = %candidate.method,
                    path = %path,
                    shadowed_by = %m.route_name,
                    controller = m.get_param("controller").unwrap_or_default(),
                    captured = m.params.len(),
                    "Candidate dropped: claimed by an earlier route"
                );
                return None;
            }
            None => {
                debug!(method = %candidate.method, path = %path, "Candidate dropped: no route");
                return None;
            }
        }

        let odata_path = match self.route.parse(&candidate.template) {
            Ok(p) => p,
            Err(e) => {
                debug!(method = %candidate.method, path = %path, error = %e, "Candidate dropped: path does not parse");
                return None;
            }
        };

        let request = SyntheticRequest::new(candidate.method.clone(), path.clone(), &odata_path);
        let Some(selection) =
            self.route
                .conventions
                .select(&odata_path, &request, &self.host.controllers)
        else {
            debug!(
                method = %candidate.method,
                path = %path,
                odata_path = %odata_path.path_template(),
                "Candidate dropped: no controller action"
            );
            return None;
        };

        let mut operation = candidate.operation;
        operation.operation_id = Some(format!("{}_{}", selection.controller, selection.action.name));
        operation.tags = vec![selection.controller.clone()];

        for query in selection.action.query_parameters() {
            if !operation.has_parameter(&query.name, ParameterLocation::Query) {
                let schema = self.mappings.map(query.kind).to_schema();
                operation.parameters.push(Parameter::simple(
                    query.name.clone(),
                    ParameterLocation::Query,
                    false,
                    &schema,
                ));
            }
        }

        if let Some(schema) = &selection.action.response_type {
            replace_success_schema(&mut operation, schema.clone());
        }

        debug!(
            method = %candidate.method,
            path = %path,
            controller = %selection.controller,
            action = %selection.action.name,
            "Candidate resolved"
        );
        Some(RouteDescriptor {
            method: candidate.method,
            path,
            operation,
            controller: selection.controller,
            action: selection.action.name,
            origin: DescriptorOrigin::OData {
                route: self.route.name.clone(),
            },
        })
    }

    /// Resolve every candidate, then drop later duplicates of an identity.
    #[must_use]
    pub fn resolve_all(&self, candidates: Vec<PathCandidate>) -> Vec<RouteDescriptor> {
        let total = candidates.len();
        let resolved: Vec<RouteDescriptor> =
            candidates.into_iter().filter_map(|c| self.resolve(c)).collect();
        let resolved = dedup_descriptions(resolved);
        info!(
            route = %self.route.name,
            candidates = total,
            descriptors = resolved.len(),
            "Resolved path candidates against host"
        );
        resolved
    }

    /// Descriptor for a hand-registered candidate; no host lookup.
    #[must_use]
    pub fn describe_custom(&self, candidate: PathCandidate) -> RouteDescriptor {
        let path = self.route.route_path(&candidate.template);
        let controller = candidate.operation.tags.first().cloned().unwrap_or_default();
        let action = candidate.operation.operation_id.clone().unwrap_or_default();
        RouteDescriptor {
            method: candidate.method,
            path,
            operation: candidate.operation,
            controller,
            action,
            origin: DescriptorOrigin::Custom {
                route: self.route.name.clone(),
            },
        }
    }
}

/// Swap the schema of the first 2xx response, or add a `200` when the
/// operation had none.
fn replace_success_schema(operation: &mut Operation, schema: crate::swagger::Schema) {
    let success = operation
        .responses
        .iter_mut()
        .find(|(code, _)| code.starts_with('2'));
    match success {
        Some((_, response)) => response.schema = Some(schema),
        None => {
            operation
                .responses
                .insert("200".to_string(), Response::new("OK", Some(schema)));
        }
    }
}

/// Parse-and-select for a single template, for callers that want the error.
///
/// # Errors
///
/// [`crate::Error::InvalidPath`] when the template does not parse against the
/// route's model.
pub fn explain(
    host: &HostDescription,
    route: &ODataRoute,
    method: Method,
    template: &str,
) -> Result<Option<(String, String)>> {
    let odata_path = route.parse(template)?;
    let request = SyntheticRequest::new(method, route.route_path(template), &odata_path);
    Ok(route
        .conventions
        .select(&odata_path, &request, &host.controllers)
        .map(|s| (s.controller, s.action.name)))
}
