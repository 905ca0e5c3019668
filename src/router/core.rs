use crate::host::{HostDescription, RouteEntry};
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maximum number of template parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured template parameters. Names come from the route table and are
/// shared; values are per request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of matching a request path against the host route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Position of the matched route in the host table
    pub route_index: usize,
    pub route_name: String,
    /// Whether the matched route serves OData
    pub is_odata: bool,
    /// Parameters captured by a conventional template
    pub params: ParamVec,
}

impl RouteMatch {
    /// Last captured value for `name`.
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    /// `/prefix` and everything below it
    Prefix(String),
    Template { regex: Regex, params: Vec<Arc<str>> },
}

impl Matcher {
    fn matches(&self, path: &str) -> Option<ParamVec> {
        match self {
            Matcher::Prefix(prefix) if prefix.is_empty() => Some(ParamVec::new()),
            Matcher::Prefix(prefix) => {
                let rest = path.trim_start_matches('/').strip_prefix(prefix.as_str())?;
                (rest.is_empty() || rest.starts_with('/')).then(ParamVec::new)
            }
            Matcher::Template { regex, params } => {
                let caps = regex.captures(path)?;
                Some(
                    params
                        .iter()
                        .enumerate()
                        .filter_map(|(i, name)| {
                            caps.get(i + 1)
                                .map(|m| (Arc::clone(name), m.as_str().to_string()))
                        })
                        .collect(),
                )
            }
        }
    }
}

/// Matches synthetic requests against the host route table, in table order.
///
/// OData routes claim every path under their prefix regardless of method.
/// Conventional routes match their template with one capture per `{param}`
/// segment; a template that does not compile is skipped with a warning.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<(String, bool, Matcher)>,
}

impl Router {
    #[must_use]
    pub fn new(host: &HostDescription) -> Self {
        let mut routes = Vec::with_capacity(host.routes.len());
        for route in &host.routes {
            match route {
                RouteEntry::OData(odata) => {
                    routes.push((odata.name.clone(), true, Matcher::Prefix(odata.prefix.clone())));
                }
                RouteEntry::Conventional(conventional) => {
                    match Self::path_to_regex(&conventional.template) {
                        Ok((regex, params)) => routes.push((
                            conventional.name.clone(),
                            false,
                            Matcher::Template { regex, params },
                        )),
                        Err(e) => warn!(
                            route = %conventional.name,
                            template = %conventional.template,
                            error = %e,
                            "Conventional route template does not compile; skipped"
                        ),
                    }
                }
            }
        }

        let routes_summary: Vec<String> = host
            .routes
            .iter()
            .take(10)
            .map(|r| r.name().to_string())
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        Self { routes }
    }

    /// First route, in table order, that claims `path`.
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let path = path.split('?').next().unwrap_or(path);
        for (index, (name, is_odata, matcher)) in self.routes.iter().enumerate() {
            if let Some(params) = matcher.matches(path) {
                debug!(
                    method = %method,
                    path = %path,
                    route = %name,
                    route_index = index,
                    path_params = ?params,
                    "Route matched"
                );
                return Some(RouteMatch {
                    route_index: index,
                    route_name: name.clone(),
                    is_odata: *is_odata,
                    params,
                });
            }
        }
        debug!(method = %method, path = %path, "No route matched");
        None
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Convert a route template to an anchored regex and its parameter names.
    ///
    /// `api/{controller}/{id}` becomes `^/api/([^/]+)/([^/]+)$`; literal
    /// segments are escaped.
    ///
    /// # Errors
    ///
    /// Returns the regex error when the resulting pattern does not compile.
    pub(crate) fn path_to_regex(template: &str) -> Result<(Regex, Vec<Arc<str>>), regex::Error> {
        let template = template.trim_matches('/');
        if template.is_empty() {
            return Ok((Regex::new(r"^/?$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(template.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(template.matches('{').count());

        for segment in template.split('/') {
            if segment.starts_with('{') && segment.ends_with('}') {
                let param_name = segment.trim_start_matches('{').trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(Arc::from(param_name));
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}
