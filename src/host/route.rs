use super::conventions::ConventionChain;
use super::controller::ControllerRegistry;
use super::path::{parse_path, ODataPath};
use crate::edm::EdmModel;
use crate::error::Result;
use std::sync::Arc;

/// A route serving an OData model under `prefix`.
#[derive(Debug, Clone)]
pub struct ODataRoute {
    pub name: String,
    /// Prefix without surrounding slashes; empty for a root route
    pub prefix: String,
    pub model: Arc<EdmModel>,
    pub conventions: Arc<ConventionChain>,
}

impl ODataRoute {
    /// Route using the default convention chain.
    #[must_use]
    pub fn new(name: impl Into<String>, prefix: &str, model: Arc<EdmModel>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.trim_matches('/').to_string(),
            model,
            conventions: Arc::new(ConventionChain::default()),
        }
    }

    #[must_use]
    pub fn with_conventions(mut self, conventions: ConventionChain) -> Self {
        self.conventions = Arc::new(conventions);
        self
    }

    /// Full path for a template relative to the prefix:
    /// `("odata", "/Customers")` → `/odata/Customers`.
    #[must_use]
    pub fn route_path(&self, template: &str) -> String {
        let template = template.trim_start_matches('/');
        if self.prefix.is_empty() {
            format!("/{template}")
        } else {
            format!("/{}/{template}", self.prefix)
        }
    }

    /// Parse `template`, relative to the prefix, against this route's model.
    /// The prefix is never stripped from the template, so a prefix that
    /// shares its name with an entity set still addresses that set.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidPath`] when the template does not address the
    /// model.
    pub fn parse(&self, template: &str) -> Result<ODataPath> {
        parse_path(&self.model, template)
    }
}

/// A non-OData route matched by template, e.g. `api/{controller}/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalRoute {
    pub name: String,
    pub template: String,
}

#[derive(Debug, Clone)]
pub enum RouteEntry {
    OData(ODataRoute),
    Conventional(ConventionalRoute),
}

impl RouteEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            RouteEntry::OData(route) => &route.name,
            RouteEntry::Conventional(route) => &route.name,
        }
    }

    #[must_use]
    pub fn as_odata(&self) -> Option<&ODataRoute> {
        match self {
            RouteEntry::OData(route) => Some(route),
            RouteEntry::Conventional(_) => None,
        }
    }
}

/// The live host as the generator sees it: an ordered route table and the
/// controllers requests are dispatched to.
#[derive(Debug, Clone, Default)]
pub struct HostDescription {
    pub routes: Vec<RouteEntry>,
    pub controllers: ControllerRegistry,
}

impl HostDescription {
    #[must_use]
    pub fn new(routes: Vec<RouteEntry>, controllers: ControllerRegistry) -> Self {
        Self {
            routes,
            controllers,
        }
    }

    #[must_use]
    pub fn route(mut self, route: RouteEntry) -> Self {
        self.routes.push(route);
        self
    }

    #[must_use]
    pub fn odata_route(self, route: ODataRoute) -> Self {
        self.route(RouteEntry::OData(route))
    }

    #[must_use]
    pub fn conventional_route(self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.route(RouteEntry::Conventional(ConventionalRoute {
            name: name.into(),
            template: template.into(),
        }))
    }

    #[must_use]
    pub fn controller(mut self, controller: super::ControllerDescriptor) -> Self {
        self.controllers.register(controller);
        self
    }

    /// OData routes with their index in the route table.
    pub fn odata_routes(&self) -> impl Iterator<Item = (usize, &ODataRoute)> {
        self.routes
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_odata().map(|o| (i, o)))
    }

    #[must_use]
    pub fn find_odata_route(&self, name: &str) -> Option<&ODataRoute> {
        self.odata_routes().map(|(_, r)| r).find(|r| r.name == name)
    }
}
