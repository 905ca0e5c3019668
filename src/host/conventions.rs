//! Routing conventions: which controller and action serve an OData path.
//!
//! A [`ConventionChain`] holds ordered controller and action selectors; the
//! first selector returning `Some` wins. The default chain mirrors how OData
//! hosts dispatch by convention:
//!
//! | Path | Controller | Action candidates |
//! |------|------------|-------------------|
//! | `~/entityset` | entity set | `Get<Type>`, `Get` / `Post<Type>`, `Post` |
//! | `~/entityset/key` | entity set | `<Verb><Type>`, `<Verb>` |
//! | `~/entityset/key/action` | entity set | `<Name>On<Type>`, `<Name>` |
//! | `~/entityset/action` | entity set | `<Name>OnCollectionOf<Type>`, `<Name>` |
//! | `~/unboundfunction`, `~/unboundaction` | `OData` | import name |
//!
//! Functions use the same shapes as actions with GET instead of POST.

use super::controller::{ActionDescriptor, ActionLookup, ActionMap};
use super::path::{ODataPath, ODataPathSegment};
use super::ControllerRegistry;
use crate::edm::OperationKind;
use crate::schema::short_name;
use http::Method;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

/// Controller serving operation imports under the default chain.
pub const OPERATION_IMPORT_CONTROLLER: &str = "OData";

/// Route value names; requests rarely carry more than a handful.
pub type RouteValues = SmallVec<[String; 8]>;

/// A request made up from a path candidate: no body, no headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticRequest {
    pub method: Method,
    pub path: String,
    pub route_values: RouteValues,
}

impl SyntheticRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, odata_path: &ODataPath) -> Self {
        Self {
            method,
            path: path.into(),
            route_values: odata_path.route_values().into_iter().collect(),
        }
    }
}

/// What an action selector sees once a controller was chosen.
#[derive(Debug, Clone, Copy)]
pub struct ControllerContext<'a> {
    pub controller: &'a str,
    pub request: &'a SyntheticRequest,
    pub key_names: &'a [String],
}

impl ControllerContext<'_> {
    fn lookup(&self, odata_path: &ODataPath) -> ActionLookup<'_> {
        ActionLookup {
            method: &self.request.method,
            route_values: &self.request.route_values,
            key_names: self.key_names,
            requires_key: odata_path.has_key(),
        }
    }
}

pub trait ControllerSelector: Send + Sync {
    fn select_controller(&self, path: &ODataPath, request: &SyntheticRequest) -> Option<String>;
}

pub trait ActionSelector: Send + Sync {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String>;
}

/// `Get` → `["GetCustomer", "Get"]`
fn verb_names(verb: &str, entity_type: &str) -> Vec<String> {
    vec![format!("{verb}{}", short_name(entity_type)), verb.to_string()]
}

fn verb(method: &Method) -> Option<&'static str> {
    match *method {
        Method::GET => Some("Get"),
        Method::POST => Some("Post"),
        Method::PUT => Some("Put"),
        Method::PATCH => Some("Patch"),
        Method::DELETE => Some("Delete"),
        _ => None,
    }
}

fn entity_set_controller(path: &ODataPath) -> Option<String> {
    path.entity_set().map(|(name, _)| name.to_string())
}

/// `~/entityset`: GET lists, POST creates.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitySetConvention;

impl ControllerSelector for EntitySetConvention {
    fn select_controller(&self, path: &ODataPath, _request: &SyntheticRequest) -> Option<String> {
        (path.path_template() == "~/entityset")
            .then(|| entity_set_controller(path))
            .flatten()
    }
}

impl ActionSelector for EntitySetConvention {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        if path.path_template() != "~/entityset" {
            return None;
        }
        let verb = match ctx.request.method {
            Method::GET => "Get",
            Method::POST => "Post",
            _ => return None,
        };
        let (_, entity_type) = path.entity_set()?;
        action_map.select_first(&verb_names(verb, entity_type), &ctx.lookup(path))
    }
}

/// `~/entityset/key`: GET, PUT, PATCH, DELETE on one entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityConvention;

impl ControllerSelector for EntityConvention {
    fn select_controller(&self, path: &ODataPath, _request: &SyntheticRequest) -> Option<String> {
        (path.path_template() == "~/entityset/key")
            .then(|| entity_set_controller(path))
            .flatten()
    }
}

impl ActionSelector for EntityConvention {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        if path.path_template() != "~/entityset/key" {
            return None;
        }
        let verb = match verb(&ctx.request.method)? {
            "Post" => return None,
            other => other,
        };
        let (_, entity_type) = path.entity_set()?;
        action_map.select_first(&verb_names(verb, entity_type), &ctx.lookup(path))
    }
}

/// Bound operation of `kind` invoked with `method`.
fn bound_operation_names(
    path: &ODataPath,
    kind: OperationKind,
    method: &Method,
) -> Option<Vec<String>> {
    let ODataPathSegment::BoundOperation {
        name, kind: actual, ..
    } = path.last()?
    else {
        return None;
    };
    if *actual != kind {
        return None;
    }
    let expected = match kind {
        OperationKind::Function => Method::GET,
        OperationKind::Action => Method::POST,
    };
    if *method != expected {
        return None;
    }
    let (_, entity_type) = path.entity_set()?;
    let entity = short_name(entity_type);
    let qualified = if path.has_key() {
        format!("{name}On{entity}")
    } else {
        format!("{name}OnCollectionOf{entity}")
    };
    Some(vec![qualified, name.clone()])
}

fn bound_controller(path: &ODataPath, kind: OperationKind) -> Option<String> {
    match path.last()? {
        ODataPathSegment::BoundOperation { kind: actual, .. } if *actual == kind => {
            entity_set_controller(path)
        }
        _ => None,
    }
}

/// Bound actions, POST.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionConvention;

impl ControllerSelector for ActionConvention {
    fn select_controller(&self, path: &ODataPath, _request: &SyntheticRequest) -> Option<String> {
        bound_controller(path, OperationKind::Action)
    }
}

impl ActionSelector for ActionConvention {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        let names = bound_operation_names(path, OperationKind::Action, &ctx.request.method)?;
        action_map.select_first(&names, &ctx.lookup(path))
    }
}

/// Bound functions, GET.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionConvention;

impl ControllerSelector for FunctionConvention {
    fn select_controller(&self, path: &ODataPath, _request: &SyntheticRequest) -> Option<String> {
        bound_controller(path, OperationKind::Function)
    }
}

impl ActionSelector for FunctionConvention {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        let names = bound_operation_names(path, OperationKind::Function, &ctx.request.method)?;
        action_map.select_first(&names, &ctx.lookup(path))
    }
}

/// Function and action imports, served by the `OData` controller.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationImportConvention;

impl ControllerSelector for OperationImportConvention {
    fn select_controller(&self, path: &ODataPath, _request: &SyntheticRequest) -> Option<String> {
        matches!(path.last()?, ODataPathSegment::OperationImport { .. })
            .then(|| OPERATION_IMPORT_CONTROLLER.to_string())
    }
}

impl ActionSelector for OperationImportConvention {
    fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        let ODataPathSegment::OperationImport { name, kind, .. } = path.last()? else {
            return None;
        };
        let expected = match kind {
            OperationKind::Function => Method::GET,
            OperationKind::Action => Method::POST,
        };
        if ctx.request.method != expected {
            return None;
        }
        action_map.select_first(std::slice::from_ref(name), &ctx.lookup(path))
    }
}

/// Outcome of running the chain: the controller and action that serve a
/// request.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub controller: String,
    pub action: ActionDescriptor,
}

/// Ordered controller and action selectors.
#[derive(Clone)]
pub struct ConventionChain {
    controller_selectors: Vec<Arc<dyn ControllerSelector>>,
    action_selectors: Vec<Arc<dyn ActionSelector>>,
}

impl fmt::Debug for ConventionChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConventionChain")
            .field("controller_selectors", &self.controller_selectors.len())
            .field("action_selectors", &self.action_selectors.len())
            .finish()
    }
}

impl Default for ConventionChain {
    fn default() -> Self {
        let mut chain = Self::empty();
        chain.push(EntitySetConvention);
        chain.push(EntityConvention);
        chain.push(ActionConvention);
        chain.push(FunctionConvention);
        chain.push(OperationImportConvention);
        chain
    }
}

impl ConventionChain {
    /// A chain with no selectors; every path is unroutable.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            controller_selectors: Vec::new(),
            action_selectors: Vec::new(),
        }
    }

    /// Append a convention acting as both controller and action selector.
    pub fn push<C>(&mut self, convention: C)
    where
        C: ControllerSelector + ActionSelector + 'static,
    {
        let convention = Arc::new(convention);
        self.controller_selectors
            .push(Arc::clone(&convention) as Arc<dyn ControllerSelector>);
        self.action_selectors.push(convention);
    }

    pub fn push_controller_selector(&mut self, selector: Arc<dyn ControllerSelector>) {
        self.controller_selectors.push(selector);
    }

    pub fn push_action_selector(&mut self, selector: Arc<dyn ActionSelector>) {
        self.action_selectors.push(selector);
    }

    #[must_use]
    pub fn select_controller(&self, path: &ODataPath, request: &SyntheticRequest) -> Option<String> {
        self.controller_selectors
            .iter()
            .find_map(|s| s.select_controller(path, request))
    }

    #[must_use]
    pub fn select_action(
        &self,
        path: &ODataPath,
        ctx: &ControllerContext<'_>,
        action_map: &ActionMap<'_>,
    ) -> Option<String> {
        self.action_selectors
            .iter()
            .find_map(|s| s.select_action(path, ctx, action_map))
    }

    /// Controller then action; `None` when either step finds nothing.
    #[must_use]
    pub fn select(
        &self,
        path: &ODataPath,
        request: &SyntheticRequest,
        controllers: &ControllerRegistry,
    ) -> Option<Selection> {
        let controller_name = self.select_controller(path, request)?;
        let controller = controllers.controller(&controller_name)?;
        let key_names = path.key_names();
        let ctx = ControllerContext {
            controller: &controller.name,
            request,
            key_names: &key_names,
        };
        let action_map = controller.action_map();
        let name = self.select_action(path, &ctx, &action_map)?;
        // a selector may name an action the lookup rules reject
        let action = action_map.find(&name, &ctx.lookup(path))?;
        Some(Selection {
            controller: controller.name.clone(),
            action: action.clone(),
        })
    }
}
