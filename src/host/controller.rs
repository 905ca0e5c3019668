use super::methods;
use crate::edm::PrimitiveKind;
use crate::swagger::Schema;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where an action parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterSource {
    /// Route values: keys and function parameters
    #[default]
    Uri,
    Query,
    Body,
    Header,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    #[serde(default)]
    pub source: ParameterSource,
    #[serde(default)]
    pub optional: bool,
    /// Primitive type used when the parameter is documented as a query
    /// parameter
    #[serde(default = "default_kind")]
    pub kind: PrimitiveKind,
}

fn default_kind() -> PrimitiveKind {
    PrimitiveKind::String
}

impl ActionParameter {
    #[must_use]
    pub fn uri(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ParameterSource::Uri,
            optional: false,
            kind: PrimitiveKind::String,
        }
    }

    #[must_use]
    pub fn query(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self {
            name: name.into(),
            source: ParameterSource::Query,
            optional: true,
            kind,
        }
    }

    #[must_use]
    pub fn body(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: ParameterSource::Body,
            optional: false,
            kind: PrimitiveKind::String,
        }
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Route value names that feed a key: `key`, `key<Prop>` or a key
    /// property name.
    fn consumes_key(&self, key_names: &[String]) -> bool {
        self.source == ParameterSource::Uri
            && (self.name.to_ascii_lowercase().starts_with("key")
                || key_names.iter().any(|k| k.eq_ignore_ascii_case(&self.name)))
    }
}

/// A controller action as the host dispatches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub name: String,
    #[serde(with = "methods::list", default = "default_methods")]
    pub methods: Vec<Method>,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    /// Declared response body; replaces the synthesized success schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<Schema>,
}

fn default_methods() -> Vec<Method> {
    vec![Method::GET]
}

impl ActionDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, methods: &[Method]) -> Self {
        Self {
            name: name.into(),
            methods: methods.to_vec(),
            parameters: Vec::new(),
            response_type: None,
        }
    }

    #[must_use]
    pub fn parameter(mut self, parameter: ActionParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn response_type(mut self, schema: Schema) -> Self {
        self.response_type = Some(schema);
        self
    }

    #[must_use]
    pub fn supports(&self, method: &Method) -> bool {
        self.methods.iter().any(|m| m == method)
    }

    /// Query parameters the action declares.
    pub fn query_parameters(&self) -> impl Iterator<Item = &ActionParameter> {
        self.parameters
            .iter()
            .filter(|p| p.source == ParameterSource::Query)
    }

    /// Whether the action can serve the lookup: the method is supported,
    /// every required URI parameter has a route value, and a key is consumed
    /// when one was addressed.
    #[must_use]
    pub fn accepts(&self, lookup: &ActionLookup<'_>) -> bool {
        if !self.supports(lookup.method) {
            return false;
        }
        let uri_satisfied = self
            .parameters
            .iter()
            .filter(|p| p.source == ParameterSource::Uri && !p.optional)
            .all(|p| {
                lookup
                    .route_values
                    .iter()
                    .any(|v| v.eq_ignore_ascii_case(&p.name))
            });
        if !uri_satisfied {
            return false;
        }
        if lookup.requires_key {
            return self
                .parameters
                .iter()
                .any(|p| p.consumes_key(lookup.key_names));
        }
        true
    }
}

/// What the request offers an action: route value names, key property names
/// and whether a key segment was addressed.
#[derive(Debug, Clone, Copy)]
pub struct ActionLookup<'a> {
    pub method: &'a Method,
    pub route_values: &'a [String],
    pub key_names: &'a [String],
    pub requires_key: bool,
}

/// Actions of one controller keyed by lowercase name. A name can carry
/// several overloads.
#[derive(Debug, Clone, Default)]
pub struct ActionMap<'c> {
    actions: BTreeMap<String, Vec<&'c ActionDescriptor>>,
}

impl<'c> ActionMap<'c> {
    #[must_use]
    pub fn new(actions: &'c [ActionDescriptor]) -> Self {
        let mut map: BTreeMap<String, Vec<&'c ActionDescriptor>> = BTreeMap::new();
        for action in actions {
            map.entry(action.name.to_ascii_lowercase())
                .or_default()
                .push(action);
        }
        Self { actions: map }
    }

    /// First overload of `name` that accepts the lookup.
    #[must_use]
    pub fn find(&self, name: &str, lookup: &ActionLookup<'_>) -> Option<&'c ActionDescriptor> {
        self.actions
            .get(&name.to_ascii_lowercase())?
            .iter()
            .copied()
            .find(|a| a.accepts(lookup))
    }

    /// First of `names` (in order) with a selectable overload; returns the
    /// action's declared name.
    #[must_use]
    pub fn select_first(&self, names: &[String], lookup: &ActionLookup<'_>) -> Option<String> {
        names
            .iter()
            .find_map(|n| self.find(n, lookup))
            .map(|a| a.name.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerDescriptor {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

impl ControllerDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn action(mut self, action: ActionDescriptor) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn action_map(&self) -> ActionMap<'_> {
        ActionMap::new(&self.actions)
    }
}

/// Every controller the host dispatches to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerRegistry {
    controllers: Vec<ControllerDescriptor>,
}

impl ControllerRegistry {
    #[must_use]
    pub fn new(controllers: Vec<ControllerDescriptor>) -> Self {
        Self { controllers }
    }

    pub fn register(&mut self, controller: ControllerDescriptor) {
        self.controllers.push(controller);
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&ControllerDescriptor> {
        self.controllers
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}
