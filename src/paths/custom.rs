use super::{PathCandidate, PathKind};
use crate::edm::EdmType;
use crate::schema::SchemaRegistry;
use crate::swagger::{Operation, Parameter, ParameterLocation, Response};
use http::Method;
use std::collections::BTreeMap;

/// A hand-registered route under an OData route prefix.
///
/// Custom routes bypass the binder: they are documented as declared, after
/// the resolved descriptors of the same OData route.
///
/// ```
/// use http::Method;
/// use odata_swagger::edm::{EdmType, PrimitiveKind};
/// use odata_swagger::paths::{CustomOperation, CustomRoute};
///
/// let route = CustomRoute::new("odata", "/Customers/Default.Top({count})").operation(
///     CustomOperation::new(Method::GET)
///         .path_parameter("count", EdmType::Primitive(PrimitiveKind::Int32))
///         .returns(EdmType::Collection(Box::new(EdmType::Entity("Default.Customer".into())))),
/// );
/// assert_eq!(route.route_name(), "odata");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CustomRoute {
    route_name: String,
    template: String,
    operations: Vec<CustomOperation>,
}

impl CustomRoute {
    /// `template` is relative to the route prefix; a leading `/` is added
    /// when missing.
    #[must_use]
    pub fn new(route_name: impl Into<String>, template: impl Into<String>) -> Self {
        let template = template.into();
        let template = if template.starts_with('/') {
            template
        } else {
            format!("/{template}")
        };
        Self {
            route_name: route_name.into(),
            template,
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn operation(mut self, operation: CustomOperation) -> Self {
        self.operations.push(operation);
        self
    }

    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// First path segment without key or parameter parentheses; used as tag.
    fn tag(&self) -> &str {
        let first = self
            .template
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        first.split('(').next().unwrap_or(first)
    }

    /// One candidate per declared operation, in declaration order.
    pub fn candidates(&self, registry: &mut SchemaRegistry<'_>) -> Vec<PathCandidate> {
        self.operations
            .iter()
            .map(|op| {
                PathCandidate::new(
                    op.method.clone(),
                    self.template.clone(),
                    op.to_operation(self.tag(), registry),
                    PathKind::Custom,
                )
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomOperation {
    method: Method,
    operation_id: Option<String>,
    path_parameters: Vec<(String, EdmType)>,
    query_parameters: Vec<(String, EdmType)>,
    body: Option<(String, EdmType)>,
    returns: Option<EdmType>,
}

impl CustomOperation {
    #[must_use]
    pub fn new(method: Method) -> Self {
        Self {
            method,
            operation_id: None,
            path_parameters: Vec::new(),
            query_parameters: Vec::new(),
            body: None,
            returns: None,
        }
    }

    #[must_use]
    pub fn operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn path_parameter(mut self, name: impl Into<String>, ty: EdmType) -> Self {
        self.path_parameters.push((name.into(), ty));
        self
    }

    #[must_use]
    pub fn query_parameter(mut self, name: impl Into<String>, ty: EdmType) -> Self {
        self.query_parameters.push((name.into(), ty));
        self
    }

    #[must_use]
    pub fn body_parameter(mut self, name: impl Into<String>, ty: EdmType) -> Self {
        self.body = Some((name.into(), ty));
        self
    }

    #[must_use]
    pub fn returns(mut self, ty: EdmType) -> Self {
        self.returns = Some(ty);
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    fn to_operation(&self, tag: &str, registry: &mut SchemaRegistry<'_>) -> Operation {
        let mut parameters = Vec::new();
        for (name, ty) in &self.path_parameters {
            let schema = registry.schema_for(ty);
            parameters.push(Parameter::simple(name.clone(), ParameterLocation::Path, true, &schema));
        }
        for (name, ty) in &self.query_parameters {
            let schema = registry.schema_for(ty);
            parameters.push(Parameter::simple(name.clone(), ParameterLocation::Query, false, &schema));
        }
        if let Some((name, ty)) = &self.body {
            parameters.push(Parameter::body(name.clone(), registry.schema_for(ty)));
        }

        let mut responses = BTreeMap::new();
        match &self.returns {
            Some(ty) => {
                let schema = registry.response_schema(ty);
                responses.insert("200".to_string(), Response::new("OK", Some(schema)));
            }
            None => {
                responses.insert("204".to_string(), Response::new("No Content", None));
            }
        }
        responses.insert(
            "default".to_string(),
            Response::new("Unexpected error", Some(registry.error_schema())),
        );

        let verb = self.method.as_str();
        let mut title = verb.to_ascii_lowercase();
        if let Some(first) = title.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        Operation {
            tags: vec![tag.to_string()],
            operation_id: Some(
                self.operation_id
                    .clone()
                    .unwrap_or_else(|| format!("{tag}_{title}")),
            ),
            parameters,
            responses,
            ..Operation::default()
        }
    }
}
