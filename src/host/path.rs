//! OData resource paths parsed against a model.

use crate::edm::{EdmModel, EdmType, OperationKind};
use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// `Name`, `Name()`, `Name(args)`; names may be namespace-qualified.
#[allow(clippy::expect_used)]
static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>[A-Za-z_][A-Za-z0-9_.]*)(?:\((?P<args>[^()]*)\))?$")
        .expect("Failed to compile OData segment regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ODataPathSegment {
    EntitySet {
        name: String,
        entity_type: String,
    },
    /// Key values in key order, each `(property, raw value)`
    Key { values: Vec<(String, String)> },
    BoundOperation {
        full_name: String,
        name: String,
        kind: OperationKind,
        parameters: Vec<String>,
    },
    OperationImport {
        name: String,
        kind: OperationKind,
        parameters: Vec<String>,
    },
}

impl ODataPathSegment {
    fn template_part(&self) -> &'static str {
        match self {
            Self::EntitySet { .. } => "entityset",
            Self::Key { .. } => "key",
            Self::BoundOperation {
                kind: OperationKind::Function,
                ..
            } => "function",
            Self::BoundOperation {
                kind: OperationKind::Action,
                ..
            } => "action",
            Self::OperationImport {
                kind: OperationKind::Function,
                ..
            } => "unboundfunction",
            Self::OperationImport {
                kind: OperationKind::Action,
                ..
            } => "unboundaction",
        }
    }
}

/// A parsed OData resource path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ODataPath {
    pub segments: Vec<ODataPathSegment>,
}

impl ODataPath {
    /// Segment kinds joined the way routing conventions name them:
    /// `~/entityset/key/action`.
    #[must_use]
    pub fn path_template(&self) -> String {
        let mut template = String::from("~");
        for segment in &self.segments {
            template.push('/');
            template.push_str(segment.template_part());
        }
        template
    }

    #[must_use]
    pub fn entity_set(&self) -> Option<(&str, &str)> {
        self.segments.iter().find_map(|s| match s {
            ODataPathSegment::EntitySet { name, entity_type } => {
                Some((name.as_str(), entity_type.as_str()))
            }
            _ => None,
        })
    }

    #[must_use]
    pub fn key(&self) -> Option<&[(String, String)]> {
        self.segments.iter().find_map(|s| match s {
            ODataPathSegment::Key { values } => Some(values.as_slice()),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_key(&self) -> bool {
        self.key().is_some()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ODataPathSegment> {
        self.segments.last()
    }

    /// Names a request for this path provides as route values: `key` for a
    /// single key, `key<Prop>` and `<Prop>` for every key property, and every
    /// function parameter name.
    #[must_use]
    pub fn route_values(&self) -> Vec<String> {
        let mut values = Vec::new();
        for segment in &self.segments {
            match segment {
                ODataPathSegment::Key { values: keys } => {
                    if keys.len() == 1 {
                        values.push("key".to_string());
                    }
                    for (name, _) in keys {
                        values.push(format!("key{name}"));
                        values.push(name.clone());
                    }
                }
                ODataPathSegment::BoundOperation {
                    kind: OperationKind::Function,
                    parameters,
                    ..
                }
                | ODataPathSegment::OperationImport {
                    kind: OperationKind::Function,
                    parameters,
                    ..
                } => values.extend(parameters.iter().cloned()),
                _ => {}
            }
        }
        values
    }

    /// Key property names of the addressed entity, in key order.
    #[must_use]
    pub fn key_names(&self) -> Vec<String> {
        self.key()
            .map(|k| k.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> Error {
    Error::InvalidPath {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Split `a={a},b='{b}'` (or a lone `{Id}`) into `(name, value)` pairs.
/// Unnamed values get the name `""`.
fn split_arguments(args: &str) -> Vec<(String, String)> {
    args.split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| match a.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), value.trim().to_string()),
            None => (String::new(), a.to_string()),
        })
        .collect()
}

/// Parse a path template relative to a route prefix
/// (`/Customers({Id})/Default.Rate`) against `model`.
///
/// # Errors
///
/// [`Error::InvalidPath`] when a segment is malformed or does not resolve to
/// an entity set, key, bound operation or operation import of the model.
pub fn parse_path(model: &EdmModel, template: &str) -> Result<ODataPath> {
    let trimmed = template.trim_matches('/');
    if trimmed.is_empty() {
        return Err(invalid(template, "service document has no resource path"));
    }
    let raw: Vec<&str> = trimmed.split('/').collect();
    let mut segments = Vec::with_capacity(raw.len() + 1);

    let first = SEGMENT
        .captures(raw[0])
        .ok_or_else(|| invalid(template, format!("malformed segment '{}'", raw[0])))?;
    let name = &first["name"];
    let args = first.name("args").map(|m| m.as_str());

    let binding = if let Some(set) = model.entity_set(name) {
        segments.push(ODataPathSegment::EntitySet {
            name: set.name.clone(),
            entity_type: set.entity_type.clone(),
        });
        let entity = model
            .entity_type(&set.entity_type)
            .ok_or_else(|| invalid(template, format!("entity type '{}' not found", set.entity_type)))?;
        match args {
            Some(args) => {
                let values = split_arguments(args);
                if values.len() != entity.key.len() {
                    return Err(invalid(
                        template,
                        format!("expected {} key value(s), found {}", entity.key.len(), values.len()),
                    ));
                }
                let values = entity
                    .key
                    .iter()
                    .zip(values)
                    .map(|(key, (named, value))| {
                        if named.is_empty() || named == *key {
                            Ok((key.clone(), value))
                        } else {
                            Err(invalid(template, format!("unknown key property '{named}'")))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                segments.push(ODataPathSegment::Key { values });
                EdmType::Entity(set.entity_type.clone())
            }
            None => EdmType::Collection(Box::new(EdmType::Entity(set.entity_type.clone()))),
        }
    } else if let Some(op) = model.operation_import(name) {
        if raw.len() > 1 {
            return Err(invalid(template, "operation import must be the last segment"));
        }
        segments.push(ODataPathSegment::OperationImport {
            name: op.name.clone(),
            kind: op.kind,
            parameters: operation_arguments(template, op.kind, args)?,
        });
        return Ok(ODataPath { segments });
    } else {
        return Err(invalid(template, format!("'{name}' is not an entity set or operation import")));
    };

    match raw.get(1..).unwrap_or_default() {
        [] => {}
        [segment] => {
            let caps = SEGMENT
                .captures(segment)
                .ok_or_else(|| invalid(template, format!("malformed segment '{segment}'")))?;
            let full_name = &caps["name"];
            let op = model
                .bound_operation(full_name, &binding)
                .ok_or_else(|| {
                    invalid(template, format!("no operation '{full_name}' bound to {binding}"))
                })?;
            segments.push(ODataPathSegment::BoundOperation {
                full_name: op.full_name(),
                name: op.name.clone(),
                kind: op.kind,
                parameters: operation_arguments(template, op.kind, caps.name("args").map(|m| m.as_str()))?,
            });
        }
        _ => return Err(invalid(template, "navigation beyond one operation segment is not supported")),
    }

    Ok(ODataPath { segments })
}

fn operation_arguments(
    template: &str,
    kind: OperationKind,
    args: Option<&str>,
) -> Result<Vec<String>> {
    match (kind, args) {
        (OperationKind::Function, None) => {
            Err(invalid(template, "function segments require parentheses"))
        }
        (OperationKind::Action, Some(_)) => {
            Err(invalid(template, "action segments take no parentheses"))
        }
        (OperationKind::Action, None) => Ok(Vec::new()),
        (OperationKind::Function, Some(args)) => Ok(split_arguments(args)
            .into_iter()
            .map(|(name, _)| name)
            .filter(|n| !n.is_empty())
            .collect()),
    }
}
