//! The host's conventional (non-OData) API descriptions and the document
//! assembled from them.
//!
//! Descriptions come from a [`ConventionalSource`], one set per API version.
//! [`build_document`] groups them by path and method; two descriptions
//! sharing a method and path are a conflict that only a configured
//! [`ConflictResolver`] can settle.

use crate::config::GeneratorOptions;
use crate::error::{Error, Result};
use crate::generator::RootUrl;
use crate::host::methods;
use crate::merge::RouteIdentity;
use crate::swagger::{Document, Info, Operation, PathItem, Schema};
use anyhow::Context;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// One operation the conventional engine described.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    #[serde(with = "methods::single")]
    pub http_method: Method,
    /// Path relative to the base path, with or without a leading `/`
    pub relative_path: String,
    #[serde(default)]
    pub operation: Operation,
}

impl ApiDescription {
    #[must_use]
    pub fn new(http_method: Method, relative_path: impl Into<String>, operation: Operation) -> Self {
        Self {
            http_method,
            relative_path: relative_path.into(),
            operation,
        }
    }

    /// Document key for the path: leading `/`, no query string.
    #[must_use]
    pub fn document_path(&self) -> String {
        let path = self
            .relative_path
            .split('?')
            .next()
            .unwrap_or(&self.relative_path);
        format!("/{}", path.trim_start_matches('/'))
    }
}

impl RouteIdentity for ApiDescription {
    fn method(&self) -> &Method {
        &self.http_method
    }

    fn path(&self) -> &str {
        &self.relative_path
    }
}

/// Output of the conventional engine for one version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConventionalApi {
    #[serde(default)]
    pub descriptions: Vec<ApiDescription>,
    #[serde(default)]
    pub definitions: BTreeMap<String, Schema>,
}

/// Supplies conventional descriptions per API version.
pub trait ConventionalSource: Send + Sync {
    /// `None` when the engine has nothing for `api_version`.
    fn api(&self, api_version: &str) -> Option<ConventionalApi>;
}

/// The same descriptions for every version.
impl ConventionalSource for ConventionalApi {
    fn api(&self, _api_version: &str) -> Option<ConventionalApi> {
        Some(self.clone())
    }
}

/// Distinct descriptions per version; unknown versions yield `None`.
impl ConventionalSource for BTreeMap<String, ConventionalApi> {
    fn api(&self, api_version: &str) -> Option<ConventionalApi> {
        self.get(api_version).cloned()
    }
}

/// Picks one description out of several sharing a method and path.
pub type ConflictResolver = Arc<dyn Fn(&[ApiDescription]) -> ApiDescription + Send + Sync>;

/// Load conventional descriptions (`.yaml`, `.yml` or `.json`).
///
/// ```yaml
/// descriptions:
///   - http_method: GET
///     relative_path: api/values
///     operation: { operationId: Values_Get, responses: { "200": { description: OK } } }
/// definitions: {}
/// ```
///
/// # Errors
///
/// Fails when the file cannot be read or parsed.
pub fn load_conventional(path: &Path) -> anyhow::Result<ConventionalApi> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading conventional descriptions {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    let api: ConventionalApi = if is_yaml {
        serde_yaml::from_str(&content).map_err(anyhow::Error::from)
    } else {
        serde_json::from_str(&content).map_err(anyhow::Error::from)
    }
    .with_context(|| format!("parsing conventional descriptions {}", path.display()))?;
    info!(
        path = %path.display(),
        descriptions = api.descriptions.len(),
        "Conventional descriptions loaded"
    );
    Ok(api)
}

/// Place `operation` under `method` in `item`.
///
/// # Errors
///
/// [`Error::UnsupportedHttpMethod`] when Swagger 2.0 has no slot for the verb.
pub fn set_operation(item: &mut PathItem, method: &Method, path: &str, operation: Operation) -> Result<()> {
    item.set_operation(method, operation)
        .map_err(|method| Error::UnsupportedHttpMethod {
            method,
            path: path.to_string(),
        })
}

/// Assemble the conventional document for `info`.
///
/// # Errors
///
/// - [`Error::ConflictingOperations`] for a shared method and path without a
///   resolver
/// - [`Error::UnsupportedHttpMethod`] for verbs Swagger 2.0 cannot hold
pub fn build_document(
    api: &ConventionalApi,
    info: Info,
    root: &RootUrl,
    options: &GeneratorOptions,
) -> Result<Document> {
    // (path, method) groups in encounter order
    let mut groups: Vec<((String, Method), Vec<&ApiDescription>)> = Vec::new();
    for description in &api.descriptions {
        let key = (description.document_path(), description.http_method.clone());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(description),
            None => groups.push((key, vec![description])),
        }
    }

    let mut document = Document::new(info);
    root.apply(&mut document);
    document.consumes = options.consumes.clone();
    document.produces = options.produces.clone();
    document.definitions = api.definitions.clone();

    for ((path, method), members) in groups {
        let chosen = match members.as_slice() {
            [single] => (*single).clone(),
            many => {
                let Some(resolver) = options.conflict_resolver.as_ref() else {
                    return Err(Error::ConflictingOperations { method, path });
                };
                let owned: Vec<ApiDescription> = many.iter().map(|d| (*d).clone()).collect();
                debug!(method = %method, path = %path, count = owned.len(), "Resolving conflicting actions");
                resolver(&owned)
            }
        };
        let item = document.paths.entry(path.clone()).or_default();
        set_operation(item, &method, &path, chosen.operation)?;
    }

    debug!(
        paths = document.paths.len(),
        definitions = document.definitions.len(),
        "Conventional document assembled"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::config::GeneratorOptions;

    fn op(id: &str) -> Operation {
        Operation {
            operation_id: Some(id.to_string()),
            ..Operation::default()
        }
    }

    fn root() -> RootUrl {
        RootUrl::parse("http://localhost:5000/").unwrap()
    }

    #[test]
    fn groups_descriptions_by_path_and_method() {
        let api = ConventionalApi {
            descriptions: vec![
                ApiDescription::new(Method::GET, "api/values", op("Values_Get")),
                ApiDescription::new(Method::POST, "/api/values", op("Values_Post")),
                ApiDescription::new(Method::GET, "api/values/{id}?x=1", op("Values_GetById")),
            ],
            definitions: BTreeMap::new(),
        };
        let doc = build_document(&api, Info::new("v1", "API"), &root(), &GeneratorOptions::default()).unwrap();
        assert_eq!(doc.paths.len(), 2);
        assert!(doc.operation("/api/values", &Method::POST).is_some());
        assert!(doc.operation("/api/values/{id}", &Method::GET).is_some());
        assert_eq!(doc.host.as_deref(), Some("localhost:5000"));
        assert_eq!(doc.consumes, vec!["application/json"]);
    }

    #[test]
    fn conflicting_operations_without_resolver_fail() {
        let api = ConventionalApi {
            descriptions: vec![
                ApiDescription::new(Method::GET, "api/values", op("A")),
                ApiDescription::new(Method::GET, "api/values", op("B")),
            ],
            definitions: BTreeMap::new(),
        };
        let err = build_document(&api, Info::new("v1", "API"), &root(), &GeneratorOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            Error::ConflictingOperations {
                method: Method::GET,
                path: "/api/values".into()
            }
        );
    }

    #[test]
    fn resolver_settles_conflicts() {
        let api = ConventionalApi {
            descriptions: vec![
                ApiDescription::new(Method::GET, "api/values", op("A")),
                ApiDescription::new(Method::GET, "api/values", op("B")),
            ],
            definitions: BTreeMap::new(),
        };
        let options = GeneratorOptions::builder()
            .resolve_conflicting_actions(|all: &[ApiDescription]| all[all.len() - 1].clone())
            .build();
        let doc = build_document(&api, Info::new("v1", "API"), &root(), &options).unwrap();
        let id = doc.operation("/api/values", &Method::GET).unwrap().operation_id.clone();
        assert_eq!(id.as_deref(), Some("B"));
    }

    #[test]
    fn trace_has_no_slot() {
        let api = ConventionalApi {
            descriptions: vec![ApiDescription::new(Method::TRACE, "api/values", op("T"))],
            definitions: BTreeMap::new(),
        };
        let err = build_document(&api, Info::new("v1", "API"), &root(), &GeneratorOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedHttpMethod { method, .. } if method == Method::TRACE));
    }

    #[test]
    fn versioned_source_misses_unknown_versions() {
        let mut versions = BTreeMap::new();
        versions.insert("v1".to_string(), ConventionalApi::default());
        assert!(versions.api("v1").is_some());
        assert!(versions.api("v2").is_none());
        assert!(ConventionalApi::default().api("anything").is_some());
    }

    #[test]
    fn loads_yaml_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("conventional.yaml");
        std::fs::write(
            &file,
            r#"
descriptions:
  - http_method: get
    relative_path: api/values
    operation:
      operationId: Values_Get
      responses:
        "200": { description: OK }
definitions:
  Value: { type: string }
"#,
        )
        .unwrap();
        let api = load_conventional(&file).unwrap();
        assert_eq!(api.descriptions[0].http_method, Method::GET);
        assert_eq!(api.descriptions[0].operation.operation_id.as_deref(), Some("Values_Get"));
        assert!(api.definitions.contains_key("Value"));
    }
}
