//! # Configuration Module
//!
//! [`GeneratorOptions`] is the generator's whole configuration. It is built
//! once through [`GeneratorOptionsBuilder`] and never changes afterwards.
//!
//! ## Environment Variables
//!
//! [`GeneratorOptionsBuilder::with_env`] overlays:
//!
//! ### `ODATA_SWAGGER_CACHE`
//!
//! `off` disables the document cache, `on` enables it. Anything else leaves
//! the builder's value. Default: enabled.
//!
//! ### `ODATA_SWAGGER_NAVIGATION`
//!
//! `include` keeps navigation properties in definitions, `exclude` strips
//! them. Default: `exclude`.
//!
//! ## Settings File
//!
//! The CLI reads a YAML [`Settings`] file:
//!
//! ```yaml
//! versions:
//!   - version: v1
//!     title: Sample API
//! caching: true
//! include_navigation_properties: false
//! type_mappings:
//!   Decimal: { type: string, format: decimal }
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use odata_swagger::config::GeneratorOptions;
//!
//! let options = GeneratorOptions::builder()
//!     .api_version("v1", "Sample API")
//!     .include_navigation_properties(true)
//!     .build();
//! assert!(options.info("v1").is_some());
//! assert!(options.enable_caching);
//! ```

use crate::conventional::{ApiDescription, ConflictResolver};
use crate::edm::PrimitiveKind;
use crate::filters::{DocumentFilter, OperationFilter};
use crate::mapping::{TypeFormat, TypeMappings};
use crate::paths::CustomRoute;
use crate::swagger::Info;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media type used for `consumes`/`produces` when none is configured.
pub const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Environment variable switching the document cache.
pub const CACHE_ENV: &str = "ODATA_SWAGGER_CACHE";

/// Environment variable switching navigation properties.
pub const NAVIGATION_ENV: &str = "ODATA_SWAGGER_NAVIGATION";

/// Immutable generator configuration.
#[derive(Clone)]
pub struct GeneratorOptions {
    /// Registered versions and the `info` block each is documented with
    pub versions: BTreeMap<String, Info>,
    pub enable_caching: bool,
    pub include_navigation_properties: bool,
    pub type_mappings: TypeMappings,
    pub document_filters: Vec<Arc<dyn DocumentFilter>>,
    pub operation_filters: Vec<Arc<dyn OperationFilter>>,
    pub conflict_resolver: Option<ConflictResolver>,
    pub custom_routes: Vec<CustomRoute>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
}

impl GeneratorOptions {
    #[must_use]
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    /// `info` registered for `api_version`.
    #[must_use]
    pub fn info(&self, api_version: &str) -> Option<&Info> {
        self.versions.get(api_version)
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            versions: BTreeMap::new(),
            enable_caching: true,
            include_navigation_properties: false,
            type_mappings: TypeMappings::new(),
            document_filters: Vec::new(),
            operation_filters: Vec::new(),
            conflict_resolver: None,
            custom_routes: Vec::new(),
            consumes: vec![DEFAULT_MEDIA_TYPE.to_string()],
            produces: vec![DEFAULT_MEDIA_TYPE.to_string()],
        }
    }
}

impl fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("versions", &self.versions.keys().collect::<Vec<_>>())
            .field("enable_caching", &self.enable_caching)
            .field("include_navigation_properties", &self.include_navigation_properties)
            .field("type_mappings", &self.type_mappings)
            .field("document_filters", &self.document_filters.len())
            .field("operation_filters", &self.operation_filters.len())
            .field("conflict_resolver", &self.conflict_resolver.is_some())
            .field("custom_routes", &self.custom_routes.len())
            .field("consumes", &self.consumes)
            .field("produces", &self.produces)
            .finish()
    }
}

/// Collects registrations, then freezes them with [`build`](Self::build).
#[derive(Debug, Default)]
pub struct GeneratorOptionsBuilder {
    options: GeneratorOptions,
    consumes: Option<Vec<String>>,
    produces: Option<Vec<String>>,
}

impl GeneratorOptionsBuilder {
    /// Register a version. Registering it again replaces its `info`.
    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>, title: impl Into<String>) -> Self {
        let version = version.into();
        let info = Info::new(version.clone(), title);
        self.options.versions.insert(version, info);
        self
    }

    /// Register a version with a complete `info` block.
    #[must_use]
    pub fn api_info(mut self, info: Info) -> Self {
        self.options.versions.insert(info.version.clone(), info);
        self
    }

    #[must_use]
    pub fn enable_caching(mut self, enabled: bool) -> Self {
        self.options.enable_caching = enabled;
        self
    }

    #[must_use]
    pub fn include_navigation_properties(mut self, include: bool) -> Self {
        self.options.include_navigation_properties = include;
        self
    }

    #[must_use]
    pub fn map_type(mut self, kind: PrimitiveKind, mapping: TypeFormat) -> Self {
        self.options.type_mappings.insert(kind, mapping);
        self
    }

    #[must_use]
    pub fn document_filter<F: DocumentFilter + 'static>(mut self, filter: F) -> Self {
        self.options.document_filters.push(Arc::new(filter));
        self
    }

    #[must_use]
    pub fn operation_filter<F: OperationFilter + 'static>(mut self, filter: F) -> Self {
        self.options.operation_filters.push(Arc::new(filter));
        self
    }

    /// Resolver for conventional descriptions sharing a method and path.
    #[must_use]
    pub fn resolve_conflicting_actions<F>(mut self, resolver: F) -> Self
    where
        F: Fn(&[ApiDescription]) -> ApiDescription + Send + Sync + 'static,
    {
        self.options.conflict_resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn custom_route(mut self, route: CustomRoute) -> Self {
        self.options.custom_routes.push(route);
        self
    }

    /// Add a media type to `consumes`. The first call replaces the default.
    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.get_or_insert_with(Vec::new).push(media_type.into());
        self
    }

    /// Add a media type to `produces`. The first call replaces the default.
    #[must_use]
    pub fn produces(mut self, media_type: impl Into<String>) -> Self {
        self.produces.get_or_insert_with(Vec::new).push(media_type.into());
        self
    }

    /// Overlay `ODATA_SWAGGER_CACHE` and `ODATA_SWAGGER_NAVIGATION`.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_from(|name| env::var(name).ok())
    }

    /// [`with_env`](Self::with_env) over an arbitrary variable lookup.
    #[must_use]
    pub fn with_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(CACHE_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "off" | "false" | "0" => self.options.enable_caching = false,
                "on" | "true" | "1" => self.options.enable_caching = true,
                _ => {}
            }
        }
        if let Some(value) = lookup(NAVIGATION_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "include" => self.options.include_navigation_properties = true,
                "exclude" => self.options.include_navigation_properties = false,
                _ => {}
            }
        }
        self
    }

    /// Apply everything a settings file carries.
    #[must_use]
    pub fn settings(mut self, settings: &Settings) -> Self {
        for version in &settings.versions {
            let mut info = Info::new(version.version.clone(), version.title.clone());
            info.description = version.description.clone();
            self = self.api_info(info);
        }
        if let Some(caching) = settings.caching {
            self.options.enable_caching = caching;
        }
        if let Some(include) = settings.include_navigation_properties {
            self.options.include_navigation_properties = include;
        }
        for (kind, mapping) in &settings.type_mappings {
            self.options.type_mappings.insert(*kind, mapping.clone());
        }
        for media_type in &settings.consumes {
            self = self.consumes(media_type.clone());
        }
        for media_type in &settings.produces {
            self = self.produces(media_type.clone());
        }
        self
    }

    #[must_use]
    pub fn build(mut self) -> GeneratorOptions {
        if let Some(consumes) = self.consumes {
            self.options.consumes = consumes;
        }
        if let Some(produces) = self.produces {
            self.options.produces = produces;
        }
        self.options
    }
}

/// One `versions` entry of a settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSettings {
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// CLI settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub versions: Vec<VersionSettings>,
    #[serde(default)]
    pub caching: Option<bool>,
    #[serde(default)]
    pub include_navigation_properties: Option<bool>,
    #[serde(default)]
    pub type_mappings: BTreeMap<PrimitiveKind, TypeFormat>,
    #[serde(default)]
    pub consumes: Vec<String>,
    #[serde(default)]
    pub produces: Vec<String>,
}

impl Settings {
    /// Read a YAML settings file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid settings YAML.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parsing settings {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn defaults() {
        let options = GeneratorOptions::default();
        assert!(options.enable_caching);
        assert!(!options.include_navigation_properties);
        assert_eq!(options.consumes, vec![DEFAULT_MEDIA_TYPE]);
        assert_eq!(options.produces, vec![DEFAULT_MEDIA_TYPE]);
        assert!(options.versions.is_empty());
    }

    #[test]
    fn explicit_media_types_replace_default() {
        let options = GeneratorOptions::builder()
            .consumes("application/xml")
            .consumes("application/json")
            .build();
        assert_eq!(options.consumes, vec!["application/xml", "application/json"]);
        assert_eq!(options.produces, vec![DEFAULT_MEDIA_TYPE]);
    }

    #[test]
    fn env_overlay() {
        let options = GeneratorOptions::builder()
            .with_env_from(|name| match name {
                CACHE_ENV => Some("OFF".into()),
                NAVIGATION_ENV => Some("include".into()),
                _ => None,
            })
            .build();
        assert!(!options.enable_caching);
        assert!(options.include_navigation_properties);

        let untouched = GeneratorOptions::builder()
            .enable_caching(false)
            .with_env_from(|_| Some("garbage".into()))
            .build();
        assert!(!untouched.enable_caching);
    }

    #[test]
    fn settings_file_round() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.yaml");
        std::fs::write(
            &file,
            r#"
versions:
  - version: v1
    title: Sample API
    description: First version
caching: false
type_mappings:
  Decimal: { type: string, format: decimal }
produces: [application/xml]
"#,
        )
        .unwrap();
        let settings = Settings::load(&file).unwrap();
        let options = GeneratorOptions::builder().settings(&settings).build();
        let info = options.info("v1").unwrap();
        assert_eq!(info.title, "Sample API");
        assert_eq!(info.description.as_deref(), Some("First version"));
        assert!(!options.enable_caching);
        assert_eq!(
            options.type_mappings.map(PrimitiveKind::Decimal),
            TypeFormat::new("string", Some("decimal"))
        );
        assert_eq!(options.produces, vec!["application/xml"]);
        assert_eq!(options.consumes, vec![DEFAULT_MEDIA_TYPE]);
    }

    #[test]
    fn missing_settings_file_has_context() {
        let err = Settings::load(Path::new("/nonexistent/settings.yaml")).unwrap_err();
        assert!(err.to_string().contains("reading settings"));
    }
}
