//! # Generator Module
//!
//! [`DocumentGenerator`] drives the whole pipeline for one request:
//!
//! 1. look up the version's `info` block;
//! 2. parse the root URL into `host`, `basePath` and `schemes`;
//! 3. per OData route: definitions, path candidates, binder, custom routes;
//! 4. OData stages: operation-id uniquifier, navigation limiter;
//! 5. conventional document from the [`ConventionalSource`];
//! 6. merge, then user document filters and operation filters;
//! 7. cache the result when caching is enabled.
//!
//! ## Hot Reload
//!
//! The host table sits behind an [`ArcSwap`]. [`DocumentGenerator::replace_host`]
//! swaps it, bumps the host epoch and drops cached documents; requests
//! already running finish against the host they started with.
//!
//! ## Example
//!
//! ```rust
//! use odata_swagger::config::GeneratorOptions;
//! use odata_swagger::conventional::ConventionalApi;
//! use odata_swagger::generator::DocumentGenerator;
//! use odata_swagger::host::HostDescription;
//! use std::sync::Arc;
//!
//! let options = GeneratorOptions::builder().api_version("v1", "Sample API").build();
//! let generator = DocumentGenerator::new(
//!     options,
//!     HostDescription::default(),
//!     Arc::new(ConventionalApi::default()),
//! );
//! let doc = generator.get_document("http://localhost:5000/", "v1").unwrap();
//! assert_eq!(doc.host.as_deref(), Some("localhost:5000"));
//! assert!(generator.get_document("http://localhost:5000/", "v2").is_err());
//! ```

use crate::binder::{Binder, RouteDescriptor};
use crate::cache::{CacheKey, DocumentCache};
use crate::config::GeneratorOptions;
use crate::conventional::{self, set_operation, ConventionalSource};
use crate::error::{Error, Result};
use crate::filters::{
    apply_operation_filters, DocumentFilter, FilterContext, NavigationLimiter,
    OperationIdUniquifier,
};
use crate::host::HostDescription;
use crate::merge::{dedup_descriptions, merge};
use crate::paths::build_paths_for_model;
use crate::router::Router;
use crate::schema::SchemaRegistry;
use crate::swagger::{Document, Info, Tag};
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// The URL a document is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootUrl {
    url: Url,
}

impl RootUrl {
    /// Parse an absolute URL with a host.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRootUrl`] when `root_url` is not absolute or has no
    /// host.
    pub fn parse(root_url: &str) -> Result<Self> {
        let url = Url::parse(root_url).map_err(|_| Error::InvalidRootUrl(root_url.to_string()))?;
        if url.host_str().is_none() {
            return Err(Error::InvalidRootUrl(root_url.to_string()));
        }
        Ok(Self { url })
    }

    /// `host[:port]`, port only when not the scheme default.
    #[must_use]
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Path without a trailing `/`; `/` for the root.
    #[must_use]
    pub fn base_path(&self) -> String {
        let path = self.url.path().trim_end_matches('/');
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    }

    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Set `host`, `basePath` and `schemes` on `document`.
    pub fn apply(&self, document: &mut Document) {
        document.host = Some(self.host());
        document.base_path = Some(self.base_path());
        document.schemes = vec![self.scheme().to_string()];
    }
}

/// Generates (and caches) documentation documents.
pub struct DocumentGenerator {
    options: GeneratorOptions,
    host: ArcSwap<HostDescription>,
    epoch: AtomicU64,
    conventional: Arc<dyn ConventionalSource>,
    cache: DocumentCache,
}

impl std::fmt::Debug for DocumentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentGenerator")
            .field("options", &self.options)
            .field("epoch", &self.epoch.load(Ordering::Acquire))
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}

impl DocumentGenerator {
    #[must_use]
    pub fn new(
        options: GeneratorOptions,
        host: HostDescription,
        conventional: Arc<dyn ConventionalSource>,
    ) -> Self {
        let cache = DocumentCache::new(options.enable_caching);
        Self {
            options,
            host: ArcSwap::from_pointee(host),
            epoch: AtomicU64::new(0),
            conventional,
            cache,
        }
    }

    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Snapshot of the current host.
    #[must_use]
    pub fn host(&self) -> Arc<HostDescription> {
        self.host.load_full()
    }

    /// Number of host replacements so far.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Swap in a new host and invalidate every cached document.
    pub fn replace_host(&self, host: HostDescription) {
        self.host.store(Arc::new(host));
        let epoch = self.epoch.fetch_add(1, Ordering::AcqRel) + 1;
        self.cache.retain_epoch(epoch);
        info!(epoch, "Host replaced");
    }

    /// Document for `api_version` as seen from `root_url`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownApiVersion`] for an unregistered version
    /// - [`Error::InvalidRootUrl`] when `root_url` does not parse
    /// - [`Error::MissingBaseDocument`] when the conventional source has
    ///   nothing for the version
    /// - [`Error::ConflictingOperations`] and [`Error::UnsupportedHttpMethod`]
    ///   from document assembly
    pub fn get_document(&self, root_url: &str, api_version: &str) -> Result<Arc<Document>> {
        let info = self
            .options
            .info(api_version)
            .ok_or_else(|| Error::UnknownApiVersion(api_version.to_string()))?;
        let root = RootUrl::parse(root_url)?;

        let epoch = self.epoch();
        let host = self.host.load_full();
        let key = CacheKey::new(root.as_str(), api_version, epoch);
        self.cache
            .get_or_try_init(key, || self.generate(&host, &root, info, api_version))
    }

    fn generate(
        &self,
        host: &HostDescription,
        root: &RootUrl,
        info: &Info,
        api_version: &str,
    ) -> Result<Document> {
        let context = FilterContext {
            api_version,
            root_url: root.as_str(),
        };

        let mut odata = self.odata_document(host, root, info)?;
        OperationIdUniquifier.apply(&mut odata, &context);
        NavigationLimiter {
            include_navigation_properties: self.options.include_navigation_properties,
        }
        .apply(&mut odata, &context);

        let api = self
            .conventional
            .api(api_version)
            .ok_or_else(|| Error::MissingBaseDocument(api_version.to_string()))?;
        let convention = conventional::build_document(&api, info.clone(), root, &self.options)?;

        let mut document = merge(convention, odata);
        for filter in &self.options.document_filters {
            filter.apply(&mut document, &context);
        }
        apply_operation_filters(&mut document, &self.options.operation_filters, api_version);

        info!(
            api_version,
            root_url = %root.as_str(),
            paths = document.paths.len(),
            definitions = document.definitions.len(),
            "Document generated"
        );
        Ok(document)
    }

    fn odata_document(&self, host: &HostDescription, root: &RootUrl, info: &Info) -> Result<Document> {
        let mut document = Document::new(info.clone());
        root.apply(&mut document);
        document.consumes = self.options.consumes.clone();
        document.produces = self.options.produces.clone();

        let router = Router::new(host);
        let mappings = &self.options.type_mappings;

        for custom in &self.options.custom_routes {
            if host.find_odata_route(custom.route_name()).is_none() {
                warn!(route = %custom.route_name(), template = %custom.template(), "Custom route names no OData route");
            }
        }

        for (index, route) in host.odata_routes() {
            let mut registry = SchemaRegistry::new(&route.model, mappings);
            registry.register_model();
            let candidates = build_paths_for_model(&mut registry);

            let binder = Binder::new(host, &router, index, route, mappings);
            let mut descriptors = binder.resolve_all(candidates);
            for custom in self
                .options
                .custom_routes
                .iter()
                .filter(|c| c.route_name() == route.name)
            {
                descriptors.extend(
                    custom
                        .candidates(&mut registry)
                        .into_iter()
                        .map(|c| binder.describe_custom(c)),
                );
            }
            let descriptors = dedup_descriptions(descriptors);

            for (name, schema) in registry.into_definitions() {
                document.definitions.entry(name).or_insert(schema);
            }
            add_descriptors(&mut document, descriptors)?;
        }
        Ok(document)
    }
}

fn add_descriptors(document: &mut Document, descriptors: Vec<RouteDescriptor>) -> Result<()> {
    for descriptor in descriptors {
        if !descriptor.controller.is_empty()
            && !document.tags.iter().any(|t| t.name == descriptor.controller)
        {
            document.tags.push(Tag::new(descriptor.controller.clone()));
        }
        let item = document.paths.entry(descriptor.path.clone()).or_default();
        set_operation(item, &descriptor.method, &descriptor.path, descriptor.operation)?;
    }
    Ok(())
}
