use super::controller::ControllerDescriptor;
use super::route::{ConventionalRoute, HostDescription, ODataRoute, RouteEntry};
use super::ControllerRegistry;
use crate::edm::{load_model, EdmModel};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Serialized form of a [`HostDescription`].
///
/// ```yaml
/// routes:
///   - { kind: conventional, name: DefaultApi, template: "api/{controller}/{id}" }
///   - { kind: odata, name: odata, prefix: odata, model: model.yaml }
/// controllers:
///   - name: Customers
///     actions:
///       - { name: Get, methods: [GET] }
///       - { name: Get, methods: [GET], parameters: [{ name: key }] }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HostDefinition {
    #[serde(default)]
    pub routes: Vec<RouteDefinition>,
    #[serde(default)]
    pub controllers: Vec<ControllerDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RouteDefinition {
    OData {
        name: String,
        #[serde(default)]
        prefix: String,
        /// Model file, relative to the host file
        model: PathBuf,
    },
    Conventional { name: String, template: String },
}

impl HostDefinition {
    /// Resolve model files relative to `base_dir`, loading each file once.
    ///
    /// # Errors
    ///
    /// Fails when a referenced model cannot be loaded.
    pub fn into_host(self, base_dir: &Path) -> anyhow::Result<HostDescription> {
        let mut models: BTreeMap<PathBuf, Arc<EdmModel>> = BTreeMap::new();
        let mut routes = Vec::with_capacity(self.routes.len());
        for route in self.routes {
            match route {
                RouteDefinition::OData {
                    name,
                    prefix,
                    model,
                } => {
                    let model_path = base_dir.join(&model);
                    let model = match models.get(&model_path) {
                        Some(model) => Arc::clone(model),
                        None => {
                            let loaded = Arc::new(
                                load_model(&model_path)
                                    .with_context(|| format!("OData route '{name}'"))?,
                            );
                            models.insert(model_path, Arc::clone(&loaded));
                            loaded
                        }
                    };
                    routes.push(RouteEntry::OData(ODataRoute::new(name, &prefix, model)));
                }
                RouteDefinition::Conventional { name, template } => {
                    routes.push(RouteEntry::Conventional(ConventionalRoute { name, template }));
                }
            }
        }
        Ok(HostDescription::new(
            routes,
            ControllerRegistry::new(self.controllers),
        ))
    }
}

/// Parse a host definition from YAML, resolving model files against
/// `base_dir`.
///
/// # Errors
///
/// Fails when the document does not deserialize or a model cannot be loaded.
pub fn parse_host(content: &str, base_dir: &Path) -> anyhow::Result<HostDescription> {
    let def: HostDefinition = serde_yaml::from_str(content).context("parsing host definition")?;
    def.into_host(base_dir)
}

/// Load a host definition file (`.yaml`, `.yml` or `.json`). Model paths are
/// relative to the host file's directory.
///
/// # Errors
///
/// Fails when the file cannot be read or parsed, or a model cannot be loaded.
pub fn load_host(path: &Path) -> anyhow::Result<HostDescription> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading host file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    let def: HostDefinition = if is_yaml {
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing host file {}", path.display()))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("parsing host file {}", path.display()))?
    };
    let host = def.into_host(base_dir)?;
    info!(
        path = %path.display(),
        routes = host.routes.len(),
        controllers = host.controllers.len(),
        "Host description loaded"
    );
    Ok(host)
}
