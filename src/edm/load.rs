use super::types::{
    EdmModel, EdmType, EntitySet, EnumType, Operation, OperationKind, OperationParameter,
    PrimitiveKind, Property, StructuredType,
};
use anyhow::{anyhow, bail, Context};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Serialized form of an [`EdmModel`]. Type references are strings:
/// `Edm.Int32`, `Namespace.Name` (or a bare `Name` within the model
/// namespace), `Collection(<type>)`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelDefinition {
    pub namespace: String,
    #[serde(default)]
    pub entity_types: Vec<StructuredTypeDefinition>,
    #[serde(default)]
    pub complex_types: Vec<StructuredTypeDefinition>,
    #[serde(default)]
    pub enum_types: Vec<EnumTypeDefinition>,
    #[serde(default)]
    pub entity_sets: Vec<EntitySetDefinition>,
    #[serde(default)]
    pub operations: Vec<OperationDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructuredTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub key: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntitySetDefinition {
    pub name: String,
    pub entity_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationDefinition {
    pub name: String,
    pub kind: OperationKind,
    #[serde(default)]
    pub bound: bool,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub return_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Names known to the model, used while resolving type references.
struct TypeNames<'a> {
    namespace: &'a str,
    entities: HashSet<String>,
    complexes: HashSet<String>,
    enums: HashSet<String>,
}

impl<'a> TypeNames<'a> {
    fn new(def: &'a ModelDefinition) -> Self {
        let qualify = |name: &str| format!("{}.{}", def.namespace, name);
        Self {
            namespace: &def.namespace,
            entities: def.entity_types.iter().map(|t| qualify(&t.name)).collect(),
            complexes: def.complex_types.iter().map(|t| qualify(&t.name)).collect(),
            enums: def.enum_types.iter().map(|t| qualify(&t.name)).collect(),
        }
    }

    fn qualify(&self, name: &str) -> String {
        if name.contains('.') {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        }
    }

    fn resolve(&self, reference: &str) -> anyhow::Result<EdmType> {
        let reference = reference.trim();
        if let Some(inner) = reference
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Ok(EdmType::Collection(Box::new(self.resolve(inner)?)));
        }
        if let Some(kind) = PrimitiveKind::from_edm_name(reference) {
            return Ok(EdmType::Primitive(kind));
        }
        let full = self.qualify(reference);
        if self.entities.contains(&full) {
            Ok(EdmType::Entity(full))
        } else if self.complexes.contains(&full) {
            Ok(EdmType::Complex(full))
        } else if self.enums.contains(&full) {
            Ok(EdmType::Enum(full))
        } else {
            Err(anyhow!("unknown type reference '{reference}'"))
        }
    }
}

impl EdmModel {
    /// Resolve every type reference of a [`ModelDefinition`].
    ///
    /// # Errors
    ///
    /// Fails on unknown type references, entity sets over non-entity types and
    /// key names that do not name a property.
    pub fn from_definition(def: ModelDefinition) -> anyhow::Result<Self> {
        let names = TypeNames::new(&def);

        let structured = |t: &StructuredTypeDefinition, kind: &str| -> anyhow::Result<StructuredType> {
            let mut properties = Vec::with_capacity(t.properties.len());
            for p in &t.properties {
                let ty = names
                    .resolve(&p.ty)
                    .with_context(|| format!("{kind} type '{}', property '{}'", t.name, p.name))?;
                properties.push(Property {
                    name: p.name.clone(),
                    ty,
                    nullable: p.nullable,
                });
            }
            for k in &t.key {
                if !properties.iter().any(|p| &p.name == k) {
                    bail!("{kind} type '{}' declares key '{k}' with no matching property", t.name);
                }
            }
            Ok(StructuredType {
                namespace: def.namespace.clone(),
                name: t.name.clone(),
                key: t.key.clone(),
                properties,
            })
        };

        let entity_types = def
            .entity_types
            .iter()
            .map(|t| structured(t, "entity"))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let complex_types = def
            .complex_types
            .iter()
            .map(|t| structured(t, "complex"))
            .collect::<anyhow::Result<Vec<_>>>()?;

        let enum_types = def
            .enum_types
            .iter()
            .map(|e| EnumType {
                namespace: def.namespace.clone(),
                name: e.name.clone(),
                members: e.members.clone(),
            })
            .collect();

        let mut entity_sets = Vec::with_capacity(def.entity_sets.len());
        for s in &def.entity_sets {
            let ty = names
                .resolve(&s.entity_type)
                .with_context(|| format!("entity set '{}'", s.name))?;
            let entity_type = match ty {
                EdmType::Entity(name) => name,
                other => bail!(
                    "entity set '{}' must reference an entity type, found '{other}'",
                    s.name
                ),
            };
            entity_sets.push(EntitySet {
                name: s.name.clone(),
                entity_type,
            });
        }

        let mut operations = Vec::with_capacity(def.operations.len());
        for op in &def.operations {
            let mut parameters = Vec::with_capacity(op.parameters.len());
            for p in &op.parameters {
                let ty = names
                    .resolve(&p.ty)
                    .with_context(|| format!("operation '{}', parameter '{}'", op.name, p.name))?;
                parameters.push(OperationParameter {
                    name: p.name.clone(),
                    ty,
                });
            }
            let return_type = op
                .return_type
                .as_deref()
                .map(|r| names.resolve(r))
                .transpose()
                .with_context(|| format!("operation '{}', return type", op.name))?;
            operations.push(Operation {
                namespace: def.namespace.clone(),
                name: op.name.clone(),
                kind: op.kind,
                is_bound: op.bound,
                parameters,
                return_type,
            });
        }

        Ok(EdmModel {
            namespace: def.namespace,
            entity_types,
            complex_types,
            enum_types,
            entity_sets,
            operations,
        })
    }
}

/// Parse a model definition from YAML (JSON is valid YAML).
///
/// # Errors
///
/// Returns an error if the document does not deserialize or a type reference
/// cannot be resolved.
pub fn parse_model(content: &str) -> anyhow::Result<EdmModel> {
    let def: ModelDefinition = serde_yaml::from_str(content).context("parsing model definition")?;
    EdmModel::from_definition(def)
}

/// Load a model definition file (`.yaml`, `.yml` or `.json`).
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_model(path: &Path) -> anyhow::Result<EdmModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading model file {}", path.display()))?;
    let is_yaml = path
        .extension()
        .map(|s| s == "yaml" || s == "yml")
        .unwrap_or(false);
    if is_yaml {
        parse_model(&content)
    } else {
        let def: ModelDefinition = serde_json::from_str(&content)
            .with_context(|| format!("parsing model file {}", path.display()))?;
        EdmModel::from_definition(def)
    }
}
