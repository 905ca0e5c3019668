use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive kinds an EDM property, parameter or return type can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrimitiveKind {
    Binary,
    Boolean,
    Byte,
    Date,
    DateTimeOffset,
    Decimal,
    Double,
    Duration,
    Guid,
    Int16,
    Int32,
    Int64,
    SByte,
    Single,
    Stream,
    String,
    TimeOfDay,
    /// An `Edm.*` name this crate does not know about
    Unknown,
}

impl PrimitiveKind {
    /// Parse a qualified primitive name such as `Edm.Int32`.
    ///
    /// Returns `None` when the name is not in the `Edm` namespace. Names in the
    /// namespace that are not recognised map to [`PrimitiveKind::Unknown`].
    #[must_use]
    pub fn from_edm_name(name: &str) -> Option<Self> {
        let short = name.strip_prefix("Edm.")?;
        let kind = match short {
            "Binary" => Self::Binary,
            "Boolean" => Self::Boolean,
            "Byte" => Self::Byte,
            "Date" => Self::Date,
            "DateTimeOffset" => Self::DateTimeOffset,
            "Decimal" => Self::Decimal,
            "Double" => Self::Double,
            "Duration" => Self::Duration,
            "Guid" => Self::Guid,
            "Int16" => Self::Int16,
            "Int32" => Self::Int32,
            "Int64" => Self::Int64,
            "SByte" => Self::SByte,
            "Single" => Self::Single,
            "Stream" => Self::Stream,
            "String" => Self::String,
            "TimeOfDay" => Self::TimeOfDay,
            _ => Self::Unknown,
        };
        Some(kind)
    }

    /// Name without the `Edm.` prefix.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Boolean => "Boolean",
            Self::Byte => "Byte",
            Self::Date => "Date",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::Decimal => "Decimal",
            Self::Double => "Double",
            Self::Duration => "Duration",
            Self::Guid => "Guid",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::SByte => "SByte",
            Self::Single => "Single",
            Self::Stream => "Stream",
            Self::String => "String",
            Self::TimeOfDay => "TimeOfDay",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edm.{}", self.short_name())
    }
}

/// A resolved type reference. Structured and enum references carry the
/// fully-qualified name of the target type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmType {
    Primitive(PrimitiveKind),
    Complex(String),
    Entity(String),
    Enum(String),
    Collection(Box<EdmType>),
}

impl EdmType {
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, EdmType::Collection(_))
    }

    /// The element type for collections, the type itself otherwise.
    #[must_use]
    pub fn element_type(&self) -> &EdmType {
        match self {
            EdmType::Collection(inner) => inner,
            other => other,
        }
    }

    /// Full name of the entity type when this is a single entity reference.
    #[must_use]
    pub fn as_entity(&self) -> Option<&str> {
        match self {
            EdmType::Entity(name) => Some(name),
            _ => None,
        }
    }

    /// Full name of the entity type when this is a collection of entities.
    #[must_use]
    pub fn as_entity_collection(&self) -> Option<&str> {
        match self {
            EdmType::Collection(inner) => inner.as_entity(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            EdmType::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl fmt::Display for EdmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdmType::Primitive(kind) => write!(f, "{kind}"),
            EdmType::Complex(name) | EdmType::Entity(name) | EdmType::Enum(name) => {
                write!(f, "{name}")
            }
            EdmType::Collection(inner) => write!(f, "Collection({inner})"),
        }
    }
}

/// Structural property of an entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub ty: EdmType,
    pub nullable: bool,
}

/// Entity or complex type. Complex types have an empty `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredType {
    pub namespace: String,
    pub name: String,
    /// Key property names in declared order
    pub key: Vec<String>,
    /// Properties in declared order
    pub properties: Vec<Property>,
}

impl StructuredType {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Key properties in key order. Key names without a matching property are
    /// skipped.
    #[must_use]
    pub fn key_properties(&self) -> Vec<&Property> {
        self.key.iter().filter_map(|k| self.property(k)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub namespace: String,
    pub name: String,
    pub members: Vec<String>,
}

impl EnumType {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySet {
    pub name: String,
    /// Full name of the element entity type
    pub entity_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Function,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationParameter {
    pub name: String,
    pub ty: EdmType,
}

/// Function or action. Bound operations declare their binding parameter
/// first; unbound operations are exposed as imports under their own name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub namespace: String,
    pub name: String,
    pub kind: OperationKind,
    pub is_bound: bool,
    pub parameters: Vec<OperationParameter>,
    pub return_type: Option<EdmType>,
}

impl Operation {
    /// `Namespace.Name`, the form used in bound operation path segments.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
    }

    #[must_use]
    pub fn binding_parameter(&self) -> Option<&OperationParameter> {
        if self.is_bound {
            self.parameters.first()
        } else {
            None
        }
    }

    /// Parameters a caller supplies: everything after the binding parameter
    /// for bound operations, all of them for imports.
    #[must_use]
    pub fn non_binding_parameters(&self) -> &[OperationParameter] {
        if self.is_bound && !self.parameters.is_empty() {
            &self.parameters[1..]
        } else {
            &self.parameters
        }
    }
}

/// Immutable entity data model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdmModel {
    pub namespace: String,
    pub entity_types: Vec<StructuredType>,
    pub complex_types: Vec<StructuredType>,
    pub enum_types: Vec<EnumType>,
    pub entity_sets: Vec<EntitySet>,
    pub operations: Vec<Operation>,
}

impl EdmModel {
    #[must_use]
    pub fn entity_type(&self, full_name: &str) -> Option<&StructuredType> {
        self.entity_types.iter().find(|t| t.full_name() == full_name)
    }

    #[must_use]
    pub fn complex_type(&self, full_name: &str) -> Option<&StructuredType> {
        self.complex_types.iter().find(|t| t.full_name() == full_name)
    }

    /// Entity or complex type by full name.
    #[must_use]
    pub fn structured_type(&self, full_name: &str) -> Option<&StructuredType> {
        self.entity_type(full_name)
            .or_else(|| self.complex_type(full_name))
    }

    #[must_use]
    pub fn enum_type(&self, full_name: &str) -> Option<&EnumType> {
        self.enum_types.iter().find(|t| t.full_name() == full_name)
    }

    #[must_use]
    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    /// Entity sets whose element type is `entity_type`, in declared order.
    pub fn entity_sets_for<'a>(
        &'a self,
        entity_type: &'a str,
    ) -> impl Iterator<Item = &'a EntitySet> + 'a {
        self.entity_sets
            .iter()
            .filter(move |s| s.entity_type == entity_type)
    }

    pub fn bound_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| op.is_bound)
    }

    /// Unbound operations, each exposed as an import under its own name.
    pub fn operation_imports(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter().filter(|op| !op.is_bound)
    }

    #[must_use]
    pub fn operation_import(&self, name: &str) -> Option<&Operation> {
        self.operation_imports().find(|op| op.name == name)
    }

    /// Bound operation by full name whose binding parameter accepts `binding`.
    #[must_use]
    pub fn bound_operation(&self, full_name: &str, binding: &EdmType) -> Option<&Operation> {
        self.bound_operations().find(|op| {
            op.full_name() == full_name
                && op.binding_parameter().map(|p| &p.ty) == Some(binding)
        })
    }
}
