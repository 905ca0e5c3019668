//! Primitive EDM kinds to Swagger `type`/`format` pairs.
//!
//! Swagger 2.0 has no native byte, date, date-time or decimal types, so those
//! travel as `string`/`number` with a distinguishing format. Anything the
//! table does not know becomes a plain `string`.

use crate::edm::PrimitiveKind;
use crate::swagger::Schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A Swagger `type` with an optional `format`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeFormat {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TypeFormat {
    #[must_use]
    pub fn new(type_name: impl Into<String>, format: Option<&str>) -> Self {
        Self {
            type_name: type_name.into(),
            format: format.map(str::to_string),
        }
    }

    #[must_use]
    pub fn to_schema(&self) -> Schema {
        Schema::typed(self.type_name.clone(), self.format.clone())
    }
}

/// Default mapping for a primitive kind. Total: unknown kinds map to
/// `string` without a format.
#[must_use]
pub fn map_primitive(kind: PrimitiveKind) -> TypeFormat {
    let (type_name, format) = match kind {
        PrimitiveKind::String => ("string", None),
        PrimitiveKind::Int16 | PrimitiveKind::Int32 | PrimitiveKind::SByte => {
            ("integer", Some("int32"))
        }
        PrimitiveKind::Int64 => ("integer", Some("int64")),
        PrimitiveKind::Boolean => ("boolean", None),
        PrimitiveKind::Byte => ("string", Some("byte")),
        PrimitiveKind::Binary => ("string", Some("binary")),
        PrimitiveKind::Date => ("string", Some("date")),
        PrimitiveKind::DateTimeOffset => ("string", Some("date-time")),
        PrimitiveKind::Guid => ("string", Some("uuid")),
        PrimitiveKind::Double => ("number", Some("double")),
        PrimitiveKind::Single => ("number", Some("float")),
        PrimitiveKind::Decimal => ("number", Some("decimal")),
        PrimitiveKind::TimeOfDay
        | PrimitiveKind::Duration
        | PrimitiveKind::Stream
        | PrimitiveKind::Unknown => ("string", None),
    };
    TypeFormat::new(type_name, format)
}

/// User overrides consulted before the default table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMappings {
    overrides: BTreeMap<PrimitiveKind, TypeFormat>,
}

impl TypeMappings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an override, replacing any earlier one for the same kind.
    pub fn insert(&mut self, kind: PrimitiveKind, mapping: TypeFormat) {
        self.overrides.insert(kind, mapping);
    }

    #[must_use]
    pub fn map(&self, kind: PrimitiveKind) -> TypeFormat {
        self.overrides
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| map_primitive(kind))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_widths_carry_formats() {
        assert_eq!(map_primitive(PrimitiveKind::Int32), TypeFormat::new("integer", Some("int32")));
        assert_eq!(map_primitive(PrimitiveKind::Int64), TypeFormat::new("integer", Some("int64")));
        assert_eq!(map_primitive(PrimitiveKind::Double), TypeFormat::new("number", Some("double")));
        assert_eq!(map_primitive(PrimitiveKind::Single), TypeFormat::new("number", Some("float")));
    }

    #[test]
    fn types_without_native_equivalent_use_formats() {
        assert_eq!(map_primitive(PrimitiveKind::Byte), TypeFormat::new("string", Some("byte")));
        assert_eq!(map_primitive(PrimitiveKind::Date), TypeFormat::new("string", Some("date")));
        assert_eq!(
            map_primitive(PrimitiveKind::DateTimeOffset),
            TypeFormat::new("string", Some("date-time"))
        );
        assert_eq!(
            map_primitive(PrimitiveKind::Decimal),
            TypeFormat::new("number", Some("decimal"))
        );
    }

    #[test]
    fn unknown_kinds_fall_back_to_string() {
        assert_eq!(map_primitive(PrimitiveKind::Unknown), TypeFormat::new("string", None));
        assert_eq!(map_primitive(PrimitiveKind::Duration), TypeFormat::new("string", None));
    }

    #[test]
    fn overrides_win_over_defaults() {
        let mut mappings = TypeMappings::new();
        mappings.insert(PrimitiveKind::Decimal, TypeFormat::new("string", Some("decimal")));
        assert_eq!(
            mappings.map(PrimitiveKind::Decimal),
            TypeFormat::new("string", Some("decimal"))
        );
        assert_eq!(mappings.map(PrimitiveKind::Int32), map_primitive(PrimitiveKind::Int32));
    }
}
