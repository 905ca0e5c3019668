//! Schema synthesis from structured EDM types.
//!
//! Every property maps one level deep: structured targets become `$ref`s to
//! their own definition rather than being inlined, so the type graph stays
//! finite even when entities reference each other. Navigation-induced cycles
//! that survive as `$ref`s are pruned later by
//! [`crate::filters::navigation`].

use crate::edm::{EdmModel, EdmType, StructuredType};
use crate::mapping::TypeMappings;
use crate::swagger::{Properties, Schema};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Marker carried by the name of every generated response envelope.
pub const RESPONSE_ENVELOPE_MARKER: &str = "ODataResponse";

/// Name of the shared error definition referenced by `default` responses.
pub const ERROR_SCHEMA: &str = "ODataError";

/// Accumulates definitions for one model. Registration is keyed by the
/// fully-qualified type name and replaces on re-registration.
pub struct SchemaRegistry<'m> {
    model: &'m EdmModel,
    mappings: &'m TypeMappings,
    definitions: BTreeMap<String, Schema>,
}

impl<'m> SchemaRegistry<'m> {
    #[must_use]
    pub fn new(model: &'m EdmModel, mappings: &'m TypeMappings) -> Self {
        Self {
            model,
            mappings,
            definitions: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &'m EdmModel {
        self.model
    }

    #[must_use]
    pub fn mappings(&self) -> &'m TypeMappings {
        self.mappings
    }

    /// Register a definition for every entity and complex type of the model.
    pub fn register_model(&mut self) {
        let model = self.model;
        for ty in model.entity_types.iter().chain(model.complex_types.iter()) {
            self.register_structured(&ty.full_name());
        }
        debug!(
            definitions = self.definitions.len(),
            namespace = %model.namespace,
            "Registered model schemas"
        );
    }

    /// Build and register the definition for a structured type. Returns
    /// `false` when the model has no such type.
    pub fn register_structured(&mut self, full_name: &str) -> bool {
        let Some(ty) = self.model.structured_type(full_name) else {
            return false;
        };
        // Placeholder first so self-referencing properties stop here.
        self.definitions
            .insert(full_name.to_string(), Schema::object(Properties::new()));
        let schema = self.build_schema(ty);
        self.definitions.insert(full_name.to_string(), schema);
        true
    }

    fn ensure_registered(&mut self, full_name: &str) {
        if !self.definitions.contains_key(full_name) {
            self.register_structured(full_name);
        }
    }

    /// Object schema for a structured type, properties in declared order.
    pub fn build_schema(&mut self, ty: &StructuredType) -> Schema {
        let mut properties = Properties::new();
        for property in &ty.properties {
            let schema = self.schema_for(&property.ty);
            properties.insert(property.name.clone(), schema);
        }
        let mut schema = Schema::object(properties);
        schema.required = ty.key.clone();
        schema
    }

    /// Property-level schema for a type reference.
    pub fn schema_for(&mut self, ty: &EdmType) -> Schema {
        match ty {
            EdmType::Primitive(kind) => self.mappings.map(*kind).to_schema(),
            EdmType::Complex(name) | EdmType::Entity(name) => {
                self.ensure_registered(name);
                Schema::reference(name)
            }
            EdmType::Enum(name) => {
                let mut schema = Schema::typed("string", None);
                if let Some(enum_type) = self.model.enum_type(name) {
                    schema.enum_values = enum_type
                        .members
                        .iter()
                        .map(|m| Value::String(m.clone()))
                        .collect();
                }
                schema
            }
            EdmType::Collection(inner) => Schema::array(self.schema_for(inner)),
        }
    }

    /// Schema for an operation or query response: single structured values
    /// are referenced directly, everything else travels in an envelope.
    pub fn response_schema(&mut self, ty: &EdmType) -> Schema {
        match ty {
            EdmType::Complex(_) | EdmType::Entity(_) => self.schema_for(ty),
            _ => self.envelope(ty),
        }
    }

    /// Register `ODataResponse[<label>]` wrapping `ty` under `value` and
    /// return a `$ref` to it.
    pub fn envelope(&mut self, ty: &EdmType) -> Schema {
        let name = format!("{RESPONSE_ENVELOPE_MARKER}[{}]", label(ty));
        if !self.definitions.contains_key(&name) {
            let value = self.schema_for(ty);
            let mut properties = Properties::new();
            properties.insert("@odata.context", Schema::typed("string", None));
            properties.insert("value", value);
            self.definitions.insert(name.clone(), Schema::object(properties));
        }
        Schema::reference(&name)
    }

    /// `$ref` to the shared error definition, registering it on first use.
    pub fn error_schema(&mut self) -> Schema {
        self.definitions
            .entry(ERROR_SCHEMA.to_string())
            .or_insert_with(|| {
                let mut properties = Properties::new();
                properties.insert("code", Schema::typed("string", None));
                properties.insert("message", Schema::typed("string", None));
                Schema::object(properties)
            });
        Schema::reference(ERROR_SCHEMA)
    }

    #[must_use]
    pub fn definitions(&self) -> &BTreeMap<String, Schema> {
        &self.definitions
    }

    #[must_use]
    pub fn into_definitions(self) -> BTreeMap<String, Schema> {
        self.definitions
    }
}

/// Display label used in envelope names: `Decimal`, `Customer`,
/// `List[Customer]`.
#[must_use]
pub fn label(ty: &EdmType) -> String {
    match ty {
        EdmType::Primitive(kind) => kind.short_name().to_string(),
        EdmType::Complex(name) | EdmType::Entity(name) | EdmType::Enum(name) => {
            short_name(name).to_string()
        }
        EdmType::Collection(inner) => format!("List[{}]", label(inner)),
    }
}

/// Last dotted segment of a qualified name.
#[must_use]
pub fn short_name(full_name: &str) -> &str {
    full_name.rsplit('.').next().unwrap_or(full_name)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::edm::{parse_model, PrimitiveKind};
    use crate::mapping::TypeFormat;

    const MODEL: &str = r#"
namespace: Default
entity_types:
  - name: Customer
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Name, type: Edm.String }
      - { name: Tier, type: Tier }
      - { name: Address, type: Address }
      - { name: Orders, type: Collection(Order) }
      - { name: Tags, type: Collection(Edm.String) }
  - name: Order
    key: [OrderId]
    properties:
      - { name: OrderId, type: Edm.Guid }
      - { name: Total, type: Edm.Decimal }
      - { name: Customer, type: Customer }
complex_types:
  - name: Address
    properties:
      - { name: City, type: Edm.String }
enum_types:
  - { name: Tier, members: [Bronze, Gold] }
"#;

    #[test]
    fn maps_properties_one_level_deep() {
        let model = parse_model(MODEL).unwrap();
        let mappings = TypeMappings::new();
        let mut registry = SchemaRegistry::new(&model, &mappings);
        registry.register_model();

        let customer = &registry.definitions()["Default.Customer"];
        assert_eq!(customer.required, vec!["Id"]);
        assert_eq!(customer.properties.get("Id").unwrap().format.as_deref(), Some("int32"));
        assert_eq!(
            customer.properties.get("Address").unwrap().referenced_name(),
            Some("Default.Address")
        );
        let orders = &customer.properties.get("Orders").unwrap();
        assert!(orders.is_reference_array());
        assert_eq!(
            orders.items.as_ref().unwrap().referenced_name(),
            Some("Default.Order")
        );
        assert_eq!(customer.properties.get("Tags").unwrap().items.as_ref().unwrap().schema_type.as_deref(), Some("string"));
        assert_eq!(customer.properties.get("Tier").unwrap().enum_values.len(), 2);
    }

    #[test]
    fn properties_keep_declared_order() {
        let model = parse_model(MODEL).unwrap();
        let mappings = TypeMappings::new();
        let mut registry = SchemaRegistry::new(&model, &mappings);
        registry.register_model();

        let customer = &registry.definitions()["Default.Customer"];
        let names: Vec<&str> = customer.properties.keys().collect();
        assert_eq!(names, vec!["Id", "Name", "Tier", "Address", "Orders", "Tags"]);

        let json = serde_json::to_string(customer).unwrap();
        let positions: Vec<usize> = ["\"Id\"", "\"Name\"", "\"Tier\"", "\"Tags\""]
            .iter()
            .map(|name| json.find(name).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let back: Schema = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, customer);
    }

    #[test]
    fn cyclic_references_register_each_type_once() {
        let model = parse_model(MODEL).unwrap();
        let mappings = TypeMappings::new();
        let mut registry = SchemaRegistry::new(&model, &mappings);
        registry.schema_for(&EdmType::Entity("Default.Order".into()));

        let names: Vec<_> = registry.definitions().keys().cloned().collect();
        assert_eq!(names, vec!["Default.Address", "Default.Customer", "Default.Order"]);
        // the placeholder was replaced by the full definition
        assert!(registry.definitions()["Default.Order"].properties.contains_key("Total"));
    }

    #[test]
    fn re_registration_replaces() {
        let model = parse_model(MODEL).unwrap();
        let mappings = TypeMappings::new();
        let mut registry = SchemaRegistry::new(&model, &mappings);
        registry.register_model();
        let before = registry.definitions().len();
        assert!(registry.register_structured("Default.Customer"));
        assert_eq!(registry.definitions().len(), before);
        assert!(!registry.register_structured("Default.Missing"));
    }

    #[test]
    fn envelopes_wrap_primitives_and_collections() {
        let model = parse_model(MODEL).unwrap();
        let mut mappings = TypeMappings::new();
        mappings.insert(PrimitiveKind::Decimal, TypeFormat::new("number", Some("decimal")));
        let mut registry = SchemaRegistry::new(&model, &mappings);

        let decimal = registry.response_schema(&EdmType::Primitive(PrimitiveKind::Decimal));
        assert_eq!(decimal.referenced_name(), Some("ODataResponse[Decimal]"));
        let wrapper = &registry.definitions()["ODataResponse[Decimal]"];
        assert_eq!(wrapper.properties.get("value").unwrap().schema_type.as_deref(), Some("number"));
        assert_eq!(wrapper.properties.get("value").unwrap().format.as_deref(), Some("decimal"));

        let list = registry.response_schema(&EdmType::Collection(Box::new(EdmType::Entity(
            "Default.Customer".into(),
        ))));
        assert_eq!(list.referenced_name(), Some("ODataResponse[List[Customer]]"));

        let single = registry.response_schema(&EdmType::Entity("Default.Customer".into()));
        assert_eq!(single.referenced_name(), Some("Default.Customer"));
    }

    #[test]
    fn error_schema_has_code_and_message() {
        let model = EdmModel::default();
        let mappings = TypeMappings::new();
        let mut registry = SchemaRegistry::new(&model, &mappings);
        let reference = registry.error_schema();
        assert_eq!(reference.referenced_name(), Some(ERROR_SCHEMA));
        let error = &registry.definitions()[ERROR_SCHEMA];
        assert!(error.properties.contains_key("code"));
        assert!(error.properties.contains_key("message"));
    }
}
