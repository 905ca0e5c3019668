#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

const MODEL: &str = r#"
namespace: Default
entity_types:
  - name: Customer
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Name, type: Edm.String }
      - { name: Address, type: Address }
      - { name: Orders, type: Collection(Order) }
  - name: Order
    key: [OrderId]
    properties:
      - { name: OrderId, type: Edm.Guid }
      - { name: Customer, type: Default.Customer }
complex_types:
  - name: Address
    properties:
      - { name: City, type: Edm.String }
enum_types:
  - { name: Color, members: [Red, Green] }
entity_sets:
  - { name: Customers, entity_type: Customer }
  - { name: Orders, entity_type: Default.Order }
operations:
  - name: Rate
    kind: action
    bound: true
    parameters:
      - { name: bindingParameter, type: Customer }
      - { name: rating, type: Edm.Int32 }
  - name: GetCount
    kind: function
    return_type: Edm.Int64
"#;

#[test]
fn resolves_type_references() {
    let model = parse_model(MODEL).unwrap();
    let customer = model.entity_type("Default.Customer").unwrap();
    assert_eq!(customer.key, vec!["Id"]);
    assert_eq!(
        customer.property("Address").unwrap().ty,
        EdmType::Complex("Default.Address".into())
    );
    assert_eq!(
        customer.property("Orders").unwrap().ty,
        EdmType::Collection(Box::new(EdmType::Entity("Default.Order".into())))
    );
    let order = model.entity_type("Default.Order").unwrap();
    assert_eq!(
        order.key_properties()[0].ty,
        EdmType::Primitive(PrimitiveKind::Guid)
    );
}

#[test]
fn splits_bound_operations_and_imports() {
    let model = parse_model(MODEL).unwrap();
    let bound: Vec<_> = model.bound_operations().map(|o| o.full_name()).collect();
    assert_eq!(bound, vec!["Default.Rate"]);
    let rate = model
        .bound_operation("Default.Rate", &EdmType::Entity("Default.Customer".into()))
        .unwrap();
    assert_eq!(rate.non_binding_parameters().len(), 1);
    assert!(model.operation_import("GetCount").is_some());
    assert!(model.operation_import("Rate").is_none());
}

#[test]
fn unknown_type_reference_fails() {
    let yaml = r#"
namespace: Default
entity_types:
  - name: Widget
    key: [Id]
    properties:
      - { name: Id, type: Gadget }
"#;
    let err = parse_model(yaml).unwrap_err();
    assert!(format!("{err:#}").contains("unknown type reference 'Gadget'"));
}

#[test]
fn entity_set_over_complex_type_fails() {
    let yaml = r#"
namespace: Default
complex_types:
  - name: Address
entity_sets:
  - { name: Addresses, entity_type: Address }
"#;
    assert!(parse_model(yaml).is_err());
}

#[test]
fn unknown_edm_primitive_is_tolerated() {
    assert_eq!(
        PrimitiveKind::from_edm_name("Edm.GeographyPoint"),
        Some(PrimitiveKind::Unknown)
    );
    assert_eq!(PrimitiveKind::from_edm_name("Default.Customer"), None);
}

#[test]
fn display_round_trips_collection_names() {
    let ty = EdmType::Collection(Box::new(EdmType::Primitive(PrimitiveKind::Int32)));
    assert_eq!(ty.to_string(), "Collection(Edm.Int32)");
}
