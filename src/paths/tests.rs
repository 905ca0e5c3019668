#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::edm::{parse_model, EdmModel, EdmType, PrimitiveKind};
use crate::mapping::TypeMappings;
use crate::schema::SchemaRegistry;
use crate::swagger::ParameterLocation;

const MODEL: &str = r#"
namespace: Default
entity_types:
  - name: Customer
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Name, type: Edm.String }
  - name: Product
    key: [Id]
    properties:
      - { name: Id, type: Edm.String }
  - name: Audit
    properties:
      - { name: Message, type: Edm.String }
entity_sets:
  - { name: Customers, entity_type: Customer }
  - { name: Products, entity_type: Product }
  - { name: Audits, entity_type: Audit }
operations:
  - name: ResponseTest
    kind: function
    bound: true
    parameters:
      - { name: bindingParameter, type: Collection(Customer) }
      - { name: param, type: Edm.Decimal }
    return_type: Edm.Decimal
  - name: Rate
    kind: action
    bound: true
    parameters:
      - { name: bindingParameter, type: Customer }
      - { name: rating, type: Edm.Int32 }
  - name: Orphan
    kind: function
    bound: true
    parameters:
      - { name: bindingParameter, type: Edm.String }
  - name: MostExpensive
    kind: function
    return_type: Product
  - name: ResetData
    kind: action
    parameters: []
"#;

fn build(model: &EdmModel) -> Vec<PathCandidate> {
    let mappings = TypeMappings::new();
    let mut registry = SchemaRegistry::new(model, &mappings);
    build_paths_for_model(&mut registry)
}

fn find<'a>(candidates: &'a [PathCandidate], method: &Method, template: &str) -> &'a PathCandidate {
    candidates
        .iter()
        .find(|c| c.method == *method && c.template == template)
        .unwrap_or_else(|| panic!("no candidate {method} {template}"))
}

#[test]
fn traversal_order_is_sets_then_imports_then_bound() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let order: Vec<(String, &str)> = candidates
        .iter()
        .map(|c| (c.method.to_string(), c.template.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("GET".to_string(), "/Customers"),
            ("POST".to_string(), "/Customers"),
            ("GET".to_string(), "/Customers({Id})"),
            ("PUT".to_string(), "/Customers({Id})"),
            ("PATCH".to_string(), "/Customers({Id})"),
            ("DELETE".to_string(), "/Customers({Id})"),
            ("GET".to_string(), "/Products"),
            ("POST".to_string(), "/Products"),
            ("GET".to_string(), "/Products('{Id}')"),
            ("PUT".to_string(), "/Products('{Id}')"),
            ("PATCH".to_string(), "/Products('{Id}')"),
            ("DELETE".to_string(), "/Products('{Id}')"),
            ("GET".to_string(), "/MostExpensive()"),
            ("POST".to_string(), "/ResetData"),
            ("GET".to_string(), "/Customers/Default.ResponseTest(param={param})"),
            ("POST".to_string(), "/Customers({Id})/Default.Rate"),
        ]
    );
}

#[test]
fn keyless_entity_set_is_skipped_entirely() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    assert!(candidates.iter().all(|c| !c.template.starts_with("/Audits")));
}

#[test]
fn collection_get_offers_query_options_and_list_envelope() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let get = find(&candidates, &Method::GET, "/Customers");
    let names: Vec<&str> = get.operation.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["$expand", "$filter", "$select", "$orderby", "$top", "$skip", "$count"]
    );
    let top = &get.operation.parameters[4];
    assert_eq!(top.param_type.as_deref(), Some("integer"));
    assert_eq!(top.format.as_deref(), Some("int32"));
    assert!(!top.required);
    assert_eq!(
        get.operation.responses["200"].schema.as_ref().unwrap().referenced_name(),
        Some("ODataResponse[List[Customer]]")
    );
    assert_eq!(
        get.operation.responses["default"].schema.as_ref().unwrap().referenced_name(),
        Some("ODataError")
    );
}

#[test]
fn post_creates_and_entity_writes_return_no_content() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let post = find(&candidates, &Method::POST, "/Customers");
    assert!(post.operation.responses.contains_key("201"));
    assert_eq!(post.operation.parameters[0].location, ParameterLocation::Body);

    for method in [Method::PUT, Method::PATCH, Method::DELETE] {
        let op = find(&candidates, &method, "/Customers({Id})");
        assert!(op.operation.responses.contains_key("204"), "{method}");
        assert_eq!(op.kind, PathKind::Entity);
    }
    let delete = find(&candidates, &Method::DELETE, "/Customers({Id})");
    assert!(delete.operation.has_parameter("If-Match", ParameterLocation::Header));
}

#[test]
fn string_key_parameter_is_required_path_string() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let put = find(&candidates, &Method::PUT, "/Products('{Id}')");
    let id = put.operation.path_parameters().next().unwrap();
    assert_eq!(id.name, "Id");
    assert!(id.required);
    assert_eq!(id.param_type.as_deref(), Some("string"));
}

#[test]
fn bound_function_returns_primitive_envelope() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let f = find(
        &candidates,
        &Method::GET,
        "/Customers/Default.ResponseTest(param={param})",
    );
    assert_eq!(f.kind, PathKind::BoundToCollection);
    let param = f.operation.path_parameters().next().unwrap();
    assert_eq!(param.param_type.as_deref(), Some("number"));
    assert_eq!(param.format.as_deref(), Some("decimal"));
    assert_eq!(
        f.operation.responses["200"].schema.as_ref().unwrap().referenced_name(),
        Some("ODataResponse[Decimal]")
    );
}

#[test]
fn bound_action_takes_parameters_body_and_keys() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let a = find(&candidates, &Method::POST, "/Customers({Id})/Default.Rate");
    assert_eq!(a.kind, PathKind::BoundToEntity);
    let body = a
        .operation
        .parameters
        .iter()
        .find(|p| p.location == ParameterLocation::Body)
        .unwrap();
    assert_eq!(body.name, "parameters");
    assert!(body.schema.as_ref().unwrap().properties.contains_key("rating"));
    assert!(a.operation.has_parameter("Id", ParameterLocation::Path));
    assert!(a.operation.responses.contains_key("204"));
}

#[test]
fn operation_bound_to_primitive_is_skipped() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    assert!(candidates.iter().all(|c| !c.template.contains("Orphan")));
}

#[test]
fn imports_use_their_name_as_tag() {
    let model = parse_model(MODEL).unwrap();
    let candidates = build(&model);
    let f = find(&candidates, &Method::GET, "/MostExpensive()");
    assert_eq!(f.operation.tags, vec!["MostExpensive"]);
    assert_eq!(
        f.operation.responses["200"].schema.as_ref().unwrap().referenced_name(),
        Some("Default.Product")
    );
    let a = find(&candidates, &Method::POST, "/ResetData");
    assert!(a.operation.parameters.is_empty());
}

#[test]
fn custom_route_documents_declared_operations() {
    let model = parse_model(MODEL).unwrap();
    let mappings = TypeMappings::new();
    let mut registry = SchemaRegistry::new(&model, &mappings);
    let route = CustomRoute::new("odata", "Customers/Default.Top({count})").operation(
        CustomOperation::new(Method::GET)
            .path_parameter("count", EdmType::Primitive(PrimitiveKind::Int32))
            .returns(EdmType::Collection(Box::new(EdmType::Entity(
                "Default.Customer".into(),
            )))),
    );
    let candidates = route.candidates(&mut registry);
    assert_eq!(candidates.len(), 1);
    let c = &candidates[0];
    assert_eq!(c.template, "/Customers/Default.Top({count})");
    assert_eq!(c.kind, PathKind::Custom);
    assert_eq!(c.operation.operation_id.as_deref(), Some("Customers_Get"));
    assert_eq!(c.operation.tags, vec!["Customers"]);
}
