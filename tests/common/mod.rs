#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod fixtures {
    use http::Method;
    use odata_swagger::config::GeneratorOptions;
    use odata_swagger::conventional::{ApiDescription, ConventionalApi};
    use odata_swagger::edm::{parse_model, EdmModel};
    use odata_swagger::host::{
        ActionDescriptor, ActionParameter, ControllerDescriptor, HostDescription, ODataRoute,
    };
    use odata_swagger::swagger::{Operation, Response, Schema};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    pub const ROOT_URL: &str = "http://localhost:5000/";

    pub const MODEL: &str = r#"
namespace: Default
complex_types:
  - name: Address
    properties:
      - { name: City, type: Edm.String }
entity_types:
  - name: Customer
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Name, type: Edm.String }
      - { name: Address, type: Address }
      - { name: Orders, type: Collection(Order) }
  - name: Order
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Amount, type: Edm.Decimal }
      - { name: Customer, type: Customer }
  - name: ProductWithStringKey
    key: [Id]
    properties:
      - { name: Id, type: Edm.String }
      - { name: Name, type: Edm.String }
  - name: DecimalParameter
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
  - name: ByteParameter
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
entity_sets:
  - { name: Customers, entity_type: Customer }
  - { name: Orders, entity_type: Order }
  - { name: ProductWithStringKeys, entity_type: ProductWithStringKey }
  - { name: DecimalParameters, entity_type: DecimalParameter }
  - { name: ByteParameters, entity_type: ByteParameter }
operations:
  - name: ResponseTest
    kind: function
    bound: true
    parameters:
      - { name: bindingParameter, type: Collection(DecimalParameter) }
      - { name: param, type: Edm.Decimal }
    return_type: Edm.Decimal
  - name: Rate
    kind: action
    bound: true
    parameters:
      - { name: bindingParameter, type: Customer }
      - { name: rating, type: Edm.Int32 }
  - name: ResetData
    kind: action
"#;

    pub fn model() -> Arc<EdmModel> {
        Arc::new(parse_model(MODEL).unwrap())
    }

    pub fn controllers() -> Vec<ControllerDescriptor> {
        vec![
            ControllerDescriptor::new("Customers")
                .action(ActionDescriptor::new("Get", &[Method::GET]))
                .action(
                    ActionDescriptor::new("Get", &[Method::GET])
                        .parameter(ActionParameter::uri("key")),
                )
                .action(
                    ActionDescriptor::new("Post", &[Method::POST])
                        .parameter(ActionParameter::body("customer")),
                )
                .action(
                    ActionDescriptor::new("Patch", &[Method::PATCH])
                        .parameter(ActionParameter::uri("key"))
                        .parameter(ActionParameter::body("delta")),
                )
                .action(
                    ActionDescriptor::new("Delete", &[Method::DELETE])
                        .parameter(ActionParameter::uri("key")),
                )
                .action(
                    ActionDescriptor::new("RateOnCustomer", &[Method::POST])
                        .parameter(ActionParameter::uri("key"))
                        .parameter(ActionParameter::body("parameters")),
                ),
            ControllerDescriptor::new("Orders")
                .action(ActionDescriptor::new("GetOrders", &[Method::GET])),
            ControllerDescriptor::new("ProductWithStringKeys")
                .action(
                    ActionDescriptor::new("Get", &[Method::GET])
                        .parameter(ActionParameter::uri("key")),
                )
                .action(
                    ActionDescriptor::new("Put", &[Method::PUT])
                        .parameter(ActionParameter::uri("key"))
                        .parameter(ActionParameter::body("product")),
                ),
            ControllerDescriptor::new("DecimalParameters").action(
                ActionDescriptor::new("ResponseTest", &[Method::GET])
                    .parameter(ActionParameter::uri("param")),
            ),
            ControllerDescriptor::new("ByteParameters")
                .action(ActionDescriptor::new("Get", &[Method::GET])),
            ControllerDescriptor::new("OData")
                .action(ActionDescriptor::new("ResetData", &[Method::POST])),
        ]
    }

    pub fn host() -> HostDescription {
        let host = HostDescription::default()
            .conventional_route("DefaultApi", "api/{controller}/{id}")
            .odata_route(ODataRoute::new("odata", "odata", model()));
        controllers().into_iter().fold(host, HostDescription::controller)
    }

    pub fn options() -> GeneratorOptions {
        GeneratorOptions::builder()
            .api_version("v1", "Sample API")
            .build()
    }

    pub fn operation(id: &str) -> Operation {
        let mut responses = BTreeMap::new();
        responses.insert("200".to_string(), Response::new("OK", None));
        Operation {
            operation_id: Some(id.to_string()),
            tags: vec!["Values".to_string()],
            responses,
            ..Operation::default()
        }
    }

    /// Conventional API: two value routes and a `Value` definition.
    pub fn conventional() -> ConventionalApi {
        let mut definitions = BTreeMap::new();
        definitions.insert("Value".to_string(), Schema::typed("string", None));
        ConventionalApi {
            descriptions: vec![
                ApiDescription::new(Method::GET, "api/Values", operation("Values_Get")),
                ApiDescription::new(Method::GET, "api/Values/{id}", operation("Values_GetById")),
            ],
            definitions,
        }
    }
}

pub mod temp_files {
    use std::path::{Path, PathBuf};

    /// Write `content` to `dir/name` and return the path.
    pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }
}
