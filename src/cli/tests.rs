//! Unit tests for CLI commands
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::commands::execute;
use crate::cli::{Cli, Commands, OutputFormat};
use crate::logging::LogFormat;
use clap::Parser;
use std::path::Path;

const MODEL: &str = r#"
namespace: Default
entity_types:
  - name: Customer
    key: [Id]
    properties:
      - { name: Id, type: Edm.Int32 }
      - { name: Name, type: Edm.String }
entity_sets:
  - { name: Customers, entity_type: Customer }
"#;

const HOST: &str = r#"
routes:
  - { kind: odata, name: odata, prefix: odata, model: model.yaml }
controllers:
  - name: Customers
    actions:
      - { name: Get, methods: [GET] }
      - { name: Post, methods: [POST] }
"#;

fn write_inputs(dir: &Path) -> std::path::PathBuf {
    std::fs::write(dir.join("model.yaml"), MODEL).unwrap();
    let host = dir.join("host.yaml");
    std::fs::write(&host, HOST).unwrap();
    host
}

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["odata-swagger", "generate", "--host", "host.yaml"]).unwrap();
    assert_eq!(cli.log_format, LogFormat::Pretty);
    match cli.command {
        Commands::Generate {
            host,
            root_url,
            api_version,
            format,
            output,
            watch,
            ..
        } => {
            assert_eq!(host.to_string_lossy(), "host.yaml");
            assert_eq!(root_url, "http://localhost/");
            assert_eq!(api_version, "v1");
            assert_eq!(format, OutputFormat::Json);
            assert!(output.is_none());
            assert!(!watch);
        }
        Commands::Inspect { .. } => panic!("Expected Generate command"),
    }
}

#[test]
fn test_global_log_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "odata-swagger",
        "inspect",
        "--host",
        "host.yaml",
        "--log-format",
        "json",
        "--route",
        "odata",
    ])
    .unwrap();
    assert_eq!(cli.log_format, LogFormat::Json);
    match cli.command {
        Commands::Inspect { route, .. } => assert_eq!(route.as_deref(), Some("odata")),
        Commands::Generate { .. } => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_host_is_required() {
    assert!(Cli::try_parse_from(["odata-swagger", "generate"]).is_err());
}

#[test]
fn test_generate_writes_json_to_output() {
    let dir = tempfile::tempdir().unwrap();
    let host = write_inputs(dir.path());
    let cli = Cli::try_parse_from([
        "odata-swagger",
        "generate",
        "--host",
        host.to_str().unwrap(),
        "--root-url",
        "http://localhost:5000/",
    ])
    .unwrap();

    let mut out = Vec::new();
    execute(cli.command, &mut out).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(doc["swagger"], "2.0");
    assert_eq!(doc["host"], "localhost:5000");
    assert_eq!(doc["info"]["title"], "OData API");
    assert_eq!(doc["paths"]["/odata/Customers"]["get"]["operationId"], "Customers_Get");
    assert_eq!(doc["paths"]["/odata/Customers"]["post"]["operationId"], "Customers_Post");
    assert!(doc["paths"].get("/odata/Customers({Id})").is_none());
}

#[test]
fn test_generate_yaml_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let host = write_inputs(dir.path());
    let output = dir.path().join("swagger.yaml");
    let cli = Cli::try_parse_from([
        "odata-swagger",
        "generate",
        "--host",
        host.to_str().unwrap(),
        "--format",
        "yaml",
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let mut out = Vec::new();
    execute(cli.command, &mut out).unwrap();
    assert!(out.is_empty());
    let doc: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["swagger"].as_str(), Some("2.0"));
}

#[test]
fn test_inspect_reports_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let host = write_inputs(dir.path());
    let cli =
        Cli::try_parse_from(["odata-swagger", "inspect", "--host", host.to_str().unwrap()]).unwrap();

    let mut out = Vec::new();
    execute(cli.command, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("route odata (prefix 'odata')"));
    assert!(text.contains("GET /odata/Customers -> Customers.Get"));
    assert!(text.contains("GET /odata/Customers({Id}) -- dropped: no controller action"));
}

#[test]
fn test_missing_host_file_fails() {
    let cli = Cli::try_parse_from([
        "odata-swagger",
        "inspect",
        "--host",
        "/nonexistent/host.yaml",
    ])
    .unwrap();
    let mut out = Vec::new();
    assert!(execute(cli.command, &mut out).is_err());
}
