#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::Router;
use crate::edm::EdmModel;
use crate::host::{HostDescription, ODataRoute};
use http::Method;
use std::sync::Arc;

fn odata(name: &str, prefix: &str) -> ODataRoute {
    ODataRoute::new(name, prefix, Arc::new(EdmModel::default()))
}

#[test]
fn test_root_path() {
    let (re, params) = Router::path_to_regex("/").unwrap();
    assert!(re.is_match("/"));
    assert!(params.is_empty());
}

#[test]
fn test_parameterized_path() {
    let (re, params) = Router::path_to_regex("api/{controller}/{id}").unwrap();
    assert!(re.is_match("/api/values/123"));
    assert!(!re.is_match("/api/values"));
    let names: Vec<&str> = params.iter().map(|p| p.as_ref()).collect();
    assert_eq!(names, vec!["controller", "id"]);
}

#[test]
fn test_literal_segments_are_escaped() {
    let (re, _) = Router::path_to_regex("/v1.0/{b}").unwrap();
    assert!(re.is_match("/v1.0/x"));
    assert!(!re.is_match("/v1x0/x"));
}

#[test]
fn odata_prefix_claims_subpaths_only() {
    let host = HostDescription::default().odata_route(odata("odata", "odata"));
    let router = Router::new(&host);
    assert!(router.route(&Method::GET, "/odata").is_some());
    assert!(router.route(&Method::GET, "/odata/Customers({Id})").is_some());
    assert!(router.route(&Method::GET, "/odatax/Customers").is_none());
    assert!(router.route(&Method::GET, "/other").is_none());
}

#[test]
fn first_route_in_table_order_wins() {
    let host = HostDescription::default()
        .conventional_route("Shadow", "odata/Customers")
        .odata_route(odata("odata", "odata"));
    let router = Router::new(&host);

    let shadowed = router.route(&Method::GET, "/odata/Customers").unwrap();
    assert_eq!(shadowed.route_index, 0);
    assert!(!shadowed.is_odata);

    let reachable = router.route(&Method::GET, "/odata/Customers({Id})").unwrap();
    assert_eq!(reachable.route_name, "odata");
    assert_eq!(reachable.route_index, 1);
}

#[test]
fn query_string_is_ignored() {
    let host = HostDescription::default().conventional_route("Api", "api/{controller}");
    let router = Router::new(&host);
    let m = router.route(&Method::GET, "/api/values?x=1").unwrap();
    assert_eq!(m.get_param("controller"), Some("values"));
}

#[test]
fn empty_prefix_claims_everything() {
    let host = HostDescription::default().odata_route(odata("root", ""));
    let router = Router::new(&host);
    assert!(router.route(&Method::POST, "/Anything/Here").unwrap().is_odata);
}
