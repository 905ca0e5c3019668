use super::template::{entity_path, entity_set_path, function_parameters_segment, key_segment};
use super::{PathCandidate, PathKind};
use crate::edm::{EdmType, EntitySet, Operation, OperationKind, StructuredType};
use crate::schema::SchemaRegistry;
use crate::swagger::{Parameter, ParameterLocation, Response, Schema};
use crate::swagger::Operation as SwaggerOperation;
use http::Method;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Standard query options offered on entity-set reads.
const COLLECTION_QUERY_OPTIONS: [(&str, &str, Option<&str>, &str); 7] = [
    ("$expand", "string", None, "Expands related entities inline."),
    ("$filter", "string", None, "Filters the results, based on a Boolean condition."),
    ("$select", "string", None, "Selects which properties to include in the response."),
    ("$orderby", "string", None, "Sorts the results."),
    ("$top", "integer", Some("int32"), "Returns only the first n results."),
    ("$skip", "integer", Some("int32"), "Skips the first n results."),
    ("$count", "boolean", None, "Includes a count of the matching results in the response."),
];

/// Query options offered on single-entity reads.
const ENTITY_QUERY_OPTIONS: [&str; 2] = ["$expand", "$select"];

fn query_option(name: &str) -> Option<Parameter> {
    COLLECTION_QUERY_OPTIONS
        .iter()
        .find(|(n, ..)| *n == name)
        .map(|(n, ty, format, description)| {
            let schema = Schema::typed(*ty, format.map(str::to_string));
            Parameter::simple(*n, ParameterLocation::Query, false, &schema)
                .with_description(*description)
        })
}

fn collection_query_options() -> Vec<Parameter> {
    COLLECTION_QUERY_OPTIONS
        .iter()
        .filter_map(|(n, ..)| query_option(n))
        .collect()
}

fn entity_query_options() -> Vec<Parameter> {
    ENTITY_QUERY_OPTIONS
        .iter()
        .filter_map(|n| query_option(n))
        .collect()
}

fn key_parameters(registry: &mut SchemaRegistry<'_>, entity: &StructuredType) -> Vec<Parameter> {
    entity
        .key_properties()
        .into_iter()
        .map(|k| {
            let schema = registry.schema_for(&k.ty);
            Parameter::simple(k.name.clone(), ParameterLocation::Path, true, &schema)
                .with_description(format!("key: {}", k.name))
        })
        .collect()
}

/// Responses for an operation: the success entry (if any) plus the shared
/// `default` error.
fn responses(
    registry: &mut SchemaRegistry<'_>,
    success: (&str, &str, Option<Schema>),
) -> BTreeMap<String, Response> {
    let (code, description, schema) = success;
    let mut out = BTreeMap::new();
    out.insert(code.to_string(), Response::new(description, schema));
    out.insert(
        "default".to_string(),
        Response::new("Unexpected error", Some(registry.error_schema())),
    );
    out
}

fn return_responses(
    registry: &mut SchemaRegistry<'_>,
    return_type: Option<&EdmType>,
) -> BTreeMap<String, Response> {
    match return_type {
        None => responses(registry, ("204", "No Content", None)),
        Some(ty) => {
            let schema = registry.response_schema(ty);
            responses(registry, ("200", "OK", Some(schema)))
        }
    }
}

fn operation(
    tag: &str,
    summary: String,
    operation_id: String,
    parameters: Vec<Parameter>,
    responses: BTreeMap<String, Response>,
) -> SwaggerOperation {
    SwaggerOperation {
        tags: vec![tag.to_string()],
        summary: Some(summary),
        operation_id: Some(operation_id),
        parameters,
        responses,
        ..SwaggerOperation::default()
    }
}

fn entity_set_candidates(
    registry: &mut SchemaRegistry<'_>,
    set: &EntitySet,
    entity: &StructuredType,
) -> Vec<PathCandidate> {
    let template = entity_set_path(&set.name);
    let entity_ref = EdmType::Entity(entity.full_name());
    let list = registry.response_schema(&EdmType::Collection(Box::new(entity_ref.clone())));

    let get = operation(
        &set.name,
        format!("Get EntitySet {}", set.name),
        format!("{}_Get", set.name),
        collection_query_options(),
        responses(registry, ("200", "EntitySet", Some(list))),
    );

    let body = registry.schema_for(&entity_ref);
    let created = registry.schema_for(&entity_ref);
    let post = operation(
        &set.name,
        format!("Post a new entity to EntitySet {}", set.name),
        format!("{}_Post", set.name),
        vec![Parameter::body(entity.name.clone(), body).with_description("The entity to post")],
        responses(registry, ("201", "Created", Some(created))),
    );

    vec![
        PathCandidate::new(Method::GET, template.clone(), get, PathKind::EntitySet),
        PathCandidate::new(Method::POST, template, post, PathKind::EntitySet),
    ]
}

fn entity_candidates(
    registry: &mut SchemaRegistry<'_>,
    set: &EntitySet,
    entity: &StructuredType,
) -> Vec<PathCandidate> {
    let Some(template) = entity_path(&set.name, entity) else {
        return Vec::new();
    };
    let entity_ref = EdmType::Entity(entity.full_name());
    let keys = key_parameters(registry, entity);

    let mut get_params = keys.clone();
    get_params.extend(entity_query_options());
    let single = registry.schema_for(&entity_ref);
    let get = operation(
        &set.name,
        format!("Get entity from {} by key.", set.name),
        format!("{}_Get", set.name),
        get_params,
        responses(registry, ("200", "Entity", Some(single))),
    );

    let mut with_body = |verb: &str, summary: String| {
        let mut params = keys.clone();
        params.push(
            Parameter::body(entity.name.clone(), registry.schema_for(&entity_ref))
                .with_description(format!("The entity to {}", verb.to_ascii_lowercase())),
        );
        operation(
            &set.name,
            summary,
            format!("{}_{verb}", set.name),
            params,
            responses(registry, ("204", "Empty response", None)),
        )
    };
    let put = with_body("Put", format!("Replace entity in EntitySet {}", set.name));
    let patch = with_body("Patch", format!("Update entity in EntitySet {}", set.name));

    let mut delete_params = keys.clone();
    delete_params.push(
        Parameter::simple(
            "If-Match",
            ParameterLocation::Header,
            false,
            &Schema::typed("string", None),
        )
        .with_description("If-Match header"),
    );
    let delete = operation(
        &set.name,
        format!("Delete entity in EntitySet {}", set.name),
        format!("{}_Delete", set.name),
        delete_params,
        responses(registry, ("204", "Empty response", None)),
    );

    vec![
        PathCandidate::new(Method::GET, template.clone(), get, PathKind::Entity),
        PathCandidate::new(Method::PUT, template.clone(), put, PathKind::Entity),
        PathCandidate::new(Method::PATCH, template.clone(), patch, PathKind::Entity),
        PathCandidate::new(Method::DELETE, template, delete, PathKind::Entity),
    ]
}

/// Parameters of an operation as Swagger parameters: inline path parameters
/// for functions, one `parameters` body object for actions.
fn operation_parameters(registry: &mut SchemaRegistry<'_>, op: &Operation) -> Vec<Parameter> {
    let params = op.non_binding_parameters();
    match op.kind {
        OperationKind::Function => params
            .iter()
            .map(|p| {
                let schema = registry.schema_for(&p.ty);
                Parameter::simple(p.name.clone(), ParameterLocation::Path, true, &schema)
                    .with_description(format!("parameter: {}", p.name))
            })
            .collect(),
        OperationKind::Action if params.is_empty() => Vec::new(),
        OperationKind::Action => {
            let properties = params
                .iter()
                .map(|p| (p.name.clone(), registry.schema_for(&p.ty)))
                .collect();
            vec![Parameter::body("parameters", Schema::object(properties))
                .with_description("Action parameters")]
        }
    }
}

fn operation_method(op: &Operation) -> Method {
    match op.kind {
        OperationKind::Function => Method::GET,
        OperationKind::Action => Method::POST,
    }
}

/// Operation segment: `Name(a={a})` for functions, `Name` for actions.
fn operation_segment(name: &str, op: &Operation) -> String {
    match op.kind {
        OperationKind::Function => {
            format!("{name}{}", function_parameters_segment(op.non_binding_parameters()))
        }
        OperationKind::Action => name.to_string(),
    }
}

fn import_candidate(registry: &mut SchemaRegistry<'_>, op: &Operation) -> PathCandidate {
    let template = format!("/{}", operation_segment(&op.name, op));
    let kind_label = match op.kind {
        OperationKind::Function => "FunctionImport",
        OperationKind::Action => "ActionImport",
    };
    let parameters = operation_parameters(registry, op);
    let responses = return_responses(registry, op.return_type.as_ref());
    let mut call = operation(
        &op.name,
        format!("Call operation import {}", op.name),
        op.name.clone(),
        parameters,
        responses,
    );
    call.description = Some(kind_label.to_string());
    PathCandidate::new(operation_method(op), template, call, PathKind::OperationImport)
}

fn bound_candidate(
    registry: &mut SchemaRegistry<'_>,
    set: &EntitySet,
    entity: &StructuredType,
    op: &Operation,
    to_entity: bool,
) -> Option<PathCandidate> {
    let segment = operation_segment(&op.full_name(), op);
    let (template, mut parameters, kind) = if to_entity {
        let keys = key_segment(entity)?;
        (
            format!("/{}{keys}/{segment}", set.name),
            key_parameters(registry, entity),
            PathKind::BoundToEntity,
        )
    } else {
        (
            format!("/{}/{segment}", set.name),
            Vec::new(),
            PathKind::BoundToCollection,
        )
    };
    parameters.extend(operation_parameters(registry, op));
    let responses = return_responses(registry, op.return_type.as_ref());
    let call = operation(
        &set.name,
        format!("Call operation {}", op.full_name()),
        format!("{}_{}", set.name, op.name),
        parameters,
        responses,
    );
    Some(PathCandidate::new(operation_method(op), template, call, kind))
}

/// Candidate paths for every entity set, entity, operation import and bound
/// operation of the registry's model, in traversal order.
pub fn build_paths_for_model(registry: &mut SchemaRegistry<'_>) -> Vec<PathCandidate> {
    let model = registry.model();
    let mut candidates = Vec::new();
    let mut keyed_sets: Vec<(&EntitySet, &StructuredType)> = Vec::new();

    for set in &model.entity_sets {
        let Some(entity) = model.entity_type(&set.entity_type) else {
            warn!(entity_set = %set.name, entity_type = %set.entity_type, "Entity set references an unknown type; skipped");
            continue;
        };
        if entity.key.is_empty() {
            warn!(entity_set = %set.name, entity_type = %set.entity_type, "Entity type declares no key; entity set skipped");
            continue;
        }
        candidates.extend(entity_set_candidates(registry, set, entity));
        candidates.extend(entity_candidates(registry, set, entity));
        keyed_sets.push((set, entity));
    }

    for op in model.operation_imports() {
        candidates.push(import_candidate(registry, op));
    }

    for op in model.bound_operations() {
        let Some(binding) = op.binding_parameter() else {
            warn!(operation = %op.full_name(), "Bound operation declares no parameters; skipped");
            continue;
        };
        let (bound_type, to_entity) = match &binding.ty {
            EdmType::Entity(name) => (name.as_str(), true),
            EdmType::Collection(inner) => match inner.as_entity() {
                Some(name) => (name, false),
                None => {
                    warn!(operation = %op.full_name(), binding = %binding.ty, "Operation bound to a non-entity collection; skipped");
                    continue;
                }
            },
            other => {
                warn!(operation = %op.full_name(), binding = %other, "Operation bound to a non-entity type; skipped");
                continue;
            }
        };
        for (set, entity) in keyed_sets.iter().filter(|(s, _)| s.entity_type == bound_type) {
            if let Some(candidate) = bound_candidate(registry, set, entity, op, to_entity) {
                candidates.push(candidate);
            }
        }
    }

    info!(
        namespace = %model.namespace,
        entity_sets = keyed_sets.len(),
        candidates = candidates.len(),
        "Built path candidates from model"
    );
    candidates
}
