//! URL template formatting for keys and operation parameters.
//!
//! String-typed values are quoted (`'{Id}'`); every other primitive is
//! rendered bare (`{Id}`). Composite keys and operation parameters use the
//! named `Name={Name}` form, comma separated, in declared order.

use crate::edm::{EdmType, OperationParameter, PrimitiveKind, Property, StructuredType};

/// `{name}` or `'{name}'` depending on the declared type.
#[must_use]
pub fn placeholder(name: &str, ty: &EdmType) -> String {
    if is_quoted(ty) {
        format!("'{{{name}}}'")
    } else {
        format!("{{{name}}}")
    }
}

/// Only string primitives are quoted in OData URLs.
#[must_use]
pub fn is_quoted(ty: &EdmType) -> bool {
    matches!(ty, EdmType::Primitive(PrimitiveKind::String))
}

/// Key segment of an entity path: `({Id})`, `('{Id}')` or
/// `(OrderId={OrderId},Sku='{Sku}')`. `None` when the type has no key.
#[must_use]
pub fn key_segment(entity: &StructuredType) -> Option<String> {
    let keys: Vec<&Property> = entity.key_properties();
    match keys.as_slice() {
        [] => None,
        [single] => Some(format!("({})", placeholder(&single.name, &single.ty))),
        many => Some(format!(
            "({})",
            many.iter()
                .map(|k| format!("{}={}", k.name, placeholder(&k.name, &k.ty)))
                .collect::<Vec<_>>()
                .join(",")
        )),
    }
}

/// Function parameter segment: `(a={a},b='{b}')`, `()` when empty.
#[must_use]
pub fn function_parameters_segment(parameters: &[OperationParameter]) -> String {
    format!(
        "({})",
        parameters
            .iter()
            .map(|p| format!("{}={}", p.name, placeholder(&p.name, &p.ty)))
            .collect::<Vec<_>>()
            .join(",")
    )
}

/// `/{EntitySet}`
#[must_use]
pub fn entity_set_path(entity_set: &str) -> String {
    format!("/{entity_set}")
}

/// `/{EntitySet}({keys})`
#[must_use]
pub fn entity_path(entity_set: &str, entity: &StructuredType) -> Option<String> {
    key_segment(entity).map(|keys| format!("/{entity_set}{keys}"))
}
