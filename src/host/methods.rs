//! Serde adapters for [`http::Method`], written as upper-case verb strings.

use http::Method;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

fn parse(verb: &str) -> Result<Method, String> {
    Method::from_bytes(verb.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{verb}'"))
}

pub mod single {
    use super::*;

    pub fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
        let verb = String::deserialize(deserializer)?;
        parse(&verb).map_err(D::Error::custom)
    }
}

pub mod list {
    use super::*;
    use serde::ser::SerializeSeq;

    pub fn serialize<S: Serializer>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(methods.len()))?;
        for method in methods {
            seq.serialize_element(method.as_str())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Method>, D::Error> {
        let verbs = Vec::<String>::deserialize(deserializer)?;
        verbs
            .iter()
            .map(|v| parse(v).map_err(D::Error::custom))
            .collect()
    }
}
