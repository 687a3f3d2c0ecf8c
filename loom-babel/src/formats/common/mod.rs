//! Common utilities for the JSON-based formats
//!
//! All three interchange formats are JSON documents. This module holds the pieces they share:
//! option parsing, JSON (de)serialization with error mapping, id generation and timestamps.

use crate::error::FormatError;
use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Output knobs shared by every JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonOptions {
    /// Indent the output instead of emitting a single line.
    pub pretty: bool,
}

impl JsonOptions {
    /// Read the shared options out of `params`.
    ///
    /// Keys other than `pretty` and the ones listed in `extra_keys` are rejected, so a typo
    /// on the command line is reported instead of being ignored.
    pub fn from_params(
        format: &str,
        params: &HashMap<String, String>,
        extra_keys: &[&str],
    ) -> Result<Self, FormatError> {
        if let Some(key) = params
            .keys()
            .find(|key| key.as_str() != "pretty" && !extra_keys.contains(&key.as_str()))
        {
            return Err(FormatError::NotSupported(format!(
                "Format '{format}' does not support parameter '{key}'"
            )));
        }

        let pretty = match params.get("pretty") {
            Some(raw) => parse_bool_param("pretty", raw)?,
            None => false,
        };
        Ok(JsonOptions { pretty })
    }
}

/// Parse a boolean parameter value the way the CLI spells them.
pub fn parse_bool_param(key: &str, raw: &str) -> Result<bool, FormatError> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(FormatError::NotSupported(format!(
            "Invalid boolean value '{other}' for parameter '{key}'"
        ))),
    }
}

/// Deserialize a document, mapping any failure to `MalformedInput`.
///
/// serde_json's recursion limit applies, so absurdly nested input is reported rather than
/// exhausting the stack. Formats that nest once per tree level use [`from_deep_json`].
pub fn from_json<T: DeserializeOwned>(source: &str) -> Result<T, FormatError> {
    serde_json::from_str(source).map_err(FormatError::from_decode)
}

/// Deserialize a document whose nesting follows the depth of the tree.
///
/// The recursion limit is lifted and `serde_stacker` moves the recursion onto heap-allocated
/// stack segments, so a generation chain of any length decodes.
pub fn from_deep_json<T: DeserializeOwned>(source: &str) -> Result<T, FormatError> {
    let mut deserializer = serde_json::Deserializer::from_str(source);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut deserializer))
        .map_err(FormatError::from_decode)?;
    deserializer.end().map_err(FormatError::from_decode)?;
    Ok(value)
}

/// [`from_deep_json`] for a value that has already been parsed.
pub fn from_deep_value<T: DeserializeOwned>(value: Value) -> Result<T, FormatError> {
    T::deserialize(serde_stacker::Deserializer::new(value)).map_err(FormatError::from_decode)
}

/// The top level of a JSON object with every member reduced to its kind.
///
/// Objects become `{}`, arrays `[]` and scalars `null`. This is all content sniffing looks
/// at, and it keeps a deeply nested document from being materialized as a [`Value`] just to
/// read its outermost keys. Returns None when the source is not a JSON object.
pub fn json_outline(source: &str) -> Option<Value> {
    let members: Map<String, Value> = from_deep_json::<HashMap<String, Shape>>(source)
        .ok()?
        .into_iter()
        .map(|(key, Shape(kind))| (key, kind))
        .collect();
    Some(Value::Object(members))
}

/// Kind of a JSON value, with its contents skipped.
struct Shape(Value);

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ShapeVisitor).map(Shape)
    }
}

struct ShapeVisitor;

impl<'de> Visitor<'de> for ShapeVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Value::Array(Vec::new()))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Value::Object(Map::new()))
    }
}

/// Serialize a document, compact or indented.
///
/// Runs through `serde_stacker` so deeply nested documents serialize without overflowing.
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, FormatError> {
    let mut buffer = Vec::new();
    let result = if pretty {
        let mut serializer = serde_json::Serializer::pretty(&mut buffer);
        value.serialize(serde_stacker::Serializer::new(&mut serializer))
    } else {
        let mut serializer = serde_json::Serializer::new(&mut buffer);
        value.serialize(serde_stacker::Serializer::new(&mut serializer))
    };
    result.map_err(FormatError::from_encode)?;
    String::from_utf8(buffer).map_err(|err| FormatError::SerializationError(err.to_string()))
}

/// A fresh random identifier (UUID v4, hyphenated).
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

/// Milliseconds since the Unix epoch, as stored in `lastVisited` and friends.
pub fn epoch_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}
