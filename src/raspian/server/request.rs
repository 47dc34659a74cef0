// SPDX-License-Identifier: MIT

//! Normalization of `/invoke` request bodies.
//!
//! Clients in the wild send several shapes for the same call. All of them are
//! folded into one [`Invocation`] before reaching the registry:
//!
//! | tool name            | parameters                                  |
//! |----------------------|---------------------------------------------|
//! | `tool: "blogpost"`   | `parameters: {..}`                          |
//! | `name: "blogpost"`   | `args: {..}`                                |
//! | `tool: {name: ..}`   | `tool.parameters: {..}` / `tool.args: {..}` |
//!
//! Top-level parameters win over nested ones. Missing parameters become `{}`.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestShapeError {
    #[error("Request body must be a JSON object.")]
    NotAnObject,

    #[error("Missing 'tool' name in request.")]
    MissingTool,

    #[error("'{0}' must be a JSON object.")]
    InvalidParameters(&'static str),
}

/// A tool call in the one shape the registry understands
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub tool: String,
    pub parameters: Value,
}

impl Invocation {
    pub fn from_value(value: Value) -> Result<Self, RequestShapeError> {
        let Value::Object(mut body) = value else {
            return Err(RequestShapeError::NotAnObject);
        };

        let nested = match body.remove("tool") {
            Some(Value::String(name)) => Nested::Name(name),
            Some(Value::Object(tool)) => Nested::Object(tool),
            _ => Nested::Absent,
        };

        let tool = match &nested {
            Nested::Name(name) => Some(name.clone()),
            Nested::Object(tool) => tool.get("name").and_then(Value::as_str).map(String::from),
            Nested::Absent => None,
        }
        .or_else(|| body.get("name").and_then(Value::as_str).map(String::from))
        .filter(|name| !name.is_empty())
        .ok_or(RequestShapeError::MissingTool)?;

        let mut parameters = take_object(&mut body, "parameters", "parameters")?;
        if parameters.is_none() {
            parameters = take_object(&mut body, "args", "args")?;
        }
        if parameters.is_none() {
            if let Nested::Object(mut tool) = nested {
                parameters = take_object(&mut tool, "parameters", "tool.parameters")?;
                if parameters.is_none() {
                    parameters = take_object(&mut tool, "args", "tool.args")?;
                }
            }
        }

        Ok(Self {
            tool,
            parameters: Value::Object(parameters.unwrap_or_default()),
        })
    }
}

enum Nested {
    Name(String),
    Object(Map<String, Value>),
    Absent,
}

/// Remove `key` from `map`, requiring an object when present. `null` counts as absent.
fn take_object(
    map: &mut Map<String, Value>,
    key: &str,
    label: &'static str,
) -> Result<Option<Map<String, Value>>, RequestShapeError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(object)) => Ok(Some(object)),
        Some(_) => Err(RequestShapeError::InvalidParameters(label)),
    }
}
