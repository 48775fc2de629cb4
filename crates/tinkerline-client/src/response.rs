//! Response messages and typed result readers.

use crate::error::{GremlinError, Result};
use crate::graph::{Edge, Property, ValueMap, Vertex, VertexProperty};
use crate::graphson;
use crate::status::StatusCode;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A response message.
///
/// `data` is kept as received; readers untag it on demand. `attributes` and
/// `meta` are untagged while decoding. A `null` status or result decodes as
/// its default, which is a failure status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "requestId", default, deserialize_with = "nullable")]
    pub request_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: Status,
    #[serde(default, deserialize_with = "nullable")]
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "nullable")]
    pub code: StatusCode,
    #[serde(default, deserialize_with = "untagged_map")]
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub data: Value,
    #[serde(default, deserialize_with = "untagged_map")]
    pub meta: Map<String, Value>,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn untagged_map<'de, D>(deserializer: D) -> std::result::Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match graphson::untag(Value::deserialize(deserializer)?).map_err(D::Error::custom)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

impl Response {
    /// Whether the status is in the failure family.
    pub fn is_err(&self) -> bool {
        self.status.code.is_err()
    }

    /// Returns the server failure carried by the status, if any.
    pub fn err(&self) -> Result<()> {
        if self.is_err() {
            Err(GremlinError::Status {
                code: self.status.code,
                message: self.status.message.clone(),
            })
        } else {
            Ok(())
        }
    }

    /// Decodes the result data into `T`.
    pub fn read_val<T: DeserializeOwned>(&self) -> Result<T> {
        self.err()?;
        let data = graphson::untag(self.result.data.clone())?;
        serde_json::from_value(data).map_err(GremlinError::Decode)
    }

    pub fn read_vertices(&self) -> Result<Vec<Vertex>> {
        self.read_val()
    }

    pub fn read_vertex_properties(&self) -> Result<Vec<VertexProperty>> {
        self.read_val()
    }

    pub fn read_edges(&self) -> Result<Vec<Edge>> {
        self.read_val()
    }

    pub fn read_properties(&self) -> Result<Vec<Property>> {
        self.read_val()
    }

    pub fn read_value_map(&self) -> Result<ValueMap> {
        self.read_val()
    }

    /// First value of the result, as a bool.
    pub fn read_bool(&self) -> Result<bool> {
        self.read_first()
    }

    /// First value of the result, as an integer.
    pub fn read_int(&self) -> Result<i64> {
        self.read_first()
    }

    /// First value of the result, as a string.
    pub fn read_string(&self) -> Result<String> {
        self.read_first()
    }

    // Scalar results arrive as a one-or-more element list.
    fn read_first<T: DeserializeOwned>(&self) -> Result<T> {
        let values: Vec<Value> = self.read_val()?;
        match values.into_iter().next() {
            None => Err(GremlinError::EmptyResult),
            Some(Value::Null) => Err(GremlinError::UnexpectedValue("null".to_string())),
            Some(first) => serde_json::from_value(first.clone())
                .map_err(|e| GremlinError::UnexpectedValue(format!("{first}: {e}"))),
        }
    }
}
