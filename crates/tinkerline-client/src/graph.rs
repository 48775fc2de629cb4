//! Graph elements decoded from untagged results.

use crate::error::{GremlinError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: Value,
    pub label: String,
}

impl Vertex {
    pub fn new(id: impl Into<Value>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// An edge with its endpoint vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawEdge", into = "RawEdge")]
pub struct Edge {
    pub id: Value,
    pub label: String,
    pub out_v: Vertex,
    pub in_v: Vertex,
}

impl Edge {
    pub fn new(id: impl Into<Value>, label: impl Into<String>, out_v: Vertex, in_v: Vertex) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            out_v,
            in_v,
        }
    }
}

// Wire shape: endpoint ids and labels are flattened into the edge.
#[derive(Serialize, Deserialize)]
struct RawEdge {
    id: Value,
    label: String,
    #[serde(rename = "outV")]
    out_v: Value,
    #[serde(rename = "outVLabel", default)]
    out_v_label: String,
    #[serde(rename = "inV")]
    in_v: Value,
    #[serde(rename = "inVLabel", default)]
    in_v_label: String,
}

impl From<RawEdge> for Edge {
    fn from(raw: RawEdge) -> Self {
        Edge {
            id: raw.id,
            label: raw.label,
            out_v: Vertex::new(raw.out_v, raw.out_v_label),
            in_v: Vertex::new(raw.in_v, raw.in_v_label),
        }
    }
}

impl From<Edge> for RawEdge {
    fn from(e: Edge) -> Self {
        RawEdge {
            id: e.id,
            label: e.label,
            out_v: e.out_v.id,
            out_v_label: e.out_v.label,
            in_v: e.in_v.id,
            in_v_label: e.in_v.label,
        }
    }
}

/// A vertex property. The wire name of `key` is `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexProperty {
    pub id: Value,
    #[serde(rename = "label")]
    pub key: String,
    pub value: Value,
}

impl VertexProperty {
    pub fn new(id: impl Into<Value>, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An edge property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: Value,
}

impl Property {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Result of a `valueMap()` step: one map per element, where property values
/// are lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueMap(pub Vec<Map<String, Value>>);

impl ValueMap {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decodes every map into a sequence target such as `Vec<T>`.
    ///
    /// Single-element value lists are flattened first, so `{"name": ["marko"]}`
    /// decodes into a `name: String` field.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let maps = self.0.iter().map(flatten).collect();
        serde_json::from_value(Value::Array(maps)).map_err(GremlinError::Decode)
    }

    /// Decodes the first map into `T`.
    pub fn decode_one<T: DeserializeOwned>(&self) -> Result<T> {
        let first = self.0.first().ok_or(GremlinError::EmptyResult)?;
        serde_json::from_value(flatten(first)).map_err(GremlinError::Decode)
    }
}

fn flatten(map: &Map<String, Value>) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::Array(vs) if vs.len() == 1 => vs[0].clone(),
                    v => v.clone(),
                };
                (k.clone(), v)
            })
            .collect(),
    )
}
