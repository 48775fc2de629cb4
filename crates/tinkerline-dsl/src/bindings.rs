use crate::node::Literal;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Bindings associate generated variable names with values.
///
/// Names are allocated as `"$" + hex(len)`, so iteration order is allocation
/// order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(IndexMap<String, Value>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value and returns its generated name.
    ///
    /// Timestamps are stored as epoch nanoseconds; the script engine cannot
    /// bind structured temporal values.
    pub fn add(&mut self, literal: Literal) -> String {
        let key = format!("${:x}", self.0.len());
        let value = match literal {
            Literal::Value(v) => v,
            Literal::Time(t) => Value::from(unix_nanos(&t)),
        };
        self.0.insert(key.clone(), value);
        key
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.0
    }
}

// Out-of-range instants saturate.
fn unix_nanos(t: &DateTime<Utc>) -> i64 {
    t.timestamp_nanos_opt().unwrap_or(if t.timestamp() < 0 {
        i64::MIN
    } else {
        i64::MAX
    })
}

impl IntoIterator for Bindings {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Bindings> for serde_json::Map<String, Value> {
    fn from(b: Bindings) -> Self {
        b.0.into_iter().collect()
    }
}
