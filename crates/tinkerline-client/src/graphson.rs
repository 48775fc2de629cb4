//! Decoding of GraphSON type-tagged values into plain JSON.
//!
//! A tagged value is `{"@type": "g:Int64", "@value": 1}`. Untagging keeps the
//! payload and drops the tag, except for the container types whose payload
//! encoding differs from their plain JSON shape:
//!
//! - `g:Map` holds a flat `[k1, v1, k2, v2, ...]` list and becomes an object.
//!   Keys that are not strings after untagging are rendered as JSON text.
//! - `g:BulkSet` holds `[item, count, ...]` pairs and becomes a list with each
//!   item repeated `count` times.
//!
//! Bulk set expansion is the only place where output outgrows input, so the
//! total size it may add to one value is capped at [`MAX_EXPANDED_SIZE`].

use crate::error::{GremlinError, Result};
use crate::http::MAX_RESPONSE_SIZE;
use serde_json::{Map, Value};

const TYPE_KEY: &str = "@type";
const VALUE_KEY: &str = "@value";

/// Upper bound on the size added by `g:BulkSet` expansion within one value,
/// measured as JSON nodes plus string bytes.
pub const MAX_EXPANDED_SIZE: usize = MAX_RESPONSE_SIZE;

/// Removes GraphSON type tags, recursively.
///
/// Fails when a `g:BulkSet` count is not a non-negative integer or when the
/// expanded bulk sets would exceed [`MAX_EXPANDED_SIZE`].
pub fn untag(value: Value) -> Result<Value> {
    Untagger {
        budget: MAX_EXPANDED_SIZE,
    }
    .untag(value)
}

struct Untagger {
    // Remaining size bulk sets may add.
    budget: usize,
}

impl Untagger {
    fn untag(&mut self, value: Value) -> Result<Value> {
        match value {
            Value::Object(mut obj) if is_tagged(&obj) => {
                let tag = match obj.remove(TYPE_KEY) {
                    Some(Value::String(tag)) => tag,
                    _ => String::new(),
                };
                let payload = obj.remove(VALUE_KEY).unwrap_or(Value::Null);
                self.untag_payload(&tag, payload)
            }
            Value::Object(obj) => obj
                .into_iter()
                .map(|(k, v)| Ok((k, self.untag(v)?)))
                .collect::<Result<Map<_, _>>>()
                .map(Value::Object),
            Value::Array(items) => self.untag_all(items).map(Value::Array),
            other => Ok(other),
        }
    }

    fn untag_all(&mut self, items: Vec<Value>) -> Result<Vec<Value>> {
        items.into_iter().map(|v| self.untag(v)).collect()
    }

    fn untag_payload(&mut self, tag: &str, payload: Value) -> Result<Value> {
        match (tag, payload) {
            ("g:Map", Value::Array(items)) => self.untag_map(items).map(Value::Object),
            ("g:BulkSet", Value::Array(items)) => self.untag_bulk_set(items).map(Value::Array),
            (_, payload) => self.untag(payload),
        }
    }

    fn untag_map(&mut self, items: Vec<Value>) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        let mut items = items.into_iter();
        while let Some(key) = items.next() {
            let value = match items.next() {
                Some(v) => self.untag(v)?,
                None => Value::Null,
            };
            let key = match self.untag(key)? {
                Value::String(s) => s,
                other => other.to_string(),
            };
            map.insert(key, value);
        }
        Ok(map)
    }

    fn untag_bulk_set(&mut self, items: Vec<Value>) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        let mut items = items.into_iter();
        while let Some(item) = items.next() {
            let item = self.untag(item)?;
            let count = match items.next() {
                Some(c) => match self.untag(c)? {
                    Value::Number(n) => n.as_u64().ok_or_else(|| {
                        GremlinError::UnexpectedValue(format!("bulk set count {n}"))
                    })?,
                    other => {
                        return Err(GremlinError::UnexpectedValue(format!(
                            "bulk set count {other}"
                        )))
                    }
                },
                None => 1,
            };
            let too_large = || {
                GremlinError::UnexpectedValue(format!(
                    "bulk set expands beyond {MAX_EXPANDED_SIZE}"
                ))
            };
            let count = usize::try_from(count).map_err(|_| too_large())?;
            let cost = count
                .checked_mul(weight(&item))
                .filter(|&cost| cost <= self.budget)
                .ok_or_else(too_large)?;
            self.budget -= cost;
            out.extend(std::iter::repeat(item).take(count));
        }
        Ok(out)
    }
}

fn is_tagged(obj: &Map<String, Value>) -> bool {
    obj.len() == 2
        && obj.get(TYPE_KEY).is_some_and(Value::is_string)
        && obj.contains_key(VALUE_KEY)
}

// JSON nodes plus string bytes; never zero.
fn weight(value: &Value) -> usize {
    match value {
        Value::String(s) => 1 + s.len(),
        Value::Array(items) => 1 + items.iter().map(weight).sum::<usize>(),
        Value::Object(obj) => {
            1 + obj
                .iter()
                .map(|(k, v)| k.len() + weight(v))
                .sum::<usize>()
        }
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_unwrap() {
        assert_eq!(untag(json!({"@type": "g:Int32", "@value": 15})).unwrap(), json!(15));
        assert_eq!(untag(json!({"@type": "g:Double", "@value": 0.2})).unwrap(), json!(0.2));
        assert_eq!(
            untag(json!({"@type": "g:UUID", "@value": "41d2e28a-20a4-4ab0-b379-d810dede3786"}))
                .unwrap(),
            json!("41d2e28a-20a4-4ab0-b379-d810dede3786")
        );
        assert_eq!(untag(json!("plain")).unwrap(), json!("plain"));
    }

    #[test]
    fn test_list_and_set() {
        let list = json!({"@type": "g:List", "@value": [{"@type": "g:Int64", "@value": 1}, "a"]});
        assert_eq!(untag(list).unwrap(), json!([1, "a"]));

        let set = json!({"@type": "g:Set", "@value": [true]});
        assert_eq!(untag(set).unwrap(), json!([true]));
    }

    #[test]
    fn test_map_with_token_keys() {
        let map = json!({
            "@type": "g:Map",
            "@value": [
                {"@type": "g:T", "@value": "id"}, {"@type": "g:Int64", "@value": 1},
                "name", {"@type": "g:List", "@value": ["marko"]},
                {"@type": "g:Int32", "@value": 7}, "seven"
            ]
        });
        assert_eq!(untag(map).unwrap(), json!({"id": 1, "name": ["marko"], "7": "seven"}));
    }

    #[test]
    fn test_empty_map() {
        assert_eq!(untag(json!({"@type": "g:Map", "@value": []})).unwrap(), json!({}));
    }

    #[test]
    fn test_bulk_set_expands_counts() {
        let bulk = json!({
            "@type": "g:BulkSet",
            "@value": ["a", {"@type": "g:Int64", "@value": 2}, "b", {"@type": "g:Int64", "@value": 1}]
        });
        assert_eq!(untag(bulk).unwrap(), json!(["a", "a", "b"]));
    }

    #[test]
    fn test_element_payload_is_untagged() {
        let vertex = json!({
            "@type": "g:Vertex",
            "@value": {"id": {"@type": "g:Int64", "@value": 1}, "label": "person"}
        });
        assert_eq!(untag(vertex).unwrap(), json!({"id": 1, "label": "person"}));
    }

    #[test]
    fn test_untagged_object_fields_are_untagged() {
        let obj = json!({"count": {"@type": "g:Int64", "@value": 3}, "@type": "note"});
        assert_eq!(untag(obj).unwrap(), json!({"count": 3, "@type": "note"}));
    }

    #[test]
    fn test_bulk_set_with_huge_count_is_rejected() {
        let bulk = json!({
            "@type": "g:BulkSet",
            "@value": ["x", {"@type": "g:Int64", "@value": 9_000_000_000_000_000u64}]
        });
        assert!(matches!(untag(bulk), Err(GremlinError::UnexpectedValue(_))));
    }

    #[test]
    fn test_bulk_set_budget_is_shared_across_entries() {
        // Each entry alone fits; together they exceed the cap.
        let half = MAX_EXPANDED_SIZE / 2 / 2 + 1;
        let bulk = json!({
            "@type": "g:BulkSet",
            "@value": ["x", half, "y", half]
        });
        assert!(matches!(untag(bulk), Err(GremlinError::UnexpectedValue(_))));
    }

    #[test]
    fn test_bulk_set_cost_scales_with_item_size() {
        let item = "a".repeat(1024);
        let bulk = json!({"@type": "g:BulkSet", "@value": [item, 4096]});
        assert!(matches!(untag(bulk), Err(GremlinError::UnexpectedValue(_))));
    }

    #[test]
    fn test_bulk_set_count_must_be_an_integer() {
        for count in [json!("2"), json!(-1), json!(1.5), json!(null)] {
            let bulk = json!({"@type": "g:BulkSet", "@value": ["a", count]});
            assert!(
                matches!(untag(bulk), Err(GremlinError::UnexpectedValue(_))),
                "count {count} accepted"
            );
        }
    }

    #[test]
    fn test_bulk_set_trailing_item_counts_once() {
        let bulk = json!({"@type": "g:BulkSet", "@value": ["a", 2, "b"]});
        assert_eq!(untag(bulk).unwrap(), json!(["a", "a", "b"]));
    }
}
