//! Request messages and SASL PLAIN credentials.

use crate::error::{GremlinError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use uuid::Uuid;

/// Script evaluation operation.
pub const OP_EVAL: &str = "eval";
/// SASL authentication operation.
pub const OP_AUTHENTICATION: &str = "authentication";

/// Script argument.
pub const ARGS_GREMLIN: &str = "gremlin";
/// Script language argument.
pub const ARGS_LANGUAGE: &str = "language";
/// Bindings argument.
pub const ARGS_BINDINGS: &str = "bindings";
/// Evaluation timeout hint, in milliseconds.
pub const ARGS_EVAL_TIMEOUT: &str = "scriptEvaluationTimeout";
/// SASL response argument.
pub const ARGS_SASL: &str = "sasl";
/// SASL mechanism argument.
pub const ARGS_SASL_MECHANISM: &str = "saslMechanism";

pub const LANGUAGE_GREMLIN_GROOVY: &str = "gremlin-groovy";
pub const SASL_MECHANISM_PLAIN: &str = "PLAIN";

/// A request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "op")]
    pub operation: String,
    pub processor: String,
    #[serde(rename = "args")]
    pub arguments: Map<String, Value>,
}

impl Request {
    /// Request with a fresh id and no arguments.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            operation: operation.into(),
            processor: String::new(),
            arguments: Map::new(),
        }
    }

    /// Script evaluation request.
    pub fn eval(script: impl Into<String>) -> Self {
        Self::new(OP_EVAL)
            .with_argument(ARGS_GREMLIN, script.into())
            .with_argument(ARGS_LANGUAGE, LANGUAGE_GREMLIN_GROOVY)
    }

    /// Response to a SASL challenge, reusing the challenged request id.
    pub fn auth(request_id: impl Into<String>, username: &str, password: &str) -> Self {
        let credentials = Credentials::new(username, password);
        let mut req = Self::new(OP_AUTHENTICATION)
            .with_argument(ARGS_SASL, credentials.encode())
            .with_argument(ARGS_SASL_MECHANISM, SASL_MECHANISM_PLAIN);
        req.request_id = request_id.into();
        req
    }

    /// Sets or overwrites an argument.
    pub fn with_argument(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.to_string(), value.into());
        self
    }

    /// Sets the script bindings.
    pub fn with_bindings<I, K, V>(self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let bindings: Map<String, Value> = bindings
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.with_argument(ARGS_BINDINGS, Value::Object(bindings))
    }

    /// Sets the evaluation timeout hint. The server enforces it; no local
    /// deadline is set.
    pub fn with_eval_timeout(self, timeout: Duration) -> Self {
        let millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.with_argument(ARGS_EVAL_TIMEOUT, millis)
    }

    /// The script text, if present and a string.
    pub fn script(&self) -> Option<&str> {
        self.arguments.get(ARGS_GREMLIN).and_then(Value::as_str)
    }

    /// The bindings, if present and an object.
    pub fn bindings(&self) -> Option<&Map<String, Value>> {
        self.arguments.get(ARGS_BINDINGS).and_then(Value::as_object)
    }
}

/// SASL PLAIN credentials, encoded as base64 of `authzid NUL user NUL pass`
/// with an empty authorization identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(format!("\0{}\0{}", self.username, self.password))
    }

    /// Decodes a base64 SASL PLAIN response. The payload must hold exactly
    /// three NUL-separated parts.
    pub fn decode(text: &str) -> Result<Self> {
        let raw = STANDARD
            .decode(text)
            .map_err(|e| GremlinError::Credentials(e.to_string()))?;
        let raw = String::from_utf8(raw).map_err(|e| GremlinError::Credentials(e.to_string()))?;
        let parts: Vec<&str> = raw.split('\0').collect();
        match parts.as_slice() {
            [_authzid, username, password] => Ok(Self::new(*username, *password)),
            _ => Err(GremlinError::Credentials(format!(
                "expected 3 NUL separated parts, got {}",
                parts.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_eval_request() {
        let req = Request::eval("g.V($0)")
            .with_bindings([("$0", 1)])
            .with_eval_timeout(Duration::from_secs(2));

        assert_eq!(req.operation, OP_EVAL);
        assert_eq!(req.processor, "");
        assert_eq!(req.script(), Some("g.V($0)"));
        assert_eq!(req.arguments[ARGS_LANGUAGE], json!("gremlin-groovy"));
        assert_eq!(req.arguments[ARGS_BINDINGS], json!({"$0": 1}));
        assert_eq!(req.arguments[ARGS_EVAL_TIMEOUT], json!(2000));
        assert!(Uuid::parse_str(&req.request_id).is_ok());
    }

    #[test]
    fn test_request_ids_are_fresh() {
        assert_ne!(Request::eval("g").request_id, Request::eval("g").request_id);
    }

    #[test]
    fn test_wire_shape() {
        let mut req = Request::eval("g.V()");
        req.request_id = "id".to_string();

        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "requestId": "id",
                "op": "eval",
                "processor": "",
                "args": {"gremlin": "g.V()", "language": "gremlin-groovy"}
            })
        );
    }

    #[test]
    fn test_auth_request() {
        let req = Request::auth("41d2e28a", "user", "pass");

        assert_eq!(req.request_id, "41d2e28a");
        assert_eq!(req.operation, OP_AUTHENTICATION);
        assert_eq!(req.arguments[ARGS_SASL], json!("AHVzZXIAcGFzcw=="));
        assert_eq!(req.arguments[ARGS_SASL_MECHANISM], json!("PLAIN"));
    }

    #[test]
    fn test_credentials_decode() {
        let creds = Credentials::decode("AHVzZXIAcGFzcw==").unwrap();
        assert_eq!(creds, Credentials::new("user", "pass"));
    }

    #[test]
    fn test_credentials_decode_rejects_wrong_part_count() {
        let text = STANDARD.encode("user\0pass");
        assert!(matches!(
            Credentials::decode(&text),
            Err(GremlinError::Credentials(_))
        ));
    }

    #[test]
    fn test_credentials_decode_rejects_bad_base64() {
        assert!(Credentials::decode("not base64!").is_err());
    }
}
