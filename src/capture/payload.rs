use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Event properties, kept in insertion order
pub type Properties = IndexMap<String, Value>;

/// Body of a `/capture/` request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPayload {
    pub api_key: String,
    pub event: String,
    pub properties: Properties,
}

impl EventPayload {
    /// Build a payload whose properties start with `distinct_id`.
    ///
    /// Caller properties are merged afterwards, so a `distinct_id` key in
    /// `properties` replaces the base one.
    pub fn new(api_key: &str, event: &str, properties: Option<Properties>, distinct_id: &str) -> Self {
        let extra = properties.unwrap_or_default();
        let mut merged = Properties::with_capacity(extra.len() + 1);
        merged.insert("distinct_id".to_string(), Value::String(distinct_id.to_string()));
        merged.extend(extra);

        Self {
            api_key: api_key.to_string(),
            event: event.to_string(),
            properties: merged,
        }
    }

    pub fn distinct_id(&self) -> Option<&str> {
        self.properties.get("distinct_id").and_then(|v| v.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// Parse a `key=value` pair; the value is JSON when it parses, a string otherwise
pub fn parse_property(pair: &str) -> Option<(String, Value)> {
    let (key, raw) = pair.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Some((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_distinct_id_merged_with_properties() {
        let payload = EventPayload::new("abc", "signup", Some(props(json!({"plan": "pro"}))), "server_side");

        assert_eq!(
            serde_json::to_value(&payload.properties).unwrap(),
            json!({"distinct_id": "server_side", "plan": "pro"})
        );
    }

    #[test]
    fn test_caller_distinct_id_wins() {
        let payload = EventPayload::new(
            "abc",
            "signup",
            Some(props(json!({"distinct_id": "user-42"}))),
            "server_side",
        );

        assert_eq!(payload.distinct_id(), Some("user-42"));
        assert_eq!(payload.properties.len(), 1);
    }

    #[test]
    fn test_no_properties() {
        let payload = EventPayload::new("abc", "ping", None, "u1");
        assert_eq!(payload.properties.len(), 1);
        assert_eq!(payload.distinct_id(), Some("u1"));
    }

    #[test]
    fn test_distinct_id_serialized_first() {
        let mut extra = Properties::new();
        extra.insert("zeta".to_string(), json!(1));
        extra.insert("alpha".to_string(), json!(2));

        let payload = EventPayload::new("abc", "login", Some(extra), "u1");
        let body = String::from_utf8(payload.to_json().unwrap()).unwrap();

        assert_eq!(
            body,
            r#"{"api_key":"abc","event":"login","properties":{"distinct_id":"u1","zeta":1,"alpha":2}}"#
        );
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(parse_property("plan=pro"), Some(("plan".to_string(), json!("pro"))));
        assert_eq!(parse_property("seats=5"), Some(("seats".to_string(), json!(5))));
        assert_eq!(parse_property("beta=true"), Some(("beta".to_string(), json!(true))));
        assert_eq!(parse_property("tags=[\"a\"]"), Some(("tags".to_string(), json!(["a"]))));
        assert_eq!(parse_property("empty="), Some(("empty".to_string(), json!(""))));
        assert_eq!(parse_property("noequals"), None);
        assert_eq!(parse_property("=value"), None);
    }
}
