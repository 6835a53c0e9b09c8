//! Query string encoding for request parameters.
//!
//! Parameters are `application/x-www-form-urlencoded`: spaces become `+`,
//! booleans become `1`/`0`, `null` entries are dropped. Arrays and objects
//! expand into bracketed keys (`tags[0]=a`, `filter[name]=b`) and the
//! brackets are percent-encoded along with every other reserved byte.

use serde_json::{Map, Value};
use url::form_urlencoded::byte_serialize;

/// Encode `params` as a query string, without a leading `?`.
pub fn build_query(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();
    for (key, value) in params {
        collect_pairs(key.clone(), value, &mut pairs);
    }
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append the encoded `params` to `uri`, using `&` when `uri` already has a
/// query component. Returns `uri` untouched when there is nothing to append.
pub fn append_query(uri: &str, params: &Map<String, Value>) -> String {
    let query = build_query(params);
    if query.is_empty() {
        return uri.to_string();
    }
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}{query}")
}

fn collect_pairs(key: String, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => out.push((key, n.to_string())),
        Value::String(s) => out.push((key, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_pairs(format!("{key}[{i}]"), item, out);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                collect_pairs(format!("{key}[{sub}]"), item, out);
            }
        }
    }
}

fn encode(s: &str) -> String {
    byte_serialize(s.as_bytes()).collect()
}
