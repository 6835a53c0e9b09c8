//! Default request settings.
//!
//! # Design
//! Hosts that build many requests against the same service usually share a
//! content type, charset and timeout policy. `RequestDefaults` carries those
//! values and can be loaded from a JSON document; missing fields fall back to
//! the built-in defaults.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Settings a new `RequestContext` starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub content_type: String,
    pub charset: String,
    /// Seconds allowed for establishing the connection.
    pub connection_timeout: u64,
    /// Seconds allowed for the whole exchange.
    pub timeout: u64,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            content_type: "text/plain".to_string(),
            charset: "UTF-8".to_string(),
            connection_timeout: 5,
            timeout: 10,
        }
    }
}

impl RequestDefaults {
    /// Parse defaults from JSON, e.g. `{"charset": "ISO-8859-1", "timeout": 30}`.
    pub fn from_json(json: &str) -> Result<Self, RequestError> {
        serde_json::from_str(json).map_err(|e| RequestError::InvalidDefaults(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults() {
        let d = RequestDefaults::default();
        assert_eq!(d.content_type, "text/plain");
        assert_eq!(d.charset, "UTF-8");
        assert_eq!(d.connection_timeout, 5);
        assert_eq!(d.timeout, 10);
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let d = RequestDefaults::from_json(r#"{"charset":"ISO-8859-1","timeout":30}"#).unwrap();
        assert_eq!(d.charset, "ISO-8859-1");
        assert_eq!(d.timeout, 30);
        assert_eq!(d.content_type, "text/plain");
        assert_eq!(d.connection_timeout, 5);
    }

    #[test]
    fn bad_json_is_reported() {
        let err = RequestDefaults::from_json(r#"{"timeout":"soon"}"#).unwrap_err();
        assert!(matches!(err, RequestError::InvalidDefaults(_)));
    }
}
