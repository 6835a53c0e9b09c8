//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! `HttpMethod` is the closed set of methods a request may use. Parsing a
//! method name is the only validation step in the crate and it is
//! case-sensitive: `"get"` and `"gET"` are rejected.
//!
//! `HttpRequest` is the plain-data snapshot a transport consumes. It is built
//! from a `RequestContext` and never touches the network; the caller executes
//! it with whatever client it has (libcurl, ureq, ...).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Options,
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Trace,
    Connect,
    Patch,
}

impl HttpMethod {
    /// Every supported method, in declaration order.
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Options,
        HttpMethod::Get,
        HttpMethod::Head,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Trace,
        HttpMethod::Connect,
        HttpMethod::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RequestError::InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Produced by `RequestContext::to_http_request`. `uri` already carries the
/// encoded query string and `headers` already carries the synthesized
/// content type, so a transport can send it as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Seconds allowed for establishing the connection.
    pub connection_timeout: u64,
    /// Seconds allowed for the whole exchange.
    pub timeout: u64,
    pub proxy: Option<String>,
    pub proxy_script: Option<String>,
    pub transport_options: BTreeMap<String, Value>,
}
