//! Mutable description of a single outgoing request.
//!
//! # Design
//! `RequestContext` is built once per request, configured through chained
//! `&mut self` setters, then read by the transport. It performs no I/O. Two
//! values are derived at read time rather than stored:
//! - the request URI, which appends the encoded request parameters;
//! - the `content-type` header, synthesized from `content_type` and
//!   `charset` only when the caller has not set one.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::defaults::RequestDefaults;
use crate::error::RequestError;
use crate::headers::Headers;
use crate::http::{HttpMethod, HttpRequest};
use crate::query;

const CONTENT_TYPE: &str = "content-type";

/// Method, URI, headers, payload and transport settings for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    uri: String,
    method: HttpMethod,
    headers: Headers,
    data: Value,
    request_parameters: Map<String, Value>,
    transport_options: BTreeMap<String, Value>,
    content_type: String,
    charset: String,
    connection_timeout: u64,
    timeout: u64,
    proxy: Option<String>,
    proxy_script: Option<String>,
}

impl RequestContext {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::with_defaults(uri, &RequestDefaults::default())
    }

    pub fn with_defaults(uri: impl Into<String>, defaults: &RequestDefaults) -> Self {
        Self {
            uri: uri.into(),
            method: HttpMethod::default(),
            headers: Headers::new(),
            data: Value::Null,
            request_parameters: Map::new(),
            transport_options: BTreeMap::new(),
            content_type: defaults.content_type.clone(),
            charset: defaults.charset.clone(),
            connection_timeout: defaults.connection_timeout,
            timeout: defaults.timeout,
            proxy: None,
            proxy_script: None,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn set_method(&mut self, method: HttpMethod) -> &mut Self {
        debug!("request method set to {method}");
        self.method = method;
        self
    }

    /// Set the method by name. Names are matched case-sensitively against
    /// the nine supported methods.
    pub fn set_method_name(&mut self, name: &str) -> Result<&mut Self, RequestError> {
        let method = name.parse::<HttpMethod>().inspect_err(|_| {
            warn!("rejected request method {name:?}");
        })?;
        Ok(self.set_method(method))
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) -> &mut Self {
        self.uri = uri.into();
        debug!("request uri set to {}", self.uri);
        self
    }

    /// The URI with request parameters appended as a query string.
    pub fn request_uri(&self) -> String {
        query::append_query(&self.uri, &self.request_parameters)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    pub fn set_header(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.headers.set(name, value);
        self
    }

    /// Merge headers into the current set, overwriting matching names.
    pub fn set_headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.headers.merge(headers);
        self
    }

    /// Headers as the transport should send them.
    ///
    /// Adds `content-type: {content_type}; charset={charset}` when no content
    /// type header was set explicitly. The stored headers are not modified.
    pub fn request_headers(&self) -> Headers {
        let mut headers = self.headers.clone();
        if !headers.has(CONTENT_TYPE) && !self.content_type.is_empty() {
            let value = if self.charset.is_empty() {
                self.content_type.clone()
            } else {
                format!("{}; charset={}", self.content_type, self.charset)
            };
            debug!("synthesized content-type header: {value}");
            headers.set(CONTENT_TYPE, value);
        }
        headers
    }

    /// Request body payload. `Value::Null` means no body.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn set_data(&mut self, data: impl Into<Value>) -> &mut Self {
        self.data = data.into();
        self
    }

    pub fn request_parameters(&self) -> &Map<String, Value> {
        &self.request_parameters
    }

    /// Replace all request parameters.
    pub fn set_request_parameters(&mut self, params: Map<String, Value>) -> &mut Self {
        self.request_parameters = params;
        self
    }

    /// Insert or overwrite a single request parameter. New keys go last.
    pub fn set_request_parameter(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.request_parameters.insert(key.into(), value.into());
        self
    }

    pub fn transport_options(&self) -> &BTreeMap<String, Value> {
        &self.transport_options
    }

    /// Add or overwrite one transport option, keeping the others.
    pub fn set_transport_option(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.transport_options.insert(key.into(), value.into());
        self
    }

    /// Replace the whole transport option bag.
    pub fn set_transport_options(&mut self, options: BTreeMap<String, Value>) -> &mut Self {
        self.transport_options = options;
        self
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.content_type = content_type.into();
        self
    }

    pub fn charset(&self) -> &str {
        &self.charset
    }

    pub fn set_charset(&mut self, charset: impl Into<String>) -> &mut Self {
        self.charset = charset.into();
        self
    }

    pub fn connection_timeout(&self) -> u64 {
        self.connection_timeout
    }

    pub fn set_connection_timeout(&mut self, seconds: u64) -> &mut Self {
        self.connection_timeout = seconds;
        self
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn set_timeout(&mut self, seconds: u64) -> &mut Self {
        self.timeout = seconds;
        self
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn set_proxy(&mut self, proxy: impl Into<String>) -> &mut Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn proxy_script(&self) -> Option<&str> {
        self.proxy_script.as_deref()
    }

    pub fn set_proxy_script(&mut self, script: impl Into<String>) -> &mut Self {
        self.proxy_script = Some(script.into());
        self
    }

    /// Snapshot everything a transport needs to execute this request.
    pub fn to_http_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.method,
            uri: self.request_uri(),
            headers: self.request_headers().into(),
            body: render_body(&self.data),
            connection_timeout: self.connection_timeout,
            timeout: self.timeout,
            proxy: self.proxy.clone(),
            proxy_script: self.proxy_script.clone(),
            transport_options: self.transport_options.clone(),
        }
    }
}

/// Strings are sent verbatim, structured values as compact JSON.
fn render_body(data: &Value) -> Option<String> {
    match data {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
