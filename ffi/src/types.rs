//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use reqctx_core::{HttpMethod, HttpRequest, RequestError};

/// Opaque handle to a `RequestContext`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiRequestContext {
    pub(crate) inner: reqctx_core::RequestContext,
}

// ---------------------------------------------------------------------------
// Status codes
// ---------------------------------------------------------------------------

/// Outcome of a setter call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidMethod = 1,
    InvalidJson = 2,
    InvalidUtf8 = 3,
    NullArg = 4,
    Panic = 5,
    /// A string value contains a NUL byte and cannot be handed back as a C string.
    InteriorNul = 6,
}

impl From<RequestError> for FfiErrorCode {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::InvalidMethod(_) => FfiErrorCode::InvalidMethod,
            RequestError::InvalidDefaults(_) => FfiErrorCode::InvalidJson,
        }
    }
}

impl From<serde_json::Error> for FfiErrorCode {
    fn from(_: serde_json::Error) -> Self {
        FfiErrorCode::InvalidJson
    }
}

// ---------------------------------------------------------------------------
// Request snapshot
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Options = 0,
    Get = 1,
    Head = 2,
    Post = 3,
    Put = 4,
    Delete = 5,
    Trace = 6,
    Connect = 7,
    Patch = 8,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Options => FfiHttpMethod::Options,
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Head => FfiHttpMethod::Head,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
            HttpMethod::Trace => FfiHttpMethod::Trace,
            HttpMethod::Connect => FfiHttpMethod::Connect,
            HttpMethod::Patch => FfiHttpMethod::Patch,
        }
    }
}

/// A single HTTP header as a name-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub name: *mut c_char,
    pub value: *mut c_char,
}

/// A request described as C-compatible plain data.
///
/// Built by `reqctx_build_request`. `uri` already carries the query string
/// and `headers` the synthesized content type. `method_name` is the
/// upper-case method for `CURLOPT_CUSTOMREQUEST`. Optional strings are null
/// when unset. `transport_options_json` is a JSON object of option name to
/// value.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub method_name: *mut c_char,
    pub uri: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
    pub connection_timeout: u64,
    pub timeout: u64,
    pub proxy: *mut c_char,
    pub proxy_script: *mut c_char,
    pub transport_options_json: *mut c_char,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Returns null if the header count does not fit in `headers_len`.
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let Some(headers_len) = c_len(req.headers.len()) else {
            return std::ptr::null_mut();
        };
        let options = serde_json::to_string(&req.transport_options).unwrap_or_else(|_| "{}".to_string());

        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Vec<FfiHeader> = req
                .headers
                .into_iter()
                .map(|(name, value)| FfiHeader {
                    name: into_c_string(name),
                    value: into_c_string(value),
                })
                .collect();
            // Exact capacity so the free path can rebuild it with len == cap.
            Box::into_raw(ffi_headers.into_boxed_slice()) as *mut FfiHeader
        };

        let ffi_req = Box::new(FfiHttpRequest {
            method: req.method.into(),
            method_name: into_c_string(req.method.as_str().to_string()),
            uri: into_c_string(req.uri),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), into_c_string),
            connection_timeout: req.connection_timeout,
            timeout: req.timeout,
            proxy: req.proxy.map_or(std::ptr::null_mut(), into_c_string),
            proxy_script: req.proxy_script.map_or(std::ptr::null_mut(), into_c_string),
            transport_options_json: into_c_string(options),
        });
        Box::into_raw(ffi_req)
    }
}

/// Length of a Rust buffer as the `u32` the C structs carry.
pub(crate) fn c_len(len: usize) -> Option<u32> {
    u32::try_from(len).ok()
}

/// Hand a Rust string to C. Strings with interior NUL bytes become null.
pub(crate) fn into_c_string(s: String) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}

/// Reclaim a string produced by `into_c_string`. Null is ignored.
pub(crate) fn free_c_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}
