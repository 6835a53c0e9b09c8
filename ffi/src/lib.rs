//! C-ABI wrapper around `reqctx-core`.
//!
//! # Overview
//! Exposes `RequestContext` through `extern "C"` functions so a C host (for
//! instance one driving libcurl) can describe a request, then read back the
//! URI, headers, body, timeouts and transport options it should send.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Setters return an `FfiErrorCode`; getters return owned C strings or a
//!   heap-allocated `FfiHttpRequest`.
//! - Structured inputs (data, request parameters, transport options) are
//!   passed as JSON text.
//! - The C caller owns all returned pointers and must call the matching
//!   `reqctx_free*` function to release them.

pub mod types;

use std::collections::BTreeMap;
use std::ffi::CStr;
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::error;
use reqctx_core::{RequestContext, RequestDefaults};
use serde_json::{Map, Value};

use types::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Run a setter body, mapping a caught panic to `FfiErrorCode::Panic`.
fn guard(name: &str, f: impl FnOnce() -> Result<(), FfiErrorCode>) -> FfiErrorCode {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(())) => FfiErrorCode::Ok,
        Ok(Err(code)) => code,
        Err(_) => {
            error!("panic in {name}");
            FfiErrorCode::Panic
        }
    }
}

/// Borrow a C string as UTF-8.
///
/// # Safety
/// `s` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_str<'a>(s: *const c_char) -> Result<&'a str, FfiErrorCode> {
    if s.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    unsafe { CStr::from_ptr(s) }
        .to_str()
        .map_err(|_| FfiErrorCode::InvalidUtf8)
}

/// # Safety
/// `ctx` must be null or a pointer returned by `reqctx_new*` that has not
/// been freed.
unsafe fn context_mut<'a>(ctx: *mut FfiRequestContext) -> Result<&'a mut RequestContext, FfiErrorCode> {
    if ctx.is_null() {
        return Err(FfiErrorCode::NullArg);
    }
    Ok(unsafe { &mut (*ctx).inner })
}

fn parse_object(json: &str) -> Result<Map<String, Value>, FfiErrorCode> {
    match serde_json::from_str::<Value>(json)? {
        Value::Object(map) => Ok(map),
        _ => Err(FfiErrorCode::InvalidJson),
    }
}

// ---------------------------------------------------------------------------
// Context lifecycle
// ---------------------------------------------------------------------------

/// Create a new request context for `uri` with built-in defaults.
///
/// Returns null if `uri` is null or not UTF-8, or if an internal panic occurs.
/// The caller must free the returned pointer with `reqctx_free`.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_new(uri: *const c_char) -> *mut FfiRequestContext {
    catch_unwind(|| match unsafe { read_str(uri) } {
        Ok(uri) => Box::into_raw(Box::new(FfiRequestContext {
            inner: RequestContext::new(uri),
        })),
        Err(_) => std::ptr::null_mut(),
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Create a new request context seeded from a JSON defaults document, e.g.
/// `{"charset":"ISO-8859-1","timeout":30}`.
///
/// Returns null if either argument is null or the defaults do not parse.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_new_with_defaults(
    uri: *const c_char,
    defaults_json: *const c_char,
) -> *mut FfiRequestContext {
    catch_unwind(|| {
        let (Ok(uri), Ok(json)) = (unsafe { read_str(uri) }, unsafe { read_str(defaults_json) }) else {
            return std::ptr::null_mut();
        };
        match RequestDefaults::from_json(json) {
            Ok(defaults) => Box::into_raw(Box::new(FfiRequestContext {
                inner: RequestContext::with_defaults(uri, &defaults),
            })),
            Err(e) => {
                error!("reqctx_new_with_defaults: {e}");
                std::ptr::null_mut()
            }
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a context created by `reqctx_new*`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_free(ctx: *mut FfiRequestContext) {
    if !ctx.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(ctx) });
        });
    }
}

// ---------------------------------------------------------------------------
// Setters
// ---------------------------------------------------------------------------

/// Set the method by its upper-case name. Returns `InvalidMethod` for any
/// name outside OPTIONS, GET, HEAD, POST, PUT, DELETE, TRACE, CONNECT, PATCH.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_method(ctx: *mut FfiRequestContext, method: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_method", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let name = unsafe { read_str(method) }?;
        ctx.set_method_name(name)?;
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_uri(ctx: *mut FfiRequestContext, uri: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_uri", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_uri(unsafe { read_str(uri) }?);
        Ok(())
    })
}

/// Set one header, replacing any existing value with the same name.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_header(
    ctx: *mut FfiRequestContext,
    name: *const c_char,
    value: *const c_char,
) -> FfiErrorCode {
    guard("reqctx_set_header", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let name = unsafe { read_str(name) }?;
        let value = unsafe { read_str(value) }?;
        ctx.set_header(name, value);
        Ok(())
    })
}

/// Set the body to a raw string, sent verbatim.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_data(ctx: *mut FfiRequestContext, data: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_data", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_data(unsafe { read_str(data) }?);
        Ok(())
    })
}

/// Set the body to a JSON value. Strings are sent verbatim, anything else as
/// compact JSON. A string holding `\u0000` is rejected with `InteriorNul`
/// since it could not be returned through `reqctx_build_request`.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_data_json(ctx: *mut FfiRequestContext, json: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_data_json", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let value: Value = serde_json::from_str(unsafe { read_str(json) }?)?;
        if matches!(&value, Value::String(s) if s.contains('\0')) {
            return Err(FfiErrorCode::InteriorNul);
        }
        ctx.set_data(value);
        Ok(())
    })
}

/// Replace the request parameters with a JSON object. Key order is kept.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_request_parameters_json(
    ctx: *mut FfiRequestContext,
    json: *const c_char,
) -> FfiErrorCode {
    guard("reqctx_set_request_parameters_json", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let params = parse_object(unsafe { read_str(json) }?)?;
        ctx.set_request_parameters(params);
        Ok(())
    })
}

/// Add or overwrite one transport option; `json` is the option's value.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_transport_option_json(
    ctx: *mut FfiRequestContext,
    key: *const c_char,
    json: *const c_char,
) -> FfiErrorCode {
    guard("reqctx_set_transport_option_json", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let key = unsafe { read_str(key) }?;
        let value: Value = serde_json::from_str(unsafe { read_str(json) }?)?;
        ctx.set_transport_option(key, value);
        Ok(())
    })
}

/// Replace every transport option with the members of a JSON object.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_transport_options_json(
    ctx: *mut FfiRequestContext,
    json: *const c_char,
) -> FfiErrorCode {
    guard("reqctx_set_transport_options_json", || {
        let ctx = unsafe { context_mut(ctx) }?;
        let options: BTreeMap<String, Value> = parse_object(unsafe { read_str(json) }?)?.into_iter().collect();
        ctx.set_transport_options(options);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_content_type(
    ctx: *mut FfiRequestContext,
    content_type: *const c_char,
) -> FfiErrorCode {
    guard("reqctx_set_content_type", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_content_type(unsafe { read_str(content_type) }?);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_charset(ctx: *mut FfiRequestContext, charset: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_charset", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_charset(unsafe { read_str(charset) }?);
        Ok(())
    })
}

/// Set both timeouts, in seconds.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_timeouts(
    ctx: *mut FfiRequestContext,
    connection_timeout: u64,
    timeout: u64,
) -> FfiErrorCode {
    guard("reqctx_set_timeouts", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_connection_timeout(connection_timeout).set_timeout(timeout);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_proxy(ctx: *mut FfiRequestContext, proxy: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_proxy", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_proxy(unsafe { read_str(proxy) }?);
        Ok(())
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn reqctx_set_proxy_script(ctx: *mut FfiRequestContext, script: *const c_char) -> FfiErrorCode {
    guard("reqctx_set_proxy_script", || {
        let ctx = unsafe { context_mut(ctx) }?;
        ctx.set_proxy_script(unsafe { read_str(script) }?);
        Ok(())
    })
}

// ---------------------------------------------------------------------------
// Getters
// ---------------------------------------------------------------------------

/// The URI with request parameters appended.
///
/// Returns null if `ctx` is null. Free with `reqctx_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_request_uri(ctx: *const FfiRequestContext) -> *mut c_char {
    catch_unwind(|| {
        if ctx.is_null() {
            return std::ptr::null_mut();
        }
        let ctx = unsafe { &*ctx };
        into_c_string(ctx.inner.request_uri())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Multi-section debug dump of the context.
///
/// Returns null if `ctx` is null. Free with `reqctx_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_debug_string(ctx: *const FfiRequestContext) -> *mut c_char {
    catch_unwind(|| {
        if ctx.is_null() {
            return std::ptr::null_mut();
        }
        let ctx = unsafe { &*ctx };
        into_c_string(ctx.inner.to_debug_string())
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Snapshot everything the transport needs.
///
/// Returns null if `ctx` is null. Free with `reqctx_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_build_request(ctx: *const FfiRequestContext) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if ctx.is_null() {
            return std::ptr::null_mut();
        }
        let ctx = unsafe { &*ctx };
        FfiHttpRequest::from_core(ctx.inner.to_http_request())
    })
    .unwrap_or_else(|_| {
        error!("panic in reqctx_build_request");
        std::ptr::null_mut()
    })
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by `reqctx_build_request`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        free_c_string(req.method_name);
        free_c_string(req.uri);
        free_c_string(req.body);
        free_c_string(req.proxy);
        free_c_string(req.proxy_script);
        free_c_string(req.transport_options_json);
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Vec::from_raw_parts(req.headers, req.headers_len as usize, req.headers_len as usize)
            };
            for h in headers {
                free_c_string(h.name);
                free_c_string(h.value);
            }
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn reqctx_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| free_c_string(s));
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
