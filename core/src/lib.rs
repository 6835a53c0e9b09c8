//! Request description core for host-executed HTTP transports.
//!
//! # Overview
//! Describes one outgoing request (method, URI, headers, payload, query
//! parameters, content type, timeouts, proxy and transport options) without
//! touching the network. The host reads the context, or the `HttpRequest`
//! snapshot built from it, and performs the round-trip with its own client.
//!
//! # Design
//! - `RequestContext` is plain mutable data with chained `&mut self` setters.
//! - The only validation is the method whitelist (`HttpMethod`).
//! - The request URI and the `content-type` header are derived at read time,
//!   so later setter calls are always reflected.

pub mod context;
pub mod debug;
pub mod defaults;
pub mod error;
pub mod headers;
pub mod http;
pub mod query;

pub use context::RequestContext;
pub use defaults::RequestDefaults;
pub use error::RequestError;
pub use headers::Headers;
pub use http::{HttpMethod, HttpRequest};
