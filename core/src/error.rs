//! Error types for request context construction.
//!
//! # Design
//! Building a request can only fail in one place: choosing a method name
//! outside the fixed whitelist. `InvalidDefaults` belongs to the
//! configuration layer and is raised only while loading `RequestDefaults`.

use thiserror::Error;

/// Errors returned while configuring a `RequestContext`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The method name is not one of the nine supported HTTP methods.
    #[error("invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// Request defaults could not be parsed from their JSON representation.
    #[error("invalid request defaults: {0}")]
    InvalidDefaults(String),
}
