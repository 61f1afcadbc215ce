//! Error types for the client facade and the response decoder.
//!
//! # Design
//! Transport failures pass through untouched in `Error::Transport`; HTTP
//! error statuses are not errors at all. Decoding has its own enum so the
//! three decoder failures stay distinguishable by variant.

/// Errors returned by `Client` dispatch methods.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Connect, DNS, TLS, timeout, malformed URL or header. Surfaced as the
    /// transport reported it.
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// A raw request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// A non-string raw body was given with a non-JSON `Content-Type`.
    #[error("unsupported body for content type {content_type}")]
    UnsupportedBody { content_type: String },
}

/// Errors returned by `decode_json_body` and `decode_json`.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// No response was given.
    #[error("response not found")]
    ResponseNotFound,

    /// The body is not valid JSON of the expected shape.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The body decoded to an object with no keys.
    #[error("body not found")]
    BodyNotFound,
}
