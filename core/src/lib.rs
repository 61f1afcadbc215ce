//! Blocking client facade for JSON HTTP APIs.
//!
//! # Overview
//! `Client` wraps a `ureq` agent bound to a base URL. Per-verb methods merge
//! the default JSON headers with caller headers, encode a form or raw body,
//! dispatch, and return the response as plain data. `decode_json_body` turns
//! a response body into a JSON object.
//!
//! # Design
//! - Requests are built as `HttpRequest` values before dispatch, so header
//!   merging and body encoding are testable without a network.
//! - HTTP error statuses are responses, not errors. Transport errors pass
//!   through unchanged.
//! - A caller header named `Authorization` is sent as a bearer token.
//! - With `debug` on, each dispatch is traced through `tracing` at `DEBUG`.

pub mod client;
pub mod decode;
pub mod error;
pub mod form;
pub mod http;

pub use client::{Client, Headers, MAX_TIMEOUT_SECS};
pub use decode::{decode_json, decode_json_body, JsonMap};
pub use error::{DecodeError, Error};
pub use form::{encode_form, form_value, FormData};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
