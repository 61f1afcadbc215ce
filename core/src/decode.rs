//! JSON decoding of response bodies.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::DecodeError;
use crate::http::HttpResponse;

/// A decoded JSON object.
pub type JsonMap = Map<String, Value>;

/// Decode the response body as a non-empty JSON object.
///
/// Status code and `Content-Type` are ignored. An empty object `{}` is an
/// error: callers use this to pull at least one field out of the body.
pub fn decode_json_body(response: Option<&HttpResponse>) -> Result<JsonMap, DecodeError> {
    let body: JsonMap = decode_json(response)?;
    if body.is_empty() {
        return Err(DecodeError::BodyNotFound);
    }
    Ok(body)
}

/// Decode the response body into `T`.
pub fn decode_json<T: DeserializeOwned>(response: Option<&HttpResponse>) -> Result<T, DecodeError> {
    let response = response.ok_or(DecodeError::ResponseNotFound)?;
    Ok(serde_json::from_slice(&response.body)?)
}
