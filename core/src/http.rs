//! Plain-data HTTP request and response types.
//!
//! # Design
//! `Client` first builds an `HttpRequest` value (merged headers, encoded
//! body) and only then hands it to the transport. Keeping the request as
//! data makes header merging and body encoding observable in tests without a
//! network round-trip. `HttpResponse` is read eagerly from the transport so
//! it can be inspected and decoded any number of times.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{DecodeError, Error};
use crate::form::{encode_form, FormData};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const AUTHORIZATION: &str = "Authorization";

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `Client::new_request` and the per-verb methods. Header names are
/// kept in the casing they were set with; `set_header` replaces an existing
/// entry regardless of case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Set `name` to `value`, overriding any earlier value for that name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => {
                entry.0 = name.to_string();
                entry.1 = value.to_string();
            }
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Install bearer authentication. The token is sent as
    /// `Authorization: Bearer <token>`.
    pub fn set_bearer_token(&mut self, token: &str) {
        self.set_header(AUTHORIZATION, &format!("Bearer {token}"));
    }

    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.set_bearer_token(token);
        self
    }

    /// Attach a form-encoded body and switch `Content-Type` to
    /// `application/x-www-form-urlencoded`.
    pub fn set_form_data(&mut self, data: &FormData) {
        self.set_header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        self.body = Some(encode_form(data));
    }

    /// Attach `body` serialized according to the request's current
    /// `Content-Type` (JSON when none is set).
    ///
    /// A value that serializes to a JSON string is sent as the bare string.
    /// Anything else needs a JSON media type.
    pub fn set_raw_body<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<(), Error> {
        let encoded = serde_json::to_string(body).map_err(Error::Encode)?;
        if encoded.starts_with('"') {
            let text: String = serde_json::from_str(&encoded).map_err(Error::Encode)?;
            self.body = Some(text);
            return Ok(());
        }

        match self.header(CONTENT_TYPE) {
            Some(content_type) if !is_json_content_type(content_type) => {
                Err(Error::UnsupportedBody {
                    content_type: content_type.to_string(),
                })
            }
            _ => {
                self.body = Some(encoded);
                Ok(())
            }
        }
    }
}

/// An HTTP response read from the transport.
///
/// 4xx and 5xx responses are ordinary values; only transport failures are
/// errors.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Time from dispatch until the body was fully read.
    pub elapsed: Duration,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        crate::decode::decode_json(Some(self))
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// True for `json`, `json-*` and structured `*+json` subtypes of
/// `application/` and `text/`, ignoring parameters such as `charset`.
pub fn is_json_content_type(content_type: &str) -> bool {
    let media = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match media.split_once('/') {
        Some(("application", subtype)) | Some(("text", subtype)) => {
            subtype == "json" || subtype.ends_with("+json") || subtype.starts_with("json-")
        }
        _ => false,
    }
}
