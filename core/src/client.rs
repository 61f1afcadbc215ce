//! Blocking client facade over a `ureq` agent.
//!
//! # Design
//! Every verb method is two steps: `new_request` builds an `HttpRequest`
//! value with the default and caller headers merged and the body encoded,
//! then `execute` hands it to the agent and reads the response eagerly.
//! The agent is configured to return 4xx/5xx as responses, so the only
//! errors are transport errors and body encoding errors.
//!
//! # Authorization
//! A caller header named exactly `Authorization` is not sent literally: its
//! value becomes a bearer token (`Authorization: Bearer <value>`). Use
//! `HttpRequest::with_bearer_token` with `execute` to be explicit.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::Serialize;
use ureq::{Agent, RequestBuilder};

use crate::error::Error;
use crate::form::FormData;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, ACCEPT, AUTHORIZATION, CONTENT_TYPE, JSON_CONTENT_TYPE,
};

/// Caller-supplied request headers.
pub type Headers = HashMap<String, String>;

/// Upper bound accepted by `Client::set_timeout`, in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Synchronous client bound to one base URL.
///
/// Relative request URLs are joined onto `host`; absolute URLs are used as
/// given. Each call blocks until the response body has been read.
#[derive(Debug, Clone)]
pub struct Client {
    agent: Agent,
    host: String,
    debug: bool,
    timeout: Option<Duration>,
}

impl Client {
    pub fn new(host: &str, debug: bool) -> Self {
        Self {
            agent: build_agent(None),
            host: host.to_string(),
            debug,
            timeout: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The underlying transport.
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Replace the request timeout for all later requests. `0` restores the
    /// transport default. Values above `MAX_TIMEOUT_SECS` are ignored.
    pub fn set_timeout(&mut self, seconds: u64) {
        if seconds > MAX_TIMEOUT_SECS {
            tracing::warn!(seconds, max = MAX_TIMEOUT_SECS, "timeout out of range, keeping previous value");
            return;
        }
        let timeout = (seconds > 0).then(|| Duration::from_secs(seconds));
        self.agent = build_agent(timeout);
        self.timeout = timeout;
    }

    /// Build a request with the default headers and the caller's headers
    /// merged on top, and no body.
    pub fn new_request(&self, method: HttpMethod, url: &str, headers: Option<&Headers>) -> HttpRequest {
        let mut request = HttpRequest::new(method, self.resolve_url(url));
        request.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        request.set_header(ACCEPT, JSON_CONTENT_TYPE);

        for (name, value) in headers.into_iter().flatten() {
            if name == AUTHORIZATION {
                request.set_bearer_token(value);
            } else {
                request.set_header(name, value);
            }
        }
        request
    }

    /// Build a request with a form-encoded body. An empty form attaches
    /// nothing and keeps the JSON `Content-Type`.
    pub fn new_form_request(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Option<&Headers>,
        data: Option<&FormData>,
    ) -> HttpRequest {
        let mut request = self.new_request(method, url, headers);
        if let Some(data) = data.filter(|data| !data.is_empty()) {
            request.set_form_data(data);
        }
        request
    }

    /// Build a request with a raw body encoded per its `Content-Type`.
    pub fn new_raw_request<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Option<&Headers>,
        body: Option<&T>,
    ) -> Result<HttpRequest, Error> {
        let mut request = self.new_request(method, url, headers);
        if let Some(body) = body {
            request.set_raw_body(body)?;
        }
        Ok(request)
    }

    pub fn get(&self, url: &str, headers: Option<&Headers>) -> Result<HttpResponse, Error> {
        self.execute(self.new_request(HttpMethod::Get, url, headers))
    }

    pub fn head(&self, url: &str, headers: Option<&Headers>) -> Result<HttpResponse, Error> {
        self.execute(self.new_request(HttpMethod::Head, url, headers))
    }

    pub fn delete(&self, url: &str, headers: Option<&Headers>) -> Result<HttpResponse, Error> {
        self.execute(self.new_request(HttpMethod::Delete, url, headers))
    }

    pub fn post(
        &self,
        url: &str,
        headers: Option<&Headers>,
        data: Option<&FormData>,
    ) -> Result<HttpResponse, Error> {
        self.execute(self.new_form_request(HttpMethod::Post, url, headers, data))
    }

    pub fn put(
        &self,
        url: &str,
        headers: Option<&Headers>,
        data: Option<&FormData>,
    ) -> Result<HttpResponse, Error> {
        self.execute(self.new_form_request(HttpMethod::Put, url, headers, data))
    }

    pub fn post_raw<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: Option<&Headers>,
        body: Option<&T>,
    ) -> Result<HttpResponse, Error> {
        self.execute(self.new_raw_request(HttpMethod::Post, url, headers, body)?)
    }

    /// Sends PATCH. Earlier versions of this facade sent POST here.
    pub fn patch_raw<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: Option<&Headers>,
        body: Option<&T>,
    ) -> Result<HttpResponse, Error> {
        self.execute(self.new_raw_request(HttpMethod::Patch, url, headers, body)?)
    }

    pub fn delete_raw<T: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: Option<&Headers>,
        body: Option<&T>,
    ) -> Result<HttpResponse, Error> {
        self.execute(self.new_raw_request(HttpMethod::Delete, url, headers, body)?)
    }

    /// Dispatch a prebuilt request and read the whole response.
    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse, Error> {
        if self.debug {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                headers = ?redacted(&request.headers),
                body_len = request.body.as_ref().map_or(0, String::len),
                "sending request"
            );
        }

        let started = Instant::now();
        let mut response = self.send(&request)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()?;
        let elapsed = started.elapsed();

        if self.debug {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                status,
                body_len = body.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "received response"
            );
        }

        Ok(HttpResponse {
            status,
            headers,
            body,
            elapsed,
        })
    }

    fn send(&self, request: &HttpRequest) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref().map(str::as_bytes);

        match (request.method, body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Get, Some(body)) => with_headers(self.agent.get(url), headers)
                .force_send_body()
                .send(body),
            (HttpMethod::Head, None) => with_headers(self.agent.head(url), headers).call(),
            (HttpMethod::Head, Some(body)) => with_headers(self.agent.head(url), headers)
                .force_send_body()
                .send(body),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Delete, Some(body)) => with_headers(self.agent.delete(url), headers)
                .force_send_body()
                .send(body),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body),
            (HttpMethod::Patch, None) => with_headers(self.agent.patch(url), headers).send_empty(),
            (HttpMethod::Patch, Some(body)) => with_headers(self.agent.patch(url), headers).send(body),
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        if url::Url::parse(url).is_ok() {
            return url.to_string();
        }
        let host = self.host.trim_end_matches('/');
        if url.starts_with('/') {
            format!("{host}{url}")
        } else {
            format!("{host}/{url}")
        }
    }
}

fn build_agent(timeout: Option<Duration>) -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .timeout_global(timeout)
        .build()
        .new_agent()
}

fn with_headers<B>(builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()))
}

fn redacted(headers: &[(String, String)]) -> Vec<(&str, &str)> {
    headers
        .iter()
        .map(|(name, value)| {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                (name.as_str(), "<redacted>")
            } else {
                (name.as_str(), value.as_str())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::FORM_CONTENT_TYPE;

    fn client() -> Client {
        Client::new("http://localhost:3000/", false)
    }

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accessors() {
        let client = Client::new("https://api.example/", true);
        assert_eq!(client.host(), "https://api.example/");
        assert!(client.debug());
        assert_eq!(client.timeout(), None);
    }

    #[test]
    fn default_headers_are_set() {
        let req = client().new_request(HttpMethod::Get, "/ping", None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/ping");
        assert_eq!(
            req.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Accept".to_string(), "application/json".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn caller_headers_override_defaults() {
        let h = headers(&[("accept", "text/plain"), ("X-Trace", "1")]);
        let req = client().new_request(HttpMethod::Get, "/ping", Some(&h));
        assert_eq!(req.header("Accept"), Some("text/plain"));
        assert_eq!(req.header("X-Trace"), Some("1"));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.headers.len(), 3);
    }

    #[test]
    fn authorization_becomes_bearer_token() {
        let h = headers(&[("Authorization", "tok")]);
        let req = client().new_request(HttpMethod::Post, "/login", Some(&h));
        assert_eq!(req.header("Authorization"), Some("Bearer tok"));
    }

    #[test]
    fn authorization_match_is_case_sensitive() {
        let h = headers(&[("authorization", "Basic abc")]);
        let req = client().new_request(HttpMethod::Get, "/", Some(&h));
        assert_eq!(req.header("Authorization"), Some("Basic abc"));
    }

    #[test]
    fn relative_urls_join_host() {
        let c = client();
        assert_eq!(c.resolve_url("/a/b?x=1"), "http://localhost:3000/a/b?x=1");
        assert_eq!(c.resolve_url("a"), "http://localhost:3000/a");
        assert_eq!(c.resolve_url(""), "http://localhost:3000/");
        assert_eq!(c.resolve_url("https://other.example/z"), "https://other.example/z");
    }

    #[test]
    fn form_request_encodes_and_switches_content_type() {
        let data = json!({"u": "a", "n": 3, "ok": false});
        let req = client().new_form_request(HttpMethod::Put, "/x", None, data.as_object());
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.header("Content-Type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.header("Accept"), Some("application/json"));
        let body = req.body.unwrap();
        let mut pairs: Vec<&str> = body.split('&').collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec!["n=3", "ok=false", "u=a"]);
    }

    #[test]
    fn form_request_without_data_keeps_json_content_type() {
        let req = client().new_form_request(HttpMethod::Post, "/x", None, None);
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn empty_form_keeps_json_content_type() {
        let empty = FormData::new();
        let req = client().new_form_request(HttpMethod::Post, "/x", None, Some(&empty));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn raw_request_is_json() {
        let req = client()
            .new_raw_request(HttpMethod::Post, "/x", None, Some(&json!({"n": 1})))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"n":1}"#));
        assert_eq!(req.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn raw_request_honors_caller_content_type() {
        let h = headers(&[("Content-Type", "text/csv")]);
        let c = client();
        let req = c
            .new_raw_request(HttpMethod::Patch, "/x", Some(&h), Some("a,b\n1,2"))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some("a,b\n1,2"));

        let err = c
            .new_raw_request(HttpMethod::Patch, "/x", Some(&h), Some(&json!({"n": 1})))
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedBody { .. }));
    }

    #[test]
    fn set_timeout_bounds() {
        let mut c = client();
        c.set_timeout(5);
        assert_eq!(c.timeout(), Some(Duration::from_secs(5)));
        c.set_timeout(MAX_TIMEOUT_SECS + 1);
        assert_eq!(c.timeout(), Some(Duration::from_secs(5)));
        c.set_timeout(0);
        assert_eq!(c.timeout(), None);
    }

    #[test]
    fn redacts_authorization() {
        let req = client().new_request(HttpMethod::Get, "/", None).with_bearer_token("secret");
        let shown = redacted(&req.headers);
        assert!(shown.contains(&("Authorization", "<redacted>")));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Client>();
    }
}
