//! The REST client: base URL, default headers and a transport.
//!
//! # Design
//! `Client` does four things per call and nothing else: concatenate the base
//! URL and path, encode an optional JSON body, lay the default headers onto
//! the request, and hand the result to its `Transport`. The response comes
//! back untouched; status interpretation belongs to the caller.
//!
//! Header precedence, from lowest to highest:
//! 1. headers the transport adds on its own (user agent, accept, ...),
//! 2. entries set with `set_header`, applied in name order,
//! 3. `Content-Type: application/json`, only when a body is present.
//!
//! The URL is `base_url + path` with no slash normalization, so
//! `"http://h/" + "/x"` yields `"http://h//x"`.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpRequest, Transport, UreqTransport};

/// Content type attached to every request that carries a body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const CONTENT_TYPE: &str = "Content-Type";

/// HTTP client bound to a single base URL.
///
/// Safe to share across threads (wrap it in an `Arc`). `set_header` may be
/// called at any point; a request in flight sees the headers that were set
/// when it was built.
#[derive(Debug)]
pub struct Client<T = UreqTransport> {
    base_url: String,
    headers: RwLock<HashMap<String, String>>,
    transport: T,
}

impl Client {
    /// Build a client backed by ureq, bounded by `config.timeout`.
    ///
    /// Fails with `Error::InvalidConfig` when the base URL is empty.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = UreqTransport::new(config.effective_timeout());
        Client::with_transport(config, transport)
    }
}

impl<T: Transport> Client<T> {
    /// Build a client around a caller-supplied transport. The config's
    /// timeout is not applied; the transport owns its own bounds.
    pub fn with_transport(config: ClientConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            base_url: config.base_url,
            headers: RwLock::new(HashMap::new()),
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The transport requests are dispatched through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Snapshot of the default headers.
    pub fn headers(&self) -> HashMap<String, String> {
        self.headers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Set a default header sent with every request. Last write for a key
    /// wins. Names and values are not validated here; the transport rejects
    /// malformed ones when a request is executed.
    pub fn set_header(&self, key: impl Into<String>, value: impl Into<String>) {
        self.headers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    /// Describe the request `request` would send, without sending it.
    pub fn build_request<B>(&self, method: &str, path: &str, body: Option<&B>) -> Result<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        let body = body
            .map(|value| serde_json::to_vec(value).map_err(Error::Encoding))
            .transpose()?;

        let mut headers: Vec<(String, String)> = {
            let defaults = self.headers.read().unwrap_or_else(PoisonError::into_inner);
            defaults.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };
        headers.sort();

        if body.is_some() {
            headers.retain(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE));
            headers.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        }

        Ok(HttpRequest {
            method: method.to_string(),
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    /// Send one request and return the transport's response as-is.
    ///
    /// `body`, when present, is encoded as JSON; an encoding failure returns
    /// `Error::Encoding` without touching the transport. Any HTTP status,
    /// including 4xx and 5xx, is returned as `Ok`.
    pub fn request<B>(&self, method: &str, path: &str, body: Option<&B>) -> Result<T::Response>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, body)?;
        debug!(
            method = %request.method,
            url = %request.url,
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "dispatching request"
        );
        Ok(self.transport.execute(request)?)
    }
}
