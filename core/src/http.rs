//! Outgoing request data and the transport seam.
//!
//! # Design
//! `Client` describes each call as a plain-data `HttpRequest` and hands it to
//! a `Transport`. The transport owns everything below that line: parsing the
//! method and URL, header legality, connecting, TLS and enforcing the timeout.
//! Keeping the seam this narrow lets tests swap in a recording transport and
//! observe exactly what would go on the wire.
//!
//! `UreqTransport` is the default implementation. It returns the
//! `http::Response` produced by ureq untouched, so status, headers and the
//! readable body stream are all available to the caller.

use std::fmt;
use std::io;
use std::time::Duration;

use tracing::debug;
use ureq::http::{HeaderName, HeaderValue, Method, Request, Response, Uri};

use crate::error::{BoxError, TransportError};

/// An HTTP request described as plain data.
///
/// Built by `Client::build_request`. Later entries in `headers` replace
/// earlier entries with the same (case-insensitive) name when the transport
/// applies them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Value of the last header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Executes one `HttpRequest` and returns whatever response the underlying
/// stack produces.
///
/// Implementations must not treat non-2xx statuses as errors.
pub trait Transport: Send + Sync {
    type Response;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, TransportError>;
}

/// Blocking transport on a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// `None` disables the timeout.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .allow_non_standard_methods(true)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    type Response = Response<ureq::Body>;

    fn execute(&self, request: HttpRequest) -> Result<Self::Response, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let response = match body {
            Some(bytes) => self.agent.run(to_http(&method, &url, &headers, bytes)?),
            None => self.agent.run(to_http(&method, &url, &headers, ())?),
        }
        .map_err(TransportError::from)?;

        debug!(%method, %url, status = response.status().as_u16(), "response received");
        Ok(response)
    }
}

/// Assemble an `http::Request`, inserting headers in order so a later entry
/// replaces an earlier one with the same name.
fn to_http<B>(
    method: &str,
    url: &str,
    headers: &[(String, String)],
    body: B,
) -> Result<Request<B>, TransportError> {
    let method = Method::from_bytes(method.as_bytes()).map_err(invalid)?;
    let uri: Uri = url.parse().map_err(invalid)?;

    let mut request = Request::new(body);
    *request.method_mut() = method;
    *request.uri_mut() = uri;
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(invalid)?;
        let value = HeaderValue::from_str(value).map_err(invalid)?;
        request.headers_mut().insert(name, value);
    }
    Ok(request)
}

fn invalid<E>(err: E) -> TransportError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TransportError::InvalidRequest(Box::new(err))
}

/// Name-resolution failures from the system resolver carry no stable
/// `io::ErrorKind`, so only ureq's own `HostNotFound` is classed as `Connect`;
/// the rest fall through to `Other`.
impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        let wrap: fn(BoxError) -> TransportError = match &err {
            ureq::Error::Timeout(_) => TransportError::Timeout,
            ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => TransportError::Timeout,
            ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => TransportError::Connect,
            ureq::Error::Io(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::ConnectionRefused
                        | io::ErrorKind::ConnectionReset
                        | io::ErrorKind::ConnectionAborted
                        | io::ErrorKind::NotConnected
                ) =>
            {
                TransportError::Connect
            }
            ureq::Error::BadUri(_) | ureq::Error::Http(_) => TransportError::InvalidRequest,
            _ => TransportError::Other,
        };
        wrap(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use ureq::http::header::{AUTHORIZATION, CONTENT_TYPE};

    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn header_lookup_is_case_insensitive_and_last_wins() {
        let req = HttpRequest {
            method: "GET".to_string(),
            url: "http://api.test/".to_string(),
            headers: headers(&[("X-Trace", "one"), ("x-trace", "two")]),
            body: None,
        };
        assert_eq!(req.header("X-TRACE"), Some("two"));
        assert_eq!(req.header("Content-Type"), None);
    }

    #[test]
    fn to_http_carries_method_uri_and_headers() {
        let req = to_http(
            "PATCH",
            "http://api.test/items/1",
            &headers(&[("Authorization", "Bearer abc")]),
            b"{}".to_vec(),
        )
        .unwrap();
        assert_eq!(req.method(), Method::PATCH);
        assert_eq!(req.uri(), "http://api.test/items/1");
        assert_eq!(req.headers()[AUTHORIZATION], "Bearer abc");
        assert_eq!(req.body(), b"{}");
    }

    #[test]
    fn to_http_accepts_non_standard_methods() {
        let req = to_http("PURGE", "http://api.test/cache", &[], ()).unwrap();
        assert_eq!(req.method().as_str(), "PURGE");
    }

    #[test]
    fn to_http_later_header_replaces_earlier() {
        let req = to_http(
            "POST",
            "http://api.test/items",
            &headers(&[("content-type", "text/plain"), ("Content-Type", "application/json")]),
            (),
        )
        .unwrap();
        let values: Vec<_> = req.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec!["application/json"]);
    }

    #[test]
    fn to_http_rejects_malformed_method() {
        let err = to_http("GE T", "http://api.test/", &[], ()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn to_http_rejects_malformed_url() {
        let err = to_http("GET", "http://api.test/a b", &[], ()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn to_http_rejects_malformed_header() {
        let err = to_http("GET", "http://api.test/", &headers(&[("Bad Name", "v")]), ()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));

        let err = to_http("GET", "http://api.test/", &headers(&[("X-Ok", "line\nbreak")]), ()).unwrap_err();
        assert!(matches!(err, TransportError::InvalidRequest(_)));
    }

    #[test]
    fn ureq_timeout_maps_to_timeout() {
        let err = TransportError::from(ureq::Error::Io(io::Error::from(io::ErrorKind::TimedOut)));
        assert!(err.is_timeout());
    }

    #[test]
    fn ureq_refused_maps_to_connect() {
        let err = TransportError::from(ureq::Error::Io(io::Error::from(io::ErrorKind::ConnectionRefused)));
        assert!(matches!(err, TransportError::Connect(_)));

        let err = TransportError::from(ureq::Error::HostNotFound);
        assert!(matches!(err, TransportError::Connect(_)));
    }

    #[test]
    fn ureq_resolver_io_error_maps_to_other() {
        let lookup = io::Error::other("failed to lookup address information: Name or service not known");
        let err = TransportError::from(ureq::Error::Io(lookup));
        assert!(matches!(err, TransportError::Other(_)));
    }
}
