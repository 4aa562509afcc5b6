//! Minimal blocking REST client.
//!
//! # Overview
//! A `Client` holds a base URL, a table of default headers and a transport.
//! `Client::request` appends a path to the base URL, encodes an optional body
//! as JSON, applies the default headers, and returns whatever response the
//! transport produced. Non-2xx statuses are not errors; the caller decides
//! what a status means.
//!
//! ```no_run
//! use std::time::Duration;
//! use rest_core::{Client, ClientConfig};
//!
//! # fn main() -> rest_core::Result<()> {
//! let client = Client::new(ClientConfig::new("http://api.test").with_timeout(Duration::from_secs(5)))?;
//! client.set_header("Authorization", "Bearer abc");
//! let response = client.request("POST", "/items", Some(&serde_json::json!({"name": "widget"})))?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! - The outgoing request is built as plain data (`HttpRequest`) and handed to
//!   a `Transport`, so tests can record exactly what would be sent.
//! - `UreqTransport` is the default transport; its response type is
//!   `http::Response<ureq::Body>`.
//! - Default headers live behind a `RwLock`; a `Client` can be shared across
//!   threads and reconfigured while in use.

pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use client::{Client, JSON_CONTENT_TYPE};
pub use config::ClientConfig;
pub use error::{BoxError, Error, Result, TransportError};
pub use http::{HttpRequest, Transport, UreqTransport};
