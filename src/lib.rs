//! Minimal HTTP/1.1 client written directly against TCP sockets.
//!
//! Requests are built by hand and responses are split into status code,
//! header block and body by looking for the first empty line.
pub mod client;
pub mod error;
pub mod form;
pub mod parse;
pub mod request;
pub mod response;
pub mod target;

pub use client::{ClientConfig, HttpClient, Outcome};
pub use response::Response;

#[cfg(feature = "bin")]
#[doc(hidden)]
pub mod app;
