//! Blocking HTTP/1.1 client over a plain TCP socket
//!
//! Each request opens its own connection. The request is written in full,
//! the write side is shut down, and the response is everything the host
//! sends until it closes the connection. There is no keep-alive, no
//! Content-Length or chunked framing, and no TLS.
use std::{
    fmt::Display,
    io::{Read, Write},
    net::{Shutdown, TcpStream, ToSocketAddrs},
    time::Duration,
};

use crate::{
    error::{ProtocolError, ProtocolErrorKind},
    parse::StatusLineMode,
    request::Method,
    response::Response,
    target::Target,
};

/// Code of the placeholder response for a URL that can't be used.
pub const MALFORMED_URL_CODE: u16 = 400;
/// Code of the placeholder response for a host that can't be reached.
pub const CONNECTION_FAILED_CODE: u16 = 404;

const READ_CHUNK_SIZE: usize = 1024;

/// Configuration for a [`HttpClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Limit on connecting and on each read or write.
    ///
    /// `None` or a zero duration blocks for as long as the operating system
    /// allows.
    pub timeout: Option<Duration>,
    /// How the status code is extracted from the response.
    pub status_line: StatusLineMode,
    /// Maximum number of bytes requested per read.
    pub read_chunk_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            status_line: StatusLineMode::default(),
            read_chunk_size: READ_CHUNK_SIZE,
        }
    }
}

/// Value produced by [`HttpClient::command()`].
#[derive(Debug)]
pub enum Outcome {
    /// A response from the host, or a placeholder for a bad URL or
    /// unreachable host.
    Response(Response),
    /// The method is not GET or POST. Nothing was sent.
    UnsupportedMethod(String),
    /// The request could not be sent or the response could not be read.
    TransportFailure(ProtocolError),
}

impl Outcome {
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response(..))
    }

    pub fn as_response(&self) -> Option<&Response> {
        if let Self::Response(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn try_into_response(self) -> Result<Response, Self> {
        if let Self::Response(v) = self {
            Ok(v)
        } else {
            Err(self)
        }
    }

    pub fn is_unsupported_method(&self) -> bool {
        matches!(self, Self::UnsupportedMethod(..))
    }

    pub fn as_unsupported_method(&self) -> Option<&str> {
        if let Self::UnsupportedMethod(v) = self {
            Some(v)
        } else {
            None
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::TransportFailure(..))
    }

    pub fn as_transport_failure(&self) -> Option<&ProtocolError> {
        if let Self::TransportFailure(v) = self {
            Some(v)
        } else {
            None
        }
    }
}

impl From<Result<Response, ProtocolError>> for Outcome {
    fn from(value: Result<Response, ProtocolError>) -> Self {
        match value {
            Ok(response) => Self::Response(response),
            Err(error) => Self::TransportFailure(error),
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Response(response) => response.fmt(f),
            Self::UnsupportedMethod(message) => f.write_str(message),
            Self::TransportFailure(_) => f.write_str("None"),
        }
    }
}

/// Minimal HTTP/1.1 client.
///
/// The client holds no connection between calls. Every call to
/// [`get()`](Self::get), [`post()`](Self::post) or
/// [`command()`](Self::command) connects, exchanges one request and
/// response, and closes the socket before returning.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    config: ClientConfig,
}

impl HttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a GET request. `args` is accepted but never sent.
    ///
    /// A malformed URL gives a 400 response and an unreachable host a 404
    /// response. An error is returned only when sending the request or
    /// handling the host response fails.
    pub fn get<I, K, V>(&self, url: &str, args: I) -> Result<Response, ProtocolError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.request(Method::Get, url, args)
    }

    /// Sends a POST request with `args` as a form-encoded body.
    ///
    /// Failures are reported the same way as [`get()`](Self::get).
    pub fn post<I, K, V>(&self, url: &str, args: I) -> Result<Response, ProtocolError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.request(Method::Post, url, args)
    }

    /// Dispatches on a method name.
    ///
    /// Only `GET` and `POST` are handled; anything else produces a message
    /// without opening a connection.
    pub fn command<I, K, V>(&self, url: &str, method: &str, args: I) -> Outcome
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        match method.parse::<Method>() {
            Ok(method) => self.request(method, url, args).into(),
            Err(_) => {
                tracing::debug!(method, "unsupported method");
                Outcome::UnsupportedMethod(format!(
                    "This client cannot handle {} requests.",
                    method
                ))
            }
        }
    }

    fn request<I, K, V>(
        &self,
        method: Method,
        url: &str,
        args: I,
    ) -> Result<Response, ProtocolError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let span = tracing::info_span!("request", %method, url);
        let _span_guard = span.enter();

        let target = match Target::parse(url) {
            Ok(target) => target,
            Err(error) => {
                tracing::warn!(%error, "could not parse URL");
                return Ok(Response::with_code(MALFORMED_URL_CODE));
            }
        };

        let mut connection =
            match Connection::open(&target.hostname, target.port, self.config.timeout) {
                Ok(connection) => connection,
                Err(error) => {
                    tracing::warn!(%error, "could not connect");
                    return Ok(Response::with_code(CONNECTION_FAILED_CODE));
                }
            };

        let request = crate::request::build_request(method, &target, args);

        connection.send_request(&request).inspect_err(|error| {
            tracing::warn!(%error, "error sending bytes to host");
        })?;

        let data = connection
            .recv_all(self.config.read_chunk_size)
            .inspect_err(|error| {
                tracing::warn!(%error, "error handling host response");
            })?;

        drop(connection);

        let response = crate::parse::parse_response(&data, self.config.status_line)
            .map_err(|error| {
                tracing::warn!(%error, "error handling host response");
                ProtocolError::new(ProtocolErrorKind::ReceiveFailed)
                    .with_url(url)
                    .with_source(error)
            })?;

        tracing::info!(code = response.code(), "received response");

        Ok(response)
    }
}

/// A connected socket used for exactly one exchange.
///
/// The socket is closed when this value is dropped.
#[derive(Debug)]
struct Connection {
    stream: TcpStream,
    hostname: String,
    port: u16,
}

impl Connection {
    fn open(hostname: &str, port: u16, timeout: Option<Duration>) -> Result<Self, ProtocolError> {
        let stream = connect(hostname, port, timeout).map_err(|error| {
            ProtocolError::new(ProtocolErrorKind::ConnectionFailed)
                .with_address(hostname, port)
                .with_source(error)
        })?;

        tracing::debug!(hostname, port, "connected");

        Ok(Self {
            stream,
            hostname: hostname.to_string(),
            port,
        })
    }

    /// Writes the whole request and then shuts down the write side.
    fn send_request(&mut self, data: &[u8]) -> Result<(), ProtocolError> {
        if let Err(error) = self.send_all(data).and_then(|_| self.end_sending()) {
            return Err(self.error(ProtocolErrorKind::SendFailed, error));
        }

        tracing::trace!(length = data.len(), "sent request");

        Ok(())
    }

    fn send_all(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.stream.write_all(data)?;
        self.stream.flush()
    }

    /// Tells the host no more data will be written. Reading stays open.
    fn end_sending(&self) -> std::io::Result<()> {
        self.stream.shutdown(Shutdown::Write)
    }

    fn recv_all(&mut self, chunk_size: usize) -> Result<Vec<u8>, ProtocolError> {
        recv_all(&mut self.stream, chunk_size)
            .map_err(|error| self.error(ProtocolErrorKind::ReceiveFailed, error))
    }

    fn error(&self, kind: ProtocolErrorKind, source: std::io::Error) -> ProtocolError {
        ProtocolError::new(kind)
            .with_address(self.hostname.as_str(), self.port)
            .with_source(source)
    }
}

fn connect(hostname: &str, port: u16, timeout: Option<Duration>) -> std::io::Result<TcpStream> {
    // A zero duration is rejected by the socket calls, so treat it as unset.
    let Some(timeout) = timeout.filter(|timeout| !timeout.is_zero()) else {
        return TcpStream::connect((hostname, port));
    };

    let mut last_error = None;

    for address in (hostname, port).to_socket_addrs()? {
        match TcpStream::connect_timeout(&address, timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))?;
                return Ok(stream);
            }
            Err(error) => last_error = Some(error),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "could not resolve to any addresses",
        )
    }))
}

/// Reads until the peer closes the stream.
///
/// The end of the stream is the only thing that ends the response.
pub fn recv_all<R: Read>(reader: &mut R, chunk_size: usize) -> std::io::Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut buf = vec![0; chunk_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buf) {
            Ok(bytes_read) => bytes_read,
            Err(error) if error.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error),
        };

        if bytes_read == 0 {
            break;
        }

        tracing::trace!(bytes_read, "read response");
        output.extend_from_slice(&buf[0..bytes_read]);
    }

    Ok(output)
}
