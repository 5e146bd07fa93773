//! Error representations
use std::{backtrace::Backtrace, fmt::Display, str::Utf8Error};

/// Error for parsing a host response.
#[derive(Debug, thiserror::Error)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Box<ParseContext>,
    backtrace: Option<Box<Backtrace>>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            context: Default::default(),
            backtrace: Some(Box::new(std::backtrace::Backtrace::capture())),
            source: None,
        }
    }

    pub fn with_position(mut self, value: u64) -> Self {
        self.context.position = Some(value);
        self
    }

    pub fn with_snippet<S: Into<String>>(mut self, value: S) -> Self {
        self.context.snippet = Some(value.into());
        self
    }

    pub fn with_source<T: Into<Box<dyn std::error::Error + Send + Sync>>>(
        mut self,
        source: T,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn position(&self) -> Option<u64> {
        self.context.position
    }

    pub fn snippet(&self) -> Option<&String> {
        self.context.snippet.as_ref()
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}{}", self.kind, self.context)?;

        Ok(())
    }
}

impl From<ParseErrorKind> for ParseError {
    fn from(value: ParseErrorKind) -> Self {
        Self::new(value)
    }
}

impl From<nom::Err<nom::error::Error<&[u8]>>> for ParseError {
    fn from(value: nom::Err<nom::error::Error<&[u8]>>) -> Self {
        match value {
            nom::Err::Incomplete(_needed) => ParseError::new(ParseErrorKind::Syntax),
            nom::Err::Error(error) | nom::Err::Failure(error) => {
                ParseError::new(ParseErrorKind::Syntax)
                    .with_snippet(
                        error.input[0..error.input.len().min(16)]
                            .escape_ascii()
                            .to_string(),
                    )
                    .with_source(nom::error::Error::new(error.input.len(), error.code))
            }
        }
    }
}

impl From<Utf8Error> for ParseError {
    fn from(value: Utf8Error) -> Self {
        ParseError::new(ParseErrorKind::InvalidUtf8).with_position(value.valid_up_to() as u64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ParseErrorKind {
    Syntax,
    InvalidUtf8,
    MissingDeliminator,
    MissingStatusCode,
    InvalidStatusCode,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax error"),
            Self::InvalidUtf8 => write!(f, "invalid UTF-8"),
            Self::MissingDeliminator => write!(f, "missing header deliminator"),
            Self::MissingStatusCode => write!(f, "missing status code"),
            Self::InvalidStatusCode => write!(f, "invalid status code"),
        }
    }
}

#[derive(Debug, Default)]
struct ParseContext {
    position: Option<u64>,
    snippet: Option<String>,
}

impl Display for ParseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(position) = self.position {
            write!(f, " position {}", position)?;
        }

        if let Some(snippet) = &self.snippet {
            write!(f, " near '{}'", snippet)?;
        }

        Ok(())
    }
}

/// Error for a request/response exchange.
#[derive(Debug, thiserror::Error)]
pub struct ProtocolError {
    kind: ProtocolErrorKind,
    backtrace: Option<Box<Backtrace>>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    context: Box<ProtocolContext>,
}

impl ProtocolError {
    pub fn new(kind: ProtocolErrorKind) -> Self {
        Self {
            kind,
            backtrace: Some(Box::new(std::backtrace::Backtrace::capture())),
            source: None,
            context: Box::new(ProtocolContext::default()),
        }
    }

    pub fn with_source<T: Into<Box<dyn std::error::Error + Send + Sync>>>(
        mut self,
        source: T,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_url<S: Into<String>>(mut self, value: S) -> Self {
        self.context.url = Some(value.into());
        self
    }

    pub fn with_address<S: Into<String>>(mut self, hostname: S, port: u16) -> Self {
        self.context.address = Some((hostname.into(), port));
        self
    }

    pub fn kind(&self) -> ProtocolErrorKind {
        self.kind
    }

    pub fn url(&self) -> Option<&str> {
        self.context.url.as_deref()
    }

    pub fn address(&self) -> Option<(&str, u16)> {
        self.context
            .address
            .as_ref()
            .map(|(hostname, port)| (hostname.as_str(), *port))
    }

    /// Returns the parse error that caused this error, if any.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.source
            .as_ref()
            .and_then(|source| source.downcast_ref::<ParseError>())
    }
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "protocol error: {}{}", self.kind, self.context)
    }
}

impl From<ProtocolErrorKind> for ProtocolError {
    fn from(value: ProtocolErrorKind) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ProtocolErrorKind {
    MalformedUrl,
    ConnectionFailed,
    SendFailed,
    ReceiveFailed,
    UnsupportedMethod,
}

impl Display for ProtocolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            Self::MalformedUrl => "malformed URL",
            Self::ConnectionFailed => "connection failed",
            Self::SendFailed => "error sending bytes to host",
            Self::ReceiveFailed => "error handling host response",
            Self::UnsupportedMethod => "unsupported method",
        };

        f.write_str(value)
    }
}

#[derive(Debug, Default)]
struct ProtocolContext {
    url: Option<String>,
    address: Option<(String, u16)>,
}

impl Display for ProtocolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(url) = &self.url {
            write!(f, " URL '{}'", url)?;
        }

        if let Some((hostname, port)) = &self.address {
            write!(f, " address [{}:{}]", hostname, port)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_display() {
        let error = ProtocolError::new(ProtocolErrorKind::ConnectionFailed)
            .with_address("example.invalid", 8080);

        assert_eq!(
            error.to_string(),
            "protocol error: connection failed address [example.invalid:8080]"
        );
        assert_eq!(error.address(), Some(("example.invalid", 8080)));
    }

    #[test]
    fn test_utf8_error_position() {
        let error: ParseError = std::str::from_utf8(b"ab\xffc").unwrap_err().into();

        assert_eq!(error.kind(), ParseErrorKind::InvalidUtf8);
        assert_eq!(error.position(), Some(2));
    }

    #[test]
    fn test_parse_error_source() {
        let error = ProtocolError::new(ProtocolErrorKind::ReceiveFailed)
            .with_source(ParseError::new(ParseErrorKind::MissingDeliminator));

        assert_eq!(
            error.parse_error().map(|e| e.kind()),
            Some(ParseErrorKind::MissingDeliminator)
        );
        assert_eq!(
            error.to_string(),
            "protocol error: error handling host response"
        );
    }
}
