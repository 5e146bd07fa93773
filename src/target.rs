//! Request target derived from an absolute URL
use url::{Host, Url};

use crate::error::{ProtocolError, ProtocolErrorKind};

/// Port used when the URL does not carry one, whatever the scheme.
pub const DEFAULT_PORT: u16 = 80;

/// Where a request is sent and what path it asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    pub hostname: String,
    pub port: u16,
    pub path: String,
}

impl Target {
    /// Parses an absolute URL.
    ///
    /// The hostname is lowercased for every scheme. A missing or zero port
    /// becomes [`DEFAULT_PORT`].
    ///
    /// Only the path component is kept for the request line; the query and
    /// fragment are dropped. An empty path becomes `/`.
    pub fn parse(url: &str) -> Result<Self, ProtocolError> {
        let parsed = Url::parse(url).map_err(|error| {
            ProtocolError::new(ProtocolErrorKind::MalformedUrl)
                .with_url(url)
                .with_source(error)
        })?;

        let hostname = match parsed.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_ascii_lowercase(),
            Some(Host::Ipv4(address)) => address.to_string(),
            Some(Host::Ipv6(address)) => address.to_string(),
            _ => return Err(ProtocolError::new(ProtocolErrorKind::MalformedUrl).with_url(url)),
        };

        let port = parsed
            .port()
            .filter(|&port| port != 0)
            .unwrap_or(DEFAULT_PORT);

        let path = if parsed.path().is_empty() {
            "/".to_string()
        } else {
            parsed.path().to_string()
        };

        Ok(Self {
            scheme: parsed.scheme().to_string(),
            hostname,
            port,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port() {
        for url in [
            "http://example.com/",
            "http://example.com/a/b",
            "foo://example.com/x",
        ] {
            assert_eq!(Target::parse(url).unwrap().port, 80, "{}", url);
        }
    }

    #[test]
    fn test_zero_port() {
        assert_eq!(Target::parse("http://example.com:0/").unwrap().port, 80);
    }

    #[test]
    fn test_explicit_port() {
        let target = Target::parse("http://127.0.0.1:27600/49872398432").unwrap();

        assert_eq!(target.hostname, "127.0.0.1");
        assert_eq!(target.port, 27600);
        assert_eq!(target.path, "/49872398432");
    }

    #[test]
    fn test_empty_path() {
        assert_eq!(Target::parse("http://slashdot.org").unwrap().path, "/");
        assert_eq!(Target::parse("foo://example.com").unwrap().path, "/");
    }

    #[test]
    fn test_query_dropped() {
        let target = Target::parse("http://example.com/search?q=1#top").unwrap();

        assert_eq!(target.path, "/search");
    }

    #[test]
    fn test_hostname() {
        let target = Target::parse("HTTP://WWW.Example.COM/").unwrap();
        assert_eq!(target.scheme, "http");
        assert_eq!(target.hostname, "www.example.com");

        let target = Target::parse("foo://EXAMPLE.com/").unwrap();
        assert_eq!(target.scheme, "foo");
        assert_eq!(target.hostname, "example.com");

        let target = Target::parse("http://[::1]:8080/").unwrap();
        assert_eq!(target.hostname, "::1");
        assert_eq!(target.port, 8080);
    }

    #[test]
    fn test_malformed() {
        for url in ["", "example.com", "http://", "mailto:someone@example.com", "http://a:99999/"] {
            let error = Target::parse(url).unwrap_err();
            assert_eq!(error.kind(), ProtocolErrorKind::MalformedUrl, "{:?}", url);
        }
    }
}
