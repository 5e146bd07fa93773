//! Request line and header construction
use std::{fmt::Display, str::FromStr};

use crate::{
    error::{ProtocolError, ProtocolErrorKind},
    target::Target,
};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ProtocolError;

    /// Method names are matched case-sensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            _ => Err(ProtocolError::new(ProtocolErrorKind::UnsupportedMethod)),
        }
    }
}

/// Builds the complete request as sent on the wire.
///
/// `args` is ignored for GET. A POST with no args sends `Content-Length: 0`
/// without the empty line that would end the header section; the peer only
/// learns the request is over from the half-close that follows.
pub fn build_request<I, K, V>(method: Method, target: &Target, args: I) -> Vec<u8>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let Target { hostname, path, .. } = target;

    let text = match method {
        Method::Get => format!("GET {path} HTTP/1.1\r\nHost: {hostname}\r\n\r\n"),
        Method::Post => {
            let body = crate::form::encode_form(args);

            if body.is_empty() {
                format!("POST {path} HTTP/1.1\r\nHost: {hostname}\r\nContent-Length: 0\r\n")
            } else {
                format!(
                    "POST {path} HTTP/1.1\r\nHost: {hostname}\r\nContent-Type: {FORM_CONTENT_TYPE}\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                )
            }
        }
    };

    text.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_ARGS: [(&str, &str); 0] = [];

    fn target() -> Target {
        Target::parse("http://example.com:8080/submit").unwrap()
    }

    #[test]
    fn test_method() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!(Method::Post.to_string(), "POST");

        for name in ["PUT", "get", "", "Post"] {
            let error = name.parse::<Method>().unwrap_err();
            assert_eq!(error.kind(), ProtocolErrorKind::UnsupportedMethod);
        }
    }

    #[test]
    fn test_get() {
        assert_eq!(
            build_request(Method::Get, &target(), NO_ARGS),
            b"GET /submit HTTP/1.1\r\nHost: example.com\r\n\r\n"
        );
    }

    #[test]
    fn test_get_ignores_args() {
        assert_eq!(
            build_request(Method::Get, &target(), [("a", "1")]),
            build_request(Method::Get, &target(), NO_ARGS)
        );
    }

    #[test]
    fn test_post_args() {
        assert_eq!(
            build_request(Method::Post, &target(), [("a", "1")]),
            b"POST /submit HTTP/1.1\r\nHost: example.com\r\n\
            Content-Type: application/x-www-form-urlencoded\r\n\
            Content-Length: 3\r\n\r\na=1"
        );
    }

    #[test]
    fn test_post_content_length_is_byte_length() {
        let request = build_request(Method::Post, &target(), [("name", "café ok")]);
        let request = String::from_utf8(request).unwrap();

        // "name=caf%C3%A9+ok"
        assert!(request.contains("Content-Length: 17\r\n"));
        assert!(request.ends_with("\r\n\r\nname=caf%C3%A9+ok"));
    }

    #[test]
    fn test_post_no_args() {
        assert_eq!(
            build_request(Method::Post, &target(), NO_ARGS),
            b"POST /submit HTTP/1.1\r\nHost: example.com\r\nContent-Length: 0\r\n"
        );
    }
}
