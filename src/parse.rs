//! Parsing of host responses.
use nom::{
    IResult, Parser,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::digit1,
    combinator::{all_consuming, map, opt, recognize, verify},
};

use crate::{
    error::{ParseError, ParseErrorKind},
    response::Response,
};

/// Separator between the header block and the body.
pub const HEADER_DELIMINATOR: &str = "\r\n\r\n";

/// How the status code is located in the header block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusLineMode {
    /// Second space-separated token of the first line, whatever the line
    /// looks like otherwise.
    #[default]
    Positional,
    /// `HTTP/x.y SP 3DIGIT [SP reason-phrase]` and nothing else.
    Strict,
}

/// Splits a response at the first empty line into header block and body.
pub fn split_message(text: &str) -> Result<(&str, &str), ParseError> {
    text.split_once(HEADER_DELIMINATOR).ok_or_else(|| {
        ParseError::new(ParseErrorKind::MissingDeliminator)
            .with_position(text.len() as u64)
            .with_snippet(snippet(text))
    })
}

/// Extracts the status code from the first line of a header block.
pub fn status_code(header_block: &str, mode: StatusLineMode) -> Result<u16, ParseError> {
    let first_line = header_block.lines().next().unwrap_or("");

    match mode {
        StatusLineMode::Positional => positional_status_code(first_line),
        StatusLineMode::Strict => strict_status_code(first_line),
    }
}

/// Decodes and parses a complete response received from a host.
pub fn parse_response(data: &[u8], mode: StatusLineMode) -> Result<Response, ParseError> {
    let text = std::str::from_utf8(data)?;
    let (headers, body) = split_message(text)?;
    let code = status_code(headers, mode)?;

    Ok(Response::new(code, headers, body))
}

fn positional_status_code(line: &str) -> Result<u16, ParseError> {
    let token = line.split(' ').nth(1).ok_or_else(|| {
        ParseError::new(ParseErrorKind::MissingStatusCode).with_snippet(snippet(line))
    })?;

    token.trim().parse().map_err(|error| {
        ParseError::new(ParseErrorKind::InvalidStatusCode)
            .with_snippet(snippet(token))
            .with_source(error)
    })
}

fn strict_status_code(line: &str) -> Result<u16, ParseError> {
    let (_input, code) = status_line(line.as_bytes())?;

    // Three ASCII digits always fit.
    let code = code
        .iter()
        .fold(0u16, |value, digit| value * 10 + u16::from(digit - b'0'));

    Ok(code)
}

fn snippet(text: &str) -> String {
    text.chars().take(16).collect::<String>().escape_default().to_string()
}

fn status_line(input: &[u8]) -> IResult<&[u8], &[u8]> {
    let parts = (
        http_version,
        tag(" "),
        status_digits,
        opt((tag(" "), reason_phrase)),
    );

    #[allow(clippy::type_complexity)]
    map(
        all_consuming(parts),
        |output: (&[u8], &[u8], &[u8], Option<(&[u8], &[u8])>)| output.2,
    )
    .parse(input)
}

fn http_version(input: &[u8]) -> IResult<&[u8], &[u8]> {
    // Be lenient about the case of the http-name.
    recognize((
        tag_no_case("HTTP"),
        tag("/"),
        one_digit,
        tag("."),
        one_digit,
    ))
    .parse(input)
}

fn one_digit(input: &[u8]) -> IResult<&[u8], &[u8]> {
    verify(digit1, |i: &[u8]| i.len() == 1).parse(input)
}

fn status_digits(input: &[u8]) -> IResult<&[u8], &[u8]> {
    verify(digit1, |i: &[u8]| i.len() == 3).parse(input)
}

fn reason_phrase(input: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while(|b: u8| b.is_ascii_graphic() || b == b' ' || b == b'\t' || b >= 0x80).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_message() {
        assert_eq!(
            split_message("HTTP/1.1 200 OK\r\nA: b\r\n\r\nbody").unwrap(),
            ("HTTP/1.1 200 OK\r\nA: b", "body")
        );
        assert_eq!(
            split_message("HTTP/1.1 200 OK\r\n\r\n").unwrap(),
            ("HTTP/1.1 200 OK", "")
        );
    }

    #[test]
    fn test_split_message_keeps_later_deliminators() {
        assert_eq!(
            split_message("H\r\n\r\none\r\n\r\ntwo").unwrap(),
            ("H", "one\r\n\r\ntwo")
        );
    }

    #[test]
    fn test_split_message_missing() {
        for text in ["", "HTTP/1.1 200 OK", "HTTP/1.1 200 OK\r\nA: b\r\n", "a\n\nb"] {
            let error = split_message(text).unwrap_err();
            assert_eq!(error.kind(), ParseErrorKind::MissingDeliminator);
        }
    }

    #[test]
    fn test_positional_status_code() {
        let mode = StatusLineMode::Positional;

        assert_eq!(status_code("HTTP/1.1 200 OK", mode).unwrap(), 200);
        assert_eq!(status_code("HTTP/1.0 404 Not Found\r\nA: b", mode).unwrap(), 404);
        assert_eq!(status_code("HTTP/1.1 204\r\nA: b", mode).unwrap(), 204);
        assert_eq!(status_code("ICY 200 OK", mode).unwrap(), 200);
        assert_eq!(status_code("garbage 999 and more", mode).unwrap(), 999);
    }

    #[test]
    fn test_positional_status_code_errors() {
        let mode = StatusLineMode::Positional;

        let error = status_code("HTTP/1.1", mode).unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::MissingStatusCode);

        let error = status_code("", mode).unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::MissingStatusCode);

        let error = status_code("HTTP/1.1 OK 200", mode).unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::InvalidStatusCode);

        let error = status_code("HTTP/1.1  200 OK", mode).unwrap_err();
        assert_eq!(error.kind(), ParseErrorKind::InvalidStatusCode);
    }

    #[test]
    fn test_strict_status_code() {
        let mode = StatusLineMode::Strict;

        assert_eq!(status_code("HTTP/1.1 200 OK", mode).unwrap(), 200);
        assert_eq!(status_code("http/1.0 503", mode).unwrap(), 503);
        assert_eq!(status_code("HTTP/1.1 404 Not Found\r\nA: b", mode).unwrap(), 404);

        for line in ["ICY 200 OK", "HTTP/1.1 2000 OK", "HTTP/11 200 OK", "HTTP/1.1 abc"] {
            let error = status_code(line, mode).unwrap_err();
            assert_eq!(error.kind(), ParseErrorKind::Syntax, "{}", line);
        }
    }

    #[test]
    fn test_parse_response() {
        let data = b"HTTP/1.1 200 OK\r\nHost: x\r\n\r\nhello";
        let response = parse_response(data, StatusLineMode::Positional).unwrap();

        assert_eq!(response.code(), 200);
        assert_eq!(response.headers(), "HTTP/1.1 200 OK\r\nHost: x");
        assert_eq!(response.body(), "hello");
    }

    #[test]
    fn test_parse_response_invalid_utf8() {
        let data = b"HTTP/1.1 200 OK\r\n\r\n\xff\xfe";
        let error = parse_response(data, StatusLineMode::Positional).unwrap_err();

        assert_eq!(error.kind(), ParseErrorKind::InvalidUtf8);
        assert_eq!(error.position(), Some(19));
    }
}
