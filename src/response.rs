//! Response value
use std::fmt::Display;

/// Status code of a response that was never received from a host.
pub const DEFAULT_CODE: u16 = 200;

/// Result of one request attempt.
///
/// The header block and body are kept as raw text exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    code: u16,
    headers: String,
    body: String,
}

impl Response {
    pub fn new<H: Into<String>, B: Into<String>>(code: u16, headers: H, body: B) -> Self {
        Self {
            code,
            headers: headers.into(),
            body: body.into(),
        }
    }

    /// Placeholder response carrying only a status code.
    pub fn with_code(code: u16) -> Self {
        Self::new(code, "", "")
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Raw header block, status line included, without the final empty line.
    pub fn headers(&self) -> &str {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_parts(self) -> (u16, String, String) {
        (self.code, self.headers, self.body)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::with_code(DEFAULT_CODE)
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "--Code--\n{}\n--Headers--\n{}\n--Body--\n{}",
            self.code, self.headers, self.body
        )
    }
}
