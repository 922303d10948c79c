/// Protocol version written on every status line.
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// HTTP status codes the server sends.
///
/// - `Ok` (200): file served, or upload stored
/// - `NotFound` (404): GET for a path that does not exist under the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 404 Not Found
    NotFound,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// ```
    /// # use courier::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::NotFound => 404,
        }
    }

    /// Returns the standard reason phrase for this status code.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotFound => "Not Found",
        }
    }

    /// The complete response head: status line followed by the blank line.
    ///
    /// Responses never carry headers, so this is all that precedes the body.
    ///
    /// ```
    /// # use courier::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.head(), b"HTTP/1.0 404 Not Found\r\n\r\n");
    /// ```
    pub fn head(&self) -> &'static [u8] {
        match self {
            StatusCode::Ok => b"HTTP/1.0 200 OK\r\n\r\n",
            StatusCode::NotFound => b"HTTP/1.0 404 Not Found\r\n\r\n",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", HTTP_VERSION, self.as_u16(), self.reason_phrase())
    }
}
