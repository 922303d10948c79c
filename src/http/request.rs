/// Request methods understood by the server.
///
/// Anything other than GET or PUT on the request line is treated as a
/// malformed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Stream a file back to the client
    GET,
    /// PUT - Store the request body under the requested path
    PUT,
}

impl Method {
    /// Parses a method token from the request line.
    ///
    /// Matching is case-sensitive.
    ///
    /// ```
    /// # use courier::http::request::Method;
    /// assert_eq!(Method::from_bytes(b"GET"), Some(Method::GET));
    /// assert_eq!(Method::from_bytes(b"get"), None);
    /// ```
    pub fn from_bytes(token: &[u8]) -> Option<Self> {
        match token {
            b"GET" => Some(Method::GET),
            b"PUT" => Some(Method::PUT),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::PUT => "PUT",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request head parsed out of a connection's inbound buffer.
///
/// Parsed once, when the blank line first shows up. A PUT keeps it while the
/// body arrives; a GET drops it as soon as the response is queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRequest {
    /// GET or PUT
    pub method: Method,
    /// Requested path with the leading `/` stripped (e.g. "index.html")
    pub path: String,
    /// Value of the Content-Length header, if present and numeric
    pub content_length: Option<usize>,
    /// Offset of the first body byte, just past the blank line
    pub header_end: usize,
}

impl ParsedRequest {
    /// Body bytes that arrived in the same buffer as the headers.
    pub fn received_body<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        buf.get(self.header_end..).unwrap_or_default()
    }

    /// Whether `buf` already holds the whole body declared by Content-Length.
    ///
    /// Always false when no Content-Length was sent.
    pub fn body_complete(&self, buf: &[u8]) -> bool {
        match self.content_length {
            Some(len) => self.received_body(buf).len() >= len,
            None => false,
        }
    }
}
