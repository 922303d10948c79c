use thiserror::Error;

use crate::http::request::{Method, ParsedRequest};

/// Blank line separating the request head from the body.
pub const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

const CRLF: &[u8] = b"\r\n";
const VERSION_PREFIX: &[u8] = b" HTTP/1.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The header terminator has not arrived yet.
    #[error("request head is incomplete")]
    Incomplete,

    /// The request line is neither `GET /path HTTP/1.x` nor `PUT /path HTTP/1.x`.
    #[error("malformed request line")]
    MalformedRequestLine,
}

/// Parses the request head held in `buf`.
///
/// Returns [`ParseError::Incomplete`] until the blank line has been received.
/// Only the request line and a `Content-Length` header are interpreted; other
/// header lines are skipped. Body bytes are left in place and located through
/// [`ParsedRequest::header_end`].
pub fn parse_request(buf: &[u8]) -> Result<ParsedRequest, ParseError> {
    let head_len = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let head = &buf[..head_len];

    let (request_line, header_lines) = match find(head, CRLF) {
        Some(pos) => (&head[..pos], &head[pos + CRLF.len()..]),
        None => (head, &[][..]),
    };

    let (method, path) = parse_request_line(request_line)?;

    Ok(ParsedRequest {
        method,
        path,
        content_length: content_length(header_lines),
        header_end: head_len + HEADER_TERMINATOR.len(),
    })
}

/// Tokenizes `METHOD SP "/" path SP "HTTP/1." ("0" | "1")`.
///
/// The path runs up to the last ` HTTP/1.` on the line, so it may itself
/// contain spaces. It must not be empty.
fn parse_request_line(line: &[u8]) -> Result<(Method, String), ParseError> {
    let space = line
        .iter()
        .position(|&b| b == b' ')
        .ok_or(ParseError::MalformedRequestLine)?;
    let method = Method::from_bytes(&line[..space]).ok_or(ParseError::MalformedRequestLine)?;

    let target = line[space + 1..]
        .strip_prefix(b"/")
        .ok_or(ParseError::MalformedRequestLine)?;

    let version_at = rfind(target, VERSION_PREFIX).ok_or(ParseError::MalformedRequestLine)?;
    match &target[version_at + VERSION_PREFIX.len()..] {
        b"0" | b"1" => {}
        _ => return Err(ParseError::MalformedRequestLine),
    }

    let path = &target[..version_at];
    if path.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    let path = std::str::from_utf8(path).map_err(|_| ParseError::MalformedRequestLine)?;
    Ok((method, path.to_string()))
}

/// Finds a numeric Content-Length among the header lines.
///
/// A header with a non-numeric value counts as absent.
fn content_length(header_lines: &[u8]) -> Option<usize> {
    header_lines
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter_map(|line| {
            let colon = line.iter().position(|&b| b == b':')?;
            let (name, value) = (&line[..colon], &line[colon + 1..]);
            name.eq_ignore_ascii_case(b"Content-Length").then_some(value)
        })
        .find_map(|value| std::str::from_utf8(value).ok()?.trim().parse().ok())
}

pub fn find_headers_end(buf: &[u8]) -> Option<usize> {
    find(buf, HEADER_TERMINATOR)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
