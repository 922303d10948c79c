use courier::http::request::{Method, ParsedRequest};

fn put(content_length: Option<usize>, header_end: usize) -> ParsedRequest {
    ParsedRequest {
        method: Method::PUT,
        path: "upload.txt".to_string(),
        content_length,
        header_end,
    }
}

#[test]
fn test_request_method_from_bytes() {
    assert_eq!(Method::from_bytes(b"GET"), Some(Method::GET));
    assert_eq!(Method::from_bytes(b"PUT"), Some(Method::PUT));
    assert_eq!(Method::from_bytes(b"POST"), None);
    assert_eq!(Method::from_bytes(b"get"), None); // Case-sensitive
    assert_eq!(Method::from_bytes(b""), None);
}

#[test]
fn test_request_method_display() {
    assert_eq!(Method::GET.to_string(), "GET");
    assert_eq!(Method::PUT.as_str(), "PUT");
}

#[test]
fn test_received_body_starts_after_headers() {
    let buf = b"HEAD\r\n\r\nbody bytes";
    let req = put(Some(10), 8);

    assert_eq!(req.received_body(buf), b"body bytes");
    assert!(req.body_complete(buf));
}

#[test]
fn test_received_body_with_extra_bytes() {
    let buf = b"HEAD\r\n\r\nbody bytes and more";
    let req = put(Some(10), 8);

    assert!(req.body_complete(buf));
}

#[test]
fn test_received_body_empty_when_offset_past_buffer() {
    let req = put(Some(1), 100);
    assert_eq!(req.received_body(b"short"), b"");
    assert!(!req.body_complete(b"short"));
}

#[test]
fn test_zero_length_body_is_complete() {
    let buf = b"HEAD\r\n\r\n";
    assert!(put(Some(0), 8).body_complete(buf));
}

#[test]
fn test_missing_content_length_never_completes() {
    let buf = b"HEAD\r\n\r\nanything at all";
    assert!(!put(None, 8).body_complete(buf));
}
