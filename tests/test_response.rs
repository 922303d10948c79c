use courier::http::response::{HTTP_VERSION, StatusCode};

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
}

#[test]
fn test_status_heads_are_exact() {
    assert_eq!(StatusCode::Ok.head(), b"HTTP/1.0 200 OK\r\n\r\n");
    assert_eq!(StatusCode::NotFound.head(), b"HTTP/1.0 404 Not Found\r\n\r\n");
}

#[test]
fn test_head_matches_display() {
    for status in [StatusCode::Ok, StatusCode::NotFound] {
        let expected = format!("{status}\r\n\r\n");
        assert_eq!(status.head(), expected.as_bytes());
        assert!(expected.starts_with(HTTP_VERSION));
    }
}
