use microserve::http::parser::{ParseError, parse_http_request, parse_request_line};
use microserve::http::request::Method;

#[test]
fn test_parse_simple_get_request() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::GET);
    assert_eq!(parsed.path, "/");
    assert_eq!(parsed.query, None);
    assert_eq!(parsed.version, "HTTP/1.1");
    assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
    assert_eq!(consumed, req.len());
}

#[test]
fn test_parse_request_with_path_and_query_string() {
    let req = b"GET /search?q=rust&page=2 HTTP/1.1\r\nHost: example.com\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();

    assert_eq!(parsed.path, "/search");
    assert_eq!(parsed.query.as_deref(), Some("q=rust&page=2"));
    assert_eq!(parsed.value("q"), "rust");
}

#[test]
fn test_target_split_on_first_question_mark() {
    let parsed = parse_request_line("GET /a?b=c?d HTTP/1.1").unwrap();
    assert_eq!(parsed.path, "/a");
    assert_eq!(parsed.query.as_deref(), Some("b=c?d"));
}

#[test]
fn test_empty_query_is_present_but_empty() {
    let parsed = parse_request_line("GET /a? HTTP/1.1").unwrap();
    assert_eq!(parsed.query.as_deref(), Some(""));
    assert_eq!(parsed.value("x"), "");
}

#[test]
fn test_parse_post_request_leaves_body_unconsumed() {
    let req = b"POST /api HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();

    assert_eq!(parsed.method, Method::POST);
    assert_eq!(parsed.content_length(), 5);
    assert_eq!(&req[consumed..], b"hello");
}

#[test]
fn test_parse_incomplete_request_missing_blank_line() {
    let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::Incomplete);
}

#[test]
fn test_partial_body_does_not_block_head() {
    let req = b"POST /api HTTP/1.1\r\nContent-Length: 10\r\n\r\nhello";
    let (parsed, consumed) = parse_http_request(req).unwrap();
    assert_eq!(parsed.path, "/api");
    assert_eq!(req.len() - consumed, 5);
}

#[test]
fn test_bare_lf_terminates_head() {
    let req = b"GET /pi HTTP/1.1\nHost: x\n\n";
    let (parsed, consumed) = parse_http_request(req).unwrap();
    assert_eq!(parsed.path, "/pi");
    assert_eq!(parsed.header("host"), Some("x"));
    assert_eq!(consumed, req.len());
}

#[test]
fn test_request_line_needs_exactly_three_tokens() {
    for line in ["", "GET", "GET /", "GET / HTTP/1.1 extra", "   "] {
        assert_eq!(
            parse_request_line(line).unwrap_err(),
            ParseError::InvalidRequest,
            "line {:?}",
            line
        );
    }

    let req = b"GARBAGE\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidRequest);
}

#[test]
fn test_unknown_method_is_kept() {
    let req = b"BREW /pot HTTP/1.1\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();
    assert_eq!(parsed.method, Method::Extension("BREW".to_string()));
    assert_eq!(parsed.method.as_str(), "BREW");
}

#[test]
fn test_header_line_without_colon_is_skipped() {
    let req = b"GET / HTTP/1.1\r\nBrokenHeader\r\nHost: x\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();
    assert_eq!(parsed.headers.len(), 1);
    assert_eq!(parsed.header("Host"), Some("x"));
}

#[test]
fn test_non_utf8_header_value_is_decoded_lossily() {
    let req = b"GET /pi HTTP/1.1\r\nUser-Agent: caf\xe9\r\n\r\n";
    let (parsed, _) = parse_http_request(req).unwrap();
    assert_eq!(parsed.path, "/pi");
    assert_eq!(parsed.header("User-Agent"), Some("caf\u{fffd}"));
}

#[test]
fn test_non_utf8_request_line_is_rejected() {
    let req = b"GET /caf\xe9 HTTP/1.1\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidRequest);
}

#[test]
fn test_parse_invalid_content_length() {
    let req = b"POST / HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
    assert_eq!(parse_http_request(req).unwrap_err(), ParseError::InvalidContentLength);
}

#[test]
fn test_parse_various_http_methods() {
    let methods = vec![
        ("GET", Method::GET),
        ("POST", Method::POST),
        ("PUT", Method::PUT),
        ("DELETE", Method::DELETE),
        ("HEAD", Method::HEAD),
        ("OPTIONS", Method::OPTIONS),
        ("PATCH", Method::PATCH),
    ];

    for (method_str, expected_method) in methods {
        let req = format!("{} / HTTP/1.1\r\n\r\n", method_str);
        let (parsed, _) = parse_http_request(req.as_bytes()).unwrap();
        assert_eq!(parsed.method, expected_method);
    }
}
