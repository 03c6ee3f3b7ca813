use crate::http::request::{split_target, Method, Request};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line is not exactly `METHOD SP target SP version`
    InvalidRequest,
    InvalidContentLength,
    /// Request line and headers exceed the configured limit
    HeadersTooLarge,
    /// Announced body exceeds the configured limit
    BodyTooLarge,
    Incomplete,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::HeadersTooLarge => "request headers too large",
            ParseError::BodyTooLarge => "request body too large",
            ParseError::Incomplete => "incomplete request",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Parses a complete request head from `buf`.
///
/// Returns the request and the number of head bytes consumed, or
/// `ParseError::Incomplete` when the blank line has not arrived yet. Any
/// body is left in the buffer for the caller to discard.
///
/// Only the request line must be valid UTF-8. Header bytes are decoded
/// lossily and lines without a `:` are skipped.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let (head_end, consumed) = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let head = &buf[..head_end];

    let (line, header_bytes) = match head.iter().position(|&b| b == b'\n') {
        Some(pos) => (&head[..pos], &head[pos + 1..]),
        None => (head, &[][..]),
    };
    let mut request = parse_line_bytes(line)?;

    for line in String::from_utf8_lossy(header_bytes).lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };

        request
            .headers
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    if let Some(value) = request.header("Content-Length") {
        value.parse::<usize>().map_err(|_| ParseError::InvalidContentLength)?;
    }

    Ok((request, consumed))
}

/// Parses a request line into a request with no headers.
///
/// The line must split on whitespace into exactly three tokens.
pub fn parse_request_line(line: &str) -> Result<Request, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() {
        return Err(ParseError::InvalidRequest);
    }

    let (path, query) = split_target(target);

    Ok(Request {
        method: Method::parse(method),
        path: path.to_string(),
        query: query.map(str::to_string),
        version: version.to_string(),
        headers: HashMap::new(),
    })
}

/// Best-effort parse of a head the client stopped sending before the blank
/// line: only the first line is looked at.
pub fn parse_truncated_request(buf: &[u8]) -> Result<Request, ParseError> {
    let line_end = buf
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(buf.len());

    parse_line_bytes(&buf[..line_end])
}

fn parse_line_bytes(line: &[u8]) -> Result<Request, ParseError> {
    let line = std::str::from_utf8(line)
        .map_err(|_| ParseError::InvalidRequest)?;

    parse_request_line(line.trim_end_matches('\r'))
}

/// Locates the blank line ending the head, as `(head_end, consumed)`.
///
/// Both `\r\n\r\n` and bare `\n\n` terminate the head. `head_end` points
/// at the first newline of the terminator; `consumed` is just past it.
pub fn find_headers_end(buf: &[u8]) -> Option<(usize, usize)> {
    buf.iter()
        .enumerate()
        .filter(|(_, b)| **b == b'\n')
        .find_map(|(i, _)| {
            let rest = &buf[i + 1..];
            if rest.starts_with(b"\n") {
                Some((i, i + 2))
            } else if rest.starts_with(b"\r\n") {
                Some((i, i + 3))
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.query, None);
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn head_terminators() {
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\n\r\n"), Some((15, 18)));
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\n\n"), Some((14, 16)));
        assert_eq!(find_headers_end(b"GET / HTTP/1.1\r\nHost: x\r\n"), None);
    }

    #[test]
    fn truncated_head_uses_first_line() {
        let parsed = parse_truncated_request(b"GET /pi HTTP/1.0\r\nHost: x").unwrap();
        assert_eq!(parsed.path, "/pi");
        assert_eq!(parsed.version, "HTTP/1.0");
    }
}
