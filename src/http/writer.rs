use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Header order on the wire; anything else follows alphabetically.
const LEADING_HEADERS: [&str; 2] = ["Content-Type", "Content-Length"];

pub fn serialize_response(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(128 + resp.body.len());

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    let is_leading = |key: &str| LEADING_HEADERS.iter().any(|name| name.eq_ignore_ascii_case(key));

    let mut rest: Vec<(&String, &String)> = resp
        .headers
        .iter()
        .filter(|(k, _)| !is_leading(k))
        .collect();
    rest.sort();

    let leading = LEADING_HEADERS.iter().filter_map(|name| {
        resp.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
    });

    for (k, v) in leading.chain(rest) {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf.extend_from_slice(&resp.body);

    buf
}

pub struct ResponseWriter {
    buffer: Vec<u8>,
    written: usize,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            buffer: serialize_response(response),
            written: 0,
        }
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream
                .write(&self.buffer[self.written..])
                .await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::{ResponseBuilder, StatusCode};

    #[test]
    fn frames_status_type_and_length_first() {
        let resp = ResponseBuilder::new(StatusCode::Ok)
            .header("Content-Type", "text/css")
            .body("a{}")
            .build();

        let wire = String::from_utf8(serialize_response(&resp)).unwrap();

        assert_eq!(
            wire,
            "HTTP/1.1 200 OK\r\nContent-Type: text/css\r\nContent-Length: 3\r\nConnection: close\r\n\r\na{}"
        );
    }

    #[test]
    fn lowercase_content_type_still_leads() {
        let resp = ResponseBuilder::new(StatusCode::Ok)
            .header("content-type", "text/csv")
            .header("X-Trace", "1")
            .body("a,b")
            .build();

        let wire = String::from_utf8(serialize_response(&resp)).unwrap();

        assert!(wire.starts_with("HTTP/1.1 200 OK\r\ncontent-type: text/csv\r\nContent-Length: 3\r\n"));
        assert_eq!(wire.matches("text/csv").count(), 1);
    }

    #[tokio::test]
    async fn writes_whole_buffer() {
        let resp = Response::not_found();
        let mut out = Vec::new();

        ResponseWriter::new(&resp).write_to_stream(&mut out).await.unwrap();

        assert!(out.starts_with(b"HTTP/1.1 404 Not Found\r\n"));
        assert!(out.ends_with(b"404 Not Found"));
    }
}
