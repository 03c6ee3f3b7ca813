use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::ServerConfig;
use crate::http::parser::{parse_http_request, parse_truncated_request, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::router::Dispatcher;

const READ_CHUNK: usize = 4096;

/// Size limits applied while reading a request.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_header_bytes: usize,
    pub max_body_bytes: usize,
}

impl From<&ServerConfig> for Limits {
    fn from(cfg: &ServerConfig) -> Self {
        Self {
            max_header_bytes: cfg.max_header_bytes,
            max_body_bytes: cfg.max_body_bytes,
        }
    }
}

/// One accepted client connection, served once and then closed.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    dispatcher: Dispatcher,
    limits: Limits,
}

pub enum ConnectionState {
    Reading,
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, dispatcher: Dispatcher, limits: Limits) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            dispatcher,
            limits,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let result = self.drive().await;

        // Closed is reached on success and on error alike.
        self.state = ConnectionState::Closed;
        let _ = self.stream.shutdown().await;

        result
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(Ok(req)) => ConnectionState::Dispatching(req),
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Rejecting malformed request");
                            ConnectionState::Writing(ResponseWriter::new(&Response::bad_request()))
                        }
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Dispatching(req) => {
                    let response = self.dispatcher.dispatch(req).await;

                    tracing::info!(
                        method = %req.method,
                        path = %req.path,
                        status = response.status.as_u16(),
                        "Request served"
                    );

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until a full request head is buffered, then discards its body.
    ///
    /// `Ok(None)` means the client closed without sending anything;
    /// `Ok(Some(Err(_)))` is a protocol error that still deserves a response.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Result<Request, ParseError>>> {
        loop {
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    return Ok(Some(self.discard_body(request, consumed).await?));
                }

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() > self.limits.max_header_bytes {
                        return Ok(Some(Err(ParseError::HeadersTooLarge)));
                    }
                }

                Err(e) => return Ok(Some(Err(e))),
            }

            self.buffer.reserve(READ_CHUNK);
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                // Client half-closed mid-head; serve what the request line says.
                return Ok(Some(parse_truncated_request(&self.buffer)));
            }
        }
    }

    /// Reads the announced body off the socket without keeping it.
    ///
    /// A body over `max_body_bytes` is rejected before any of it is read.
    /// A client that closes early is still answered.
    async fn discard_body(
        &mut self,
        request: Request,
        head_len: usize,
    ) -> anyhow::Result<Result<Request, ParseError>> {
        let announced = request.content_length();
        if announced > self.limits.max_body_bytes {
            return Ok(Err(ParseError::BodyTooLarge));
        }

        let buffered = (self.buffer.len() - head_len).min(announced);
        self.buffer.clear();

        let remaining = (announced - buffered) as u64;
        if remaining > 0 {
            let mut body = (&mut self.stream).take(remaining);
            tokio::io::copy(&mut body, &mut tokio::io::sink()).await?;
        }

        Ok(Ok(request))
    }
}
