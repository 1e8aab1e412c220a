//! HTTP endpoint: `POST /compile` with SQL in the body, JSON documents back.
//!
//! Speaks just enough HTTP/1.1 for that one route. The body is framed by
//! `Content-Length` or `Transfer-Encoding: chunked`. Each connection carries a
//! single request and is closed after the response.

use std::io;

use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use super::CliError;
use crate::compiler::CompileOptions;
use crate::output;

pub const DEFAULT_PORT: u16 = 1337;
pub const DEFAULT_MAX_BODY: usize = 1024 * 1024;
const MAX_HEAD_BYTES: u64 = 16 * 1024;

/// Options for the serve command
#[derive(Debug, Clone)]
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    /// Compile with strict field checking
    pub strict: bool,
    /// Largest accepted request body in bytes
    pub max_body: usize,
}

impl Default for ServeOptions {
    fn default() -> Self {
        ServeOptions {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            strict: false,
            max_body: DEFAULT_MAX_BODY,
        }
    }
}

/// Bind and accept connections forever. Only returns if binding fails.
pub async fn serve(options: ServeOptions) -> Result<(), CliError> {
    let listener = TcpListener::bind((options.host.as_str(), options.port)).await?;
    info!(address = %listener.local_addr()?, "listening");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "accept failed");
                continue;
            }
        };

        let options = options.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &options).await {
                warn!(%peer, error = %e, "connection failed");
            }
        });
    }
}

/// Read one request from `stream`, answer it, and shut the stream down.
pub async fn handle_connection<S>(stream: S, options: &ServeOptions) -> io::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);

    let response = match read_request(&mut reader, options.max_body).await {
        Ok(request) => {
            let response = respond(&request, options);
            info!(
                method = %request.method,
                path = %request.path,
                status = response.status,
                "request"
            );
            response
        }
        Err(RequestError::Io(e)) => return Err(e),
        Err(e) => {
            warn!(error = %e, "rejecting request");
            Response::error(e.status(), &e.to_string())
        }
    };

    writer.write_all(&response.to_bytes()).await?;
    writer.shutdown().await
}

#[derive(Debug)]
struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("malformed request: {0}")]
    Malformed(&'static str),

    #[error("request body exceeds {0} bytes")]
    TooLarge(usize),

    #[error("missing Content-Length")]
    LengthRequired,

    #[error("unsupported Transfer-Encoding: {0}")]
    UnsupportedEncoding(String),
}

impl RequestError {
    fn status(&self) -> u16 {
        match self {
            RequestError::Io(_) => 500,
            RequestError::Malformed(_) => 400,
            RequestError::TooLarge(_) => 413,
            RequestError::LengthRequired => 411,
            RequestError::UnsupportedEncoding(_) => 501,
        }
    }
}

async fn read_request<R>(reader: &mut R, max_body: usize) -> Result<Request, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let (method, path, framing) = {
        let mut head = (&mut *reader).take(MAX_HEAD_BYTES);
        let mut line = String::new();

        if read_head_line(&mut head, &mut line).await? == 0 {
            return Err(RequestError::Malformed("empty request"));
        }
        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(_version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(RequestError::Malformed("bad request line"));
        };
        let method = method.to_string();
        let path = target.split('?').next().unwrap_or(target).to_string();

        let mut content_length = None;
        let mut transfer_encoding = None;
        loop {
            line.clear();
            if read_head_line(&mut head, &mut line).await? == 0 {
                return Err(RequestError::Malformed("unterminated headers"));
            }
            let header = line.trim_end_matches(['\r', '\n']);
            if header.is_empty() {
                break;
            }
            let (name, value) = header
                .split_once(':')
                .ok_or(RequestError::Malformed("bad header"))?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                let length = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| RequestError::Malformed("bad Content-Length"))?;
                content_length = Some(length);
            } else if name.trim().eq_ignore_ascii_case("transfer-encoding") {
                transfer_encoding = Some(value.trim().to_string());
            }
        }

        // Transfer-Encoding overrides Content-Length when both are sent.
        let framing = match (transfer_encoding, content_length) {
            (Some(encoding), _) if encoding.eq_ignore_ascii_case("chunked") => Framing::Chunked,
            (Some(encoding), _) => return Err(RequestError::UnsupportedEncoding(encoding)),
            (None, Some(length)) => Framing::Length(length),
            (None, None) if method == "POST" => return Err(RequestError::LengthRequired),
            (None, None) => Framing::Length(0),
        };

        (method, path, framing)
    };

    let body = match framing {
        Framing::Length(length) => {
            if length > max_body {
                return Err(RequestError::TooLarge(max_body));
            }
            let mut body = vec![0u8; length];
            reader.read_exact(&mut body).await?;
            body
        }
        Framing::Chunked => read_chunked(reader, max_body).await?,
    };

    Ok(Request { method, path, body })
}

enum Framing {
    Length(usize),
    Chunked,
}

/// Decode a chunked body, trailers included. Fails as soon as the decoded
/// size would pass `max_body`.
async fn read_chunked<R>(reader: &mut R, max_body: usize) -> Result<Vec<u8>, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    let mut body = Vec::new();
    let mut line = String::new();

    loop {
        read_chunk_line(reader, &mut line).await?;
        let size = line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size, 16)
            .map_err(|_| RequestError::Malformed("bad chunk size"))?;
        if size == 0 {
            break;
        }
        if size > max_body - body.len() {
            return Err(RequestError::TooLarge(max_body));
        }

        let start = body.len();
        body.resize(start + size, 0);
        reader.read_exact(&mut body[start..]).await?;

        read_chunk_line(reader, &mut line).await?;
        if !line.trim_end_matches(['\r', '\n']).is_empty() {
            return Err(RequestError::Malformed("chunk not followed by CRLF"));
        }
    }

    loop {
        read_chunk_line(reader, &mut line).await?;
        if line.trim_end_matches(['\r', '\n']).is_empty() {
            return Ok(body);
        }
    }
}

async fn read_chunk_line<R>(reader: &mut R, line: &mut String) -> Result<(), RequestError>
where
    R: AsyncBufRead + Unpin,
{
    line.clear();
    let mut limited = (&mut *reader).take(MAX_HEAD_BYTES);
    if read_head_line(&mut limited, line).await? == 0 {
        return Err(RequestError::Malformed("truncated chunked body"));
    }
    Ok(())
}

async fn read_head_line<R>(head: &mut R, line: &mut String) -> Result<usize, RequestError>
where
    R: AsyncBufRead + Unpin,
{
    match head.read_line(line).await {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            Err(RequestError::Malformed("header is not UTF-8"))
        }
        Err(e) => Err(e.into()),
    }
}

fn respond(request: &Request, options: &ServeOptions) -> Response {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/compile") => compile_body(&request.body, options),
        (_, "/compile") => Response::error(405, "only POST is allowed on /compile"),
        _ => Response::error(404, "not found"),
    }
}

fn compile_body(body: &[u8], options: &ServeOptions) -> Response {
    let compile_options = CompileOptions {
        strict_fields: options.strict,
    };

    let docs = match crate::compile_source_with(body, compile_options) {
        Ok(docs) => docs,
        Err(e) => {
            warn!(error = %e, "compile failed");
            return Response::error(422, &e.to_string());
        }
    };

    match output::to_json(&docs) {
        Ok(json) => Response::json(200, json),
        Err(e) => {
            error!(error = %e, "encoding failed");
            Response::error(500, "failed to encode result")
        }
    }
}

struct Response {
    status: u16,
    body: String,
}

impl Response {
    fn json(status: u16, body: String) -> Self {
        Response { status, body }
    }

    fn error(status: u16, message: &str) -> Self {
        Response {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            reason_phrase(self.status),
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        411 => "Length Required",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        501 => "Not Implemented",
        _ => "Internal Server Error",
    }
}
