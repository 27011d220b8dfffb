//! Scripted single-shot HTTP server for exercising the client over sockets.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

/// How long tests wait for the server to report a captured request.
const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

/// A request as received by [`ScriptedServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request line, e.g. `POST /api/predict HTTP/1.1`.
    pub request_line: String,
    /// Header names and values in arrival order.
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8.
    pub body: String,
}

impl CapturedRequest {
    /// Value of the first header called `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Server answering exactly one connection with a canned response.
pub struct ScriptedServer {
    base_url: String,
    captured: Receiver<CapturedRequest>,
}

impl ScriptedServer {
    /// Answer immediately with `status` and a JSON `body`.
    pub fn respond(status: u16, body: &str) -> Self {
        Self::respond_after(Duration::ZERO, status, body)
    }

    /// Answer with `status` and a JSON `body` once `delay` has elapsed.
    pub fn respond_after(delay: Duration, status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .unwrap_or_else(|err| panic!("failed to bind scripted server: {err}"));
        let address = listener
            .local_addr()
            .unwrap_or_else(|err| panic!("failed to read scripted server address: {err}"));
        let (tx, captured) = mpsc::channel();
        let response = render_response(status, body);

        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let Some(request) = read_request(&stream) else {
                return;
            };
            let _ = tx.send(request);
            thread::sleep(delay);
            let mut writer = &stream;
            // The client may have given up already; a failed write is fine.
            let _ = writer.write_all(response.as_bytes());
            let _ = writer.flush();
        });

        Self {
            base_url: format!("http://{address}"),
            captured,
        }
    }

    /// Origin the server listens on.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request the server received.
    pub fn captured(&self) -> CapturedRequest {
        self.captured
            .recv_timeout(CAPTURE_TIMEOUT)
            .unwrap_or_else(|err| panic!("scripted server saw no request: {err}"))
    }
}

/// An origin nothing listens on, so connecting is refused.
pub fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .unwrap_or_else(|err| panic!("failed to reserve a port: {err}"));
    let address = listener
        .local_addr()
        .unwrap_or_else(|err| panic!("failed to read reserved address: {err}"));
    drop(listener);
    format!("http://{address}")
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

fn render_response(status: u16, body: &str) -> String {
    format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {length}\r\nConnection: close\r\n\r\n{body}",
        reason = reason_phrase(status),
        length = body.len(),
    )
}

fn read_request(stream: &TcpStream) -> Option<CapturedRequest> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            headers.push((name.trim().to_owned(), value.trim().to_owned()));
        }
    }

    let length = headers
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0_u8; length];
    reader.read_exact(&mut body).ok()?;

    Some(CapturedRequest {
        request_line: request_line.trim_end().to_owned(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
