//! Test fixtures and utilities for reducing test setup duplication.
//!
//! Provides temp-directory helpers, a template zip builder, and a minimal
//! canned-response HTTP server so the release fetcher can be exercised
//! offline while capturing the requests it makes.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use tempfile::TempDir;

/// Create a temp directory in the system temp location.
///
/// Uses `crate::temp::temp_dir_base()` so temp dirs are never created under
/// the current working directory.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(crate::temp::temp_dir_base()).expect("Failed to create temp directory")
}

/// Write a template zip at `path` with the given entries.
///
/// Entry names ending in `/` become directories; everything else becomes a
/// file with the given contents. Parent directories implied by `a/b` style
/// names are handled by the extractor, so they need not be listed.
///
/// # Panics
///
/// Panics if the archive cannot be written.
pub fn build_template_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create zip file");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(name.trim_end_matches('/'), options)
                .expect("Failed to add zip directory");
        } else {
            writer.start_file(*name, options).expect("Failed to start zip file");
            writer
                .write_all(contents.as_bytes())
                .expect("Failed to write zip entry");
        }
    }
    writer.finish().expect("Failed to finish zip file");
}

/// A request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    headers: HashMap<String, String>,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers.get(&name.to_ascii_lowercase()).cloned()
    }
}

/// A canned HTTP response served by [`StubServer`].
pub struct StubResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    // When set, the Content-Length header promises this many bytes even
    // though only `body` is written; the connection then closes. Used to
    // simulate a mid-stream transport failure.
    promised_length: Option<u64>,
}

impl StubResponse {
    #[must_use]
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            promised_length: None,
        }
    }

    #[must_use]
    pub fn bytes(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: "application/octet-stream",
            body,
            promised_length: None,
        }
    }

    #[must_use]
    pub fn truncated(body: Vec<u8>, promised_length: u64) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            promised_length: Some(promised_length),
        }
    }
}

/// Single-threaded canned-response HTTP server bound to a loopback port.
///
/// Serves exactly one connection per configured response, in order, and
/// records each incoming request. Responses carry `Connection: close` so
/// every client request opens a fresh connection.
pub struct StubServer {
    addr: String,
    handle: Option<JoinHandle<()>>,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl StubServer {
    /// Bind to an ephemeral loopback port and serve `responses` in order.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[must_use]
    pub fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let addr = format!("http://{}", listener.local_addr().expect("no local addr"));
        let requests = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&requests);

        let handle = std::thread::spawn(move || {
            for response in responses {
                let Ok((stream, _)) = listener.accept() else {
                    return;
                };
                if let Some(request) = serve_connection(stream, &response) {
                    if let Ok(mut reqs) = captured.lock() {
                        reqs.push(request);
                    }
                }
            }
        });

        Self {
            addr,
            handle: Some(handle),
            requests,
        }
    }

    /// The server's base URL, e.g. `http://127.0.0.1:PORT`.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.addr.clone()
    }

    /// Wait for all configured responses to be served and return the
    /// captured requests.
    ///
    /// # Panics
    ///
    /// Panics if the server thread panicked.
    pub fn finish(mut self) -> Vec<CapturedRequest> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("stub server thread panicked");
        }
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

fn serve_connection(stream: TcpStream, response: &StubResponse) -> Option<CapturedRequest> {
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .ok()?;
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).ok()?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let mut stream = reader.into_inner();
    let reason = match response.status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Status",
    };
    let content_length = response
        .promised_length
        .unwrap_or(response.body.len() as u64);
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        response.status, reason, response.content_type, content_length
    );
    stream.write_all(head.as_bytes()).ok()?;
    stream.write_all(&response.body).ok()?;
    let _ = stream.flush();
    // Drain anything the client may still be sending, then let the socket
    // close when the stream drops.
    let _ = stream.set_read_timeout(Some(Duration::from_millis(50)));
    let mut sink = [0u8; 256];
    let _ = stream.read(&mut sink);

    Some(CapturedRequest {
        method,
        path,
        headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_template_zip_round_trips() {
        let temp = create_temp_dir();
        let zip_path = temp.path().join("t.zip");
        build_template_zip(&zip_path, &[("proj/", ""), ("proj/a.txt", "hello")]);

        let file = std::fs::File::open(&zip_path).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.len(), 2);
        let mut entry = archive.by_name("proj/a.txt").unwrap();
        let mut contents = String::new();
        entry.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "hello");
    }

    #[test]
    fn test_stub_server_captures_request() {
        let server = StubServer::start(vec![StubResponse::json(200, "{}")]);
        let url = format!("{}/hello", server.base_url());
        let body = reqwest::blocking::Client::new()
            .get(&url)
            .header("X-Probe", "yes")
            .send()
            .unwrap()
            .text()
            .unwrap();
        assert_eq!(body, "{}");

        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/hello");
        assert_eq!(requests[0].header("x-probe").as_deref(), Some("yes"));
    }
}
