//! Minimal HTTP/1.1 server for upload tests.
//!
//! Accepts any request, records method/target/api-key/body, and answers with a
//! configurable status. Tracks how many requests are being served at once so
//! tests can assert the queue never overlaps transfers. Handles libcurl's
//! `Expect: 100-continue` handshake for multipart POSTs.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One recorded request, enough to assert on routing, auth, and payload.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub target: String,
    pub api_key: Option<String>,
    pub body: Vec<u8>,
}

/// Server behavior knobs.
#[derive(Debug, Clone)]
pub struct UploadServerOptions {
    /// Status code for responses (default 200).
    pub status: u32,
    /// Response body served with every response.
    pub response_body: String,
    /// Requests whose target contains this substring get `fail_status` instead.
    pub fail_target: Option<&'static str>,
    pub fail_status: u32,
    /// Hold each request open for this long (widens race windows).
    pub delay: Option<Duration>,
}

impl Default for UploadServerOptions {
    fn default() -> Self {
        Self {
            status: 200,
            response_body: "ok".to_string(),
            fail_target: None,
            fail_status: 500,
            delay: None,
        }
    }
}

/// Shared view of what the server has seen.
#[derive(Default)]
pub struct ServerState {
    pub requests: Mutex<Vec<RecordedRequest>>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl ServerState {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Highest number of requests that were ever in flight simultaneously.
    pub fn max_in_flight(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn targets(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.target.clone())
            .collect()
    }
}

/// Starts the server in a background thread. Returns the base URL (no trailing
/// slash) and the shared state. The server runs until the process exits.
pub fn start(opts: UploadServerOptions) -> (String, Arc<ServerState>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new(ServerState::default());
    let accept_state = Arc::clone(&state);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&accept_state);
            let opts = opts.clone();
            thread::spawn(move || handle(stream, &state, &opts));
        }
    });
    (format!("http://127.0.0.1:{}", port), state)
}

fn handle(stream: TcpStream, state: &ServerState, opts: &UploadServerOptions) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    match reader.read_line(&mut request_line) {
        Ok(0) | Err(_) => return,
        Ok(_) => {}
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let target = parts.next().unwrap_or("").to_string();

    let now_active = state.active.fetch_add(1, Ordering::SeqCst) + 1;
    state.max_active.fetch_max(now_active, Ordering::SeqCst);

    let mut content_length = 0usize;
    let mut api_key = None;
    let mut expect_continue = false;
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => {
                state.active.fetch_sub(1, Ordering::SeqCst);
                return;
            }
            Ok(_) => {}
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            if name.eq_ignore_ascii_case("x-api-key") {
                api_key = Some(value.to_string());
            }
            if name.eq_ignore_ascii_case("expect") && value.eq_ignore_ascii_case("100-continue") {
                expect_continue = true;
            }
        }
    }

    if expect_continue {
        let _ = reader.get_mut().write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        state.active.fetch_sub(1, Ordering::SeqCst);
        return;
    }

    if let Some(delay) = opts.delay {
        thread::sleep(delay);
    }

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        target: target.clone(),
        api_key,
        body,
    });

    let failing = opts
        .fail_target
        .map_or(false, |needle| target.contains(needle));
    let status = if failing { opts.fail_status } else { opts.status };
    let reason = if (200..300).contains(&status) {
        "OK"
    } else {
        "Error"
    };
    let payload = opts.response_body.as_bytes();
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason,
        payload.len()
    );
    let out = reader.get_mut();
    let _ = out.write_all(head.as_bytes());
    let _ = out.write_all(payload);

    state.active.fetch_sub(1, Ordering::SeqCst);
}
