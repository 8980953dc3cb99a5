//! Integration tests for the webhook handler against a mock HTTP server.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use rstest::{fixture, rstest};

use crate::handler::{Handler, HandlerError};
use crate::level::Level;
use crate::log_record::{ExceptionInfo, LogRecord};

use super::SlackHandler;
use super::config::WebhookConfig;

/// One scripted response for the mock server.
#[derive(Clone, Copy, Debug)]
struct MockResponse {
    status: u16,
    retry_after: Option<u64>,
}

impl MockResponse {
    fn ok() -> Self {
        Self {
            status: 200,
            retry_after: None,
        }
    }

    fn status(status: u16) -> Self {
        Self {
            status,
            retry_after: None,
        }
    }

    fn rate_limited(retry_after: u64) -> Self {
        Self {
            status: 429,
            retry_after: Some(retry_after),
        }
    }
}

#[derive(Debug)]
struct CapturedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: String,
    received_at: Instant,
}

fn status_text(code: u16) -> &'static str {
    match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        410 => "Gone",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Parses a single header line into a key-value pair.
fn parse_header_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.split_once(':')
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
}

/// Reads all headers from the request and returns them with the content length.
fn read_headers(reader: &mut BufReader<TcpStream>) -> (Vec<(String, String)>, usize) {
    let mut headers = Vec::new();
    let mut content_length = 0usize;

    loop {
        let mut line = String::new();
        reader.read_line(&mut line).expect("read header");
        if line.trim().is_empty() {
            break;
        }
        let Some((key, value)) = parse_header_line(&line) else {
            continue;
        };
        if key == "content-length" {
            content_length = value.parse().unwrap_or(0);
        }
        headers.push((key, value));
    }

    (headers, content_length)
}

fn read_http_request(stream: &mut TcpStream) -> CapturedRequest {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .expect("read request line");
    let parts: Vec<&str> = request_line.trim().split(' ').collect();
    let method = parts.first().unwrap_or(&"").to_string();
    let path = parts.get(1).unwrap_or(&"").to_string();

    let (headers, content_length) = read_headers(&mut reader);
    let mut body = vec![0u8; content_length];
    if content_length > 0 {
        reader.read_exact(&mut body).expect("read body");
    }

    CapturedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).to_string(),
        received_at: Instant::now(),
    }
}

/// Spawn a mock server that answers successive requests with the scripted
/// responses, capturing each request. Once the script is exhausted the
/// server stops accepting.
fn spawn_mock_server(
    listener: TcpListener,
    script: Vec<MockResponse>,
) -> (SocketAddr, mpsc::Receiver<CapturedRequest>) {
    let addr = listener.local_addr().expect("listener has address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for response in script {
            let Ok((mut stream, _)) = listener.accept() else {
                break;
            };
            let captured = read_http_request(&mut stream);
            let retry_header = response
                .retry_after
                .map(|secs| format!("Retry-After: {secs}\r\n"))
                .unwrap_or_default();
            let raw = format!(
                "HTTP/1.1 {} {}\r\n{}Content-Length: 0\r\n\r\n",
                response.status,
                status_text(response.status),
                retry_header
            );
            let _ = stream.write_all(raw.as_bytes());
            let _ = tx.send(captured);
        }
    });

    (addr, rx)
}

#[fixture]
fn tcp_listener() -> TcpListener {
    TcpListener::bind(("127.0.0.1", 0)).expect("bind ephemeral listener")
}

/// Handler wired for fast tests: short tick, short timeouts.
fn build_handler(addr: SocketAddr, max_retries: u32) -> SlackHandler {
    let config = WebhookConfig {
        url: format!("http://{}/hook", addr),
        max_retries,
        tick: Duration::from_millis(10),
        connect_timeout: Duration::from_secs(5),
        write_timeout: Duration::from_secs(5),
        ..Default::default()
    };
    SlackHandler::with_config(config)
}

fn send_info_record(handler: &SlackHandler, message: &str) {
    let record = LogRecord::new("test", Level::Info, message);
    handler.handle(record).expect("enqueue");
}

fn recv_request(rx: &mpsc::Receiver<CapturedRequest>) -> CapturedRequest {
    rx.recv_timeout(Duration::from_secs(5)).expect("request")
}

#[rstest]
fn posts_block_kit_json(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok()]);
    let handler = build_handler(addr, 3);
    send_info_record(&handler, "test message");

    let captured = recv_request(&rx);
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/hook");
    let content_type = captured
        .headers
        .iter()
        .find(|(k, _)| k == "content-type")
        .map(|(_, v)| v.as_str())
        .unwrap_or("");
    assert_eq!(content_type, "application/json");

    let body: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(body["blocks"][0]["type"], "section");
    assert_eq!(body["blocks"][0]["text"]["type"], "mrkdwn");
    assert_eq!(body["blocks"][0]["text"]["text"], "test message");

    drop(handler);
}

#[rstest]
fn exception_block_reaches_the_wire(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok()]);
    let handler = build_handler(addr, 3);
    let record = LogRecord::new("test", Level::Error, "boom")
        .with_exception(ExceptionInfo::new("ValueError: bad"));
    handler.handle(record).expect("enqueue");

    let captured = recv_request(&rx);
    let body: serde_json::Value = serde_json::from_str(&captured.body).expect("json body");
    assert_eq!(body["blocks"][1]["text"]["text"], "```ValueError: bad\n```");

    drop(handler);
}

#[rstest]
fn delivers_payloads_in_fifo_order(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok(); 3]);
    let handler = build_handler(addr, 3);
    for message in ["first", "second", "third"] {
        send_info_record(&handler, message);
    }

    for expected in ["first", "second", "third"] {
        let captured = recv_request(&rx);
        assert!(
            captured.body.contains(expected),
            "expected {expected} in {}",
            captured.body
        );
    }

    drop(handler);
}

#[rstest]
fn retries_on_429_honouring_retry_after(tcp_listener: TcpListener) {
    let script = vec![MockResponse::rate_limited(1), MockResponse::ok()];
    let (addr, rx) = spawn_mock_server(tcp_listener, script);
    let handler = build_handler(addr, 3);
    send_info_record(&handler, "rate limited");

    let first = recv_request(&rx);
    let second = recv_request(&rx);
    assert_eq!(first.body, second.body);
    let gap = second.received_at.duration_since(first.received_at);
    assert!(gap >= Duration::from_secs(1), "retry came after {gap:?}");

    drop(handler);
}

#[rstest]
fn missing_retry_after_falls_back_to_the_tick(tcp_listener: TcpListener) {
    let script = vec![MockResponse::status(429), MockResponse::ok()];
    let (addr, rx) = spawn_mock_server(tcp_listener, script);
    let handler = build_handler(addr, 3);
    send_info_record(&handler, "no header");

    let first = recv_request(&rx);
    let second = recv_request(&rx);
    assert_eq!(first.body, second.body);

    drop(handler);
}

#[rstest]
fn drops_payload_after_exhausting_the_retry_budget(tcp_listener: TcpListener) {
    // Budget of one: the first payload gets an initial send plus one retry,
    // both rate limited, then the worker moves on to the next payload.
    let script = vec![
        MockResponse::status(429),
        MockResponse::status(429),
        MockResponse::ok(),
    ];
    let (addr, rx) = spawn_mock_server(tcp_listener, script);
    let handler = build_handler(addr, 1);
    send_info_record(&handler, "doomed");
    send_info_record(&handler, "survivor");

    let first = recv_request(&rx);
    let second = recv_request(&rx);
    assert!(first.body.contains("doomed"));
    assert!(second.body.contains("doomed"));
    let third = recv_request(&rx);
    assert!(third.body.contains("survivor"));

    drop(handler);
}

#[rstest]
#[case(400)]
#[case(404)]
#[case(410)]
#[case(500)]
fn terminal_statuses_are_not_retried(#[case] status: u16, tcp_listener: TcpListener) {
    let script = vec![MockResponse::status(status), MockResponse::ok()];
    let (addr, rx) = spawn_mock_server(tcp_listener, script);
    let handler = build_handler(addr, 3);
    send_info_record(&handler, "rejected");
    send_info_record(&handler, "accepted");

    let first = recv_request(&rx);
    assert!(first.body.contains("rejected"));
    // The status is terminal: the next request must already be the next
    // payload.
    let second = recv_request(&rx);
    assert!(second.body.contains("accepted"));

    drop(handler);
}

#[rstest]
fn transport_errors_do_not_stall_the_worker(tcp_listener: TcpListener) {
    // First payload goes to a closed port, second to the live server.
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok()]);
    let dead = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
    let dead_addr = dead.local_addr().expect("addr");
    drop(dead);

    let failing = build_handler(dead_addr, 3);
    send_info_record(&failing, "into the void");
    assert!(failing.flush());
    drop(failing);

    let handler = build_handler(addr, 3);
    send_info_record(&handler, "alive");
    assert!(handler.flush());
    let captured = recv_request(&rx);
    assert!(captured.body.contains("alive"));
    drop(handler);
}

#[rstest]
fn enqueue_never_blocks_with_an_idle_consumer(tcp_listener: TcpListener) {
    // The listener never accepts, so the worker makes no progress while
    // ten thousand payloads are queued synchronously.
    let addr = tcp_listener.local_addr().expect("listener has address");
    let config = WebhookConfig {
        url: format!("http://{}/hook", addr),
        max_retries: 0,
        tick: Duration::ZERO,
        connect_timeout: Duration::from_millis(100),
        write_timeout: Duration::from_millis(100),
        ..Default::default()
    };
    let handler = SlackHandler::with_config(config);

    let started = Instant::now();
    for i in 0..10_000 {
        send_info_record(&handler, &format!("burst {i}"));
    }
    let elapsed = started.elapsed();
    // Producers only touch the unbounded channel; queue depth must not
    // slow them down.
    assert!(elapsed < Duration::from_millis(500), "enqueue took {elapsed:?}");

    // Closing the listener turns the backlog into fast refused
    // connections so the shutdown drain completes promptly.
    drop(tcp_listener);
    drop(handler);
}

#[rstest]
fn close_drains_already_queued_payloads(tcp_listener: TcpListener) {
    let (addr, rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok(); 2]);
    let mut handler = build_handler(addr, 3);
    send_info_record(&handler, "one");
    send_info_record(&handler, "two");
    handler.close();

    assert!(recv_request(&rx).body.contains("one"));
    assert!(recv_request(&rx).body.contains("two"));
}

#[rstest]
fn handle_after_close_reports_closed(tcp_listener: TcpListener) {
    let (addr, _rx) = spawn_mock_server(tcp_listener, vec![MockResponse::ok()]);
    let mut handler = build_handler(addr, 3);
    handler.close();

    let record = LogRecord::new("test", Level::Info, "late");
    assert_eq!(handler.handle(record), Err(HandlerError::Closed));
    assert!(!handler.flush());
}
