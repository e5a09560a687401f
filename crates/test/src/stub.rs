//! In-process stand-in for the book analysis backend.

use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::{Value, json};

use crate::{SAMPLE_BOOKS, numbered_text};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
}

impl StubResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: "application/json",
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            content_type: "text/plain; charset=utf-8",
        }
    }

    pub fn not_found() -> Self {
        Self::json(404, json!({ "detail": "Not Found" }))
    }
}

type Handler = dyn Fn(&RecordedRequest) -> StubResponse + Send + 'static;

/// Serves `/api/v1/...` on an ephemeral port until dropped. Every request is
/// recorded in arrival order.
pub struct ApiStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ApiStub {
    pub fn spawn(handler: impl Fn(&RecordedRequest) -> StubResponse + Send + 'static) -> Self {
        let handler: Box<Handler> = Box::new(handler);
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start api stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}/api/v1");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let url = request.url().to_string();
                let path = url.strip_prefix("/api/v1").unwrap_or(&url).to_string();
                let recorded_request = RecordedRequest {
                    method: request.method().to_string().to_ascii_uppercase(),
                    url: path,
                    body,
                };

                let stub = handler(&recorded_request);
                recorded
                    .lock()
                    .expect("lock recorded requests")
                    .push(recorded_request);

                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    stub.content_type.as_bytes(),
                )
                .expect("build header");
                let response = tiny_http::Response::from_string(stub.body)
                    .with_status_code(stub.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Stub backed by [`sample_backend`].
    pub fn sample() -> Self {
        Self::spawn(sample_backend)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock recorded requests").clone()
    }
}

impl Drop for ApiStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Small library of the three sample books. Each book reads as 65 numbered
/// lines; unknown books answer 404 with a `detail` message.
pub fn sample_backend(request: &RecordedRequest) -> StubResponse {
    let path = request.url.split('?').next().unwrap_or(&request.url);
    match (request.method.as_str(), path) {
        ("GET", "/books") | ("GET", "/books/") => StubResponse::json(200, json!(SAMPLE_BOOKS)),
        ("GET", "/books/health") => StubResponse::json(
            200,
            json!({ "status": "healthy", "spark_initialized": true, "books_analyzed": 3 }),
        ),
        ("POST", "/books/summary") => {
            let Some(book) = requested_book(&request.body) else {
                return StubResponse::json(422, json!({ "detail": "book_name is required" }));
            };
            if !SAMPLE_BOOKS.contains(&book.as_str()) {
                return unknown_book(&book);
            }
            StubResponse::json(
                200,
                json!({
                    "book_name": book,
                    "summary": "whale sea ship",
                    "top_words": [["whale", 8.43], ["sea", 5.1], ["ship", 4.0]],
                }),
            )
        }
        ("POST", "/books/recommend") => {
            let Some(book) = requested_book(&request.body) else {
                return StubResponse::json(422, json!({ "detail": "book_name is required" }));
            };
            if !SAMPLE_BOOKS.contains(&book.as_str()) {
                return unknown_book(&book);
            }
            let recommendations: Vec<Value> = SAMPLE_BOOKS
                .iter()
                .filter(|name| **name != book)
                .zip([0.8123, 0.4])
                .map(|(name, similarity)| json!({ "book_name": name, "similarity": similarity }))
                .collect();
            StubResponse::json(
                200,
                json!({ "book_name": book, "recommendations": recommendations }),
            )
        }
        ("GET", path) if path.starts_with("/books/read/") => {
            let name = &path["/books/read/".len()..];
            if SAMPLE_BOOKS.contains(&name) {
                StubResponse::text(200, numbered_text(65))
            } else {
                StubResponse::json(404, json!({ "detail": format!("Book '{name}' not found") }))
            }
        }
        _ => StubResponse::not_found(),
    }
}

fn requested_book(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("book_name")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
}

fn unknown_book(book: &str) -> StubResponse {
    StubResponse::json(
        404,
        json!({ "detail": format!("Book '{book}' not found. Use /books to list available books") }),
    )
}
