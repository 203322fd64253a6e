use async_trait::async_trait;
use serde_json::Value;
use sheetdb::{Row, RowSource, SheetError, SheetId};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

// --- Mock SheetDB Server ---

/// A wiremock server that answers like a SheetDB endpoint.
pub struct MockSheetDb {
    pub server: MockServer,
}

impl MockSheetDb {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// The base URL to hand to the client.
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Serves `body` with status 200 for requests naming `sheet`.
    pub async fn mount_body(&self, sheet: &str, body: Value) {
        self.mount_template(sheet, ResponseTemplate::new(200).set_body_json(body))
            .await;
    }

    /// Serves `body` for `sheet` after `delay`.
    pub async fn mount_delayed(&self, sheet: &str, body: Value, delay: Duration) {
        self.mount_template(
            sheet,
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(delay),
        )
        .await;
    }

    /// Answers every request for `sheet` with a bare `status`.
    pub async fn mount_status(&self, sheet: &str, status: u16) {
        self.mount_template(sheet, ResponseTemplate::new(status)).await;
    }

    /// Fails the first `failures` requests for `sheet` with a 500, then serves `body`.
    pub async fn mount_flaky(&self, sheet: &str, failures: usize, body: Value) -> FlakyResponder {
        let responder = FlakyResponder::new(failures, body);
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("sheet", sheet))
            .respond_with(responder.clone())
            .mount(&self.server)
            .await;
        responder
    }

    pub async fn mount_template(&self, sheet: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("sheet", sheet))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far whose `sheet` parameter equals `sheet`.
    pub async fn requests_for(&self, sheet: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| {
                request
                    .url
                    .query_pairs()
                    .any(|(key, value)| key == "sheet" && value == sheet)
            })
            .collect()
    }
}

/// A responder that fails a fixed number of times before succeeding.
#[derive(Clone, Debug)]
pub struct FlakyResponder {
    failures: usize,
    body: Value,
    calls: Arc<AtomicUsize>,
}

impl FlakyResponder {
    pub fn new(failures: usize, body: Value) -> Self {
        Self {
            failures,
            body,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// How many requests have been answered.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Respond for FlakyResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            ResponseTemplate::new(500).set_body_string("temporarily unavailable")
        } else {
            ResponseTemplate::new(200).set_body_json(self.body.clone())
        }
    }
}

// --- Mock Row Source ---

/// A scripted [`RowSource`] that replays queued results in order.
///
/// Once the script runs out, every further call fails.
#[derive(Clone, Debug, Default)]
pub struct MockRowSource {
    script: Arc<Mutex<VecDeque<Result<Vec<Row>, String>>>>,
    calls: Arc<Mutex<Vec<SheetId>>>,
}

impl MockRowSource {
    pub fn new(script: Vec<Result<Vec<Row>, String>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into_iter().collect())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A source that fails `failures` times, then returns `rows`.
    pub fn failing_then(failures: usize, rows: Vec<Row>) -> Self {
        let mut script: Vec<Result<Vec<Row>, String>> = (0..failures)
            .map(|i| Err(format!("scripted failure {}", i + 1)))
            .collect();
        script.push(Ok(rows));
        Self::new(script)
    }

    /// Retrieves the sheets requested so far.
    pub fn get_calls(&self) -> Vec<SheetId> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RowSource for MockRowSource {
    async fn fetch_rows(&self, sheet: &SheetId) -> Result<Vec<Row>, SheetError> {
        self.calls.lock().unwrap().push(sheet.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(body)) => Err(SheetError::Status { status: 503, body }),
            None => Err(SheetError::Status {
                status: 503,
                body: "MockRowSource: script exhausted".to_string(),
            }),
        }
    }
}

// --- Log Capture ---

/// Collects formatted log output so tests can assert on warnings.
#[derive(Clone, Debug, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a capturing subscriber for the current thread.
    ///
    /// Logging is captured until the returned guard is dropped. `#[tokio::test]`
    /// runs on a single thread, so spawned tasks are captured too.
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buffer: self.buffer.clone(),
        }
    }
}

// --- Row Helpers ---

/// Builds a row from `(column, text)` pairs.
pub fn row(cells: &[(&str, &str)]) -> Row {
    cells
        .iter()
        .map(|(column, value)| (column.to_string(), (*value).into()))
        .collect()
}
