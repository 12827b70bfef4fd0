//! Request logging middleware.
//!
//! Every request is announced before it is sent. Failures are reported on the
//! way back, except HTTP errors 400 to 404 which callers usually handle
//! themselves.

use std::sync::Arc;

use tracing::info;

use crate::{FetchFuture, FetchOptions, Middleware, Next};

/// Destination of log lines.
///
/// Any `Fn(&str)` closure is a sink.
pub trait LogSink: Send + Sync + 'static {
    /// Write one line.
    fn log(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn log(&self, line: &str) {
        self(line);
    }
}

/// Sink emitting each line as a `tracing` info event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, line: &str) {
        info!(target: "fetchwrap", "{line}");
    }
}

/// Middleware logging requests and their failures.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use fetchwrap::middleware::Logger;
///
/// let lines = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&lines);
/// let logger = Logger::new()
///     .success(true)
///     .with_sink(move |line: &str| sink.lock().expect("lock").push(line.to_string()));
/// ```
#[derive(Clone)]
pub struct Logger {
    success: bool,
    sink: Arc<dyn LogSink>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self {
            success: false,
            sink: Arc::new(TracingSink),
        }
    }
}

impl Logger {
    /// Logger writing to [`TracingSink`], not logging successes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also log successful requests.
    #[must_use]
    pub const fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Write lines to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: impl LogSink) -> Self {
        self.sink = Arc::new(sink);
        self
    }
}

/// 400 to 404 are expected errors, left to the application.
fn is_expected(status: Option<u16>) -> bool {
    status.is_some_and(|status| (400..=404).contains(&status))
}

impl Middleware for Logger {
    fn handle(&self, url: String, options: FetchOptions, next: Next) -> FetchFuture {
        let method = options.method_or_default();
        let request = format!("{method} {url}");
        self.sink.log(&format!("[fetch] {request}"));

        let sink = Arc::clone(&self.sink);
        let success = self.success;
        let reply = next.run(url, options);

        Box::pin(async move {
            match reply.await {
                Ok(reply) => {
                    if success {
                        sink.log(&format!("[fetch] SUCCESS for {request}"));
                    }
                    Ok(reply)
                }
                Err(err) => {
                    if !is_expected(err.status()) {
                        sink.log(&format!("[fetch] FAILED {err} for {request}"));
                    }
                    Err(err)
                }
            }
        })
    }
}
