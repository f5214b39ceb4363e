//! Request/response diagnostics for the HTTP client.
//!
//! The hooks only log and count; they never alter a request or a response.

use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

pub const REQUESTS_TOTAL: &str = "fittrack_http_requests_total";
pub const FAILURES_TOTAL: &str = "fittrack_http_failures_total";

/// Per-request diagnostic context handed from the request hook to the response hook.
#[derive(Debug)]
pub struct RequestTrace {
    pub id: String,
    pub method: String,
    pub path: String,
    started: Instant,
}

impl RequestTrace {
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

pub fn on_request(method: &reqwest::Method, path: &str) -> RequestTrace {
    let trace = RequestTrace {
        id: Uuid::new_v4().to_string(),
        method: method.as_str().to_string(),
        path: path.to_string(),
        started: Instant::now(),
    };
    debug!(request_id = %trace.id, method = %trace.method, path = %trace.path, "request");
    metrics::counter!(REQUESTS_TOTAL, "method" => trace.method.clone()).increment(1);
    trace
}

pub fn on_success(trace: &RequestTrace, status: u16) {
    debug!(
        request_id = %trace.id,
        method = %trace.method,
        path = %trace.path,
        status,
        elapsed_ms = trace.elapsed_ms() as u64,
        "response"
    );
}

/// `status` is `None` when no response was received.
pub fn on_failure(trace: &RequestTrace, status: Option<u16>, detail: &str) {
    let status_label = status.map_or_else(|| "none".to_string(), |s| s.to_string());
    warn!(
        request_id = %trace.id,
        method = %trace.method,
        path = %trace.path,
        status = %status_label,
        elapsed_ms = trace.elapsed_ms() as u64,
        detail,
        "request failed"
    );
    metrics::counter!(
        FAILURES_TOTAL,
        "method" => trace.method.clone(),
        "status" => status_label
    )
    .increment(1);
}
