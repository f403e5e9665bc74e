//! In-memory request metrics.
//!
//! A bounded ring buffer of the most recent requests plus the aggregate
//! queries served by `/api/metrics/performance`.

use std::collections::{HashMap, VecDeque};
use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

pub const DEFAULT_CAPACITY: usize = 10_000;
pub const DEFAULT_SLOW_THRESHOLD_MS: f64 = 1000.0;
const TOP_ENDPOINTS: usize = 10;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetric {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub response_time_ms: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RequestMetric {
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }
}

/// `req_{epoch_ms}_{9 random chars}`
pub fn generate_request_id() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("req_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTiming {
    pub endpoint: String,
    pub average_time: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EndpointErrors {
    pub endpoint: String,
    pub error_count: usize,
    pub total_requests: usize,
    pub error_rate: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceStats {
    pub total_requests: usize,
    pub average_response_time: f64,
    pub p95_response_time: f64,
    pub p99_response_time: f64,
    pub error_rate: f64,
    pub requests_per_minute: usize,
    pub slowest_endpoints: Vec<EndpointTiming>,
    pub error_endpoints: Vec<EndpointErrors>,
}

/// `sorted[floor(n * q)]`, clamped to the last element. `sorted` must be non-empty.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() as f64) * q).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Aggregate a slice of metrics. `now` anchors the requests-per-minute count.
pub fn compute_stats(metrics: &[&RequestMetric], now: DateTime<Utc>) -> PerformanceStats {
    if metrics.is_empty() {
        return PerformanceStats::default();
    }

    let total = metrics.len();
    let mut times: Vec<f64> = metrics.iter().map(|m| m.response_time_ms).collect();
    times.sort_by(|a, b| a.total_cmp(b));
    let average = times.iter().sum::<f64>() / total as f64;
    let errors = metrics.iter().filter(|m| m.is_error()).count();

    let minute_ago = now - chrono::Duration::seconds(60);
    let requests_per_minute = metrics.iter().filter(|m| m.timestamp > minute_ago).count();

    // endpoint -> (sum_ms, count, errors)
    let mut by_endpoint: HashMap<String, (f64, usize, usize)> = HashMap::new();
    for m in metrics {
        let e = by_endpoint.entry(m.endpoint()).or_insert((0.0, 0, 0));
        e.0 += m.response_time_ms;
        e.1 += 1;
        if m.is_error() {
            e.2 += 1;
        }
    }

    let mut slowest: Vec<EndpointTiming> = by_endpoint
        .iter()
        .map(|(endpoint, (sum, count, _))| EndpointTiming {
            endpoint: endpoint.clone(),
            average_time: sum / *count as f64,
            count: *count,
        })
        .collect();
    slowest.sort_by(|a, b| {
        b.average_time.total_cmp(&a.average_time).then_with(|| a.endpoint.cmp(&b.endpoint))
    });
    slowest.truncate(TOP_ENDPOINTS);

    let mut error_endpoints: Vec<EndpointErrors> = by_endpoint
        .iter()
        .filter(|(_, (_, _, errs))| *errs > 0)
        .map(|(endpoint, (_, count, errs))| EndpointErrors {
            endpoint: endpoint.clone(),
            error_count: *errs,
            total_requests: *count,
            error_rate: *errs as f64 / *count as f64,
        })
        .collect();
    error_endpoints.sort_by(|a, b| b.error_count.cmp(&a.error_count).then_with(|| a.endpoint.cmp(&b.endpoint)));
    error_endpoints.truncate(TOP_ENDPOINTS);

    PerformanceStats {
        total_requests: total,
        average_response_time: average,
        p95_response_time: percentile(&times, 0.95),
        p99_response_time: percentile(&times, 0.99),
        error_rate: errors as f64 / total as f64,
        requests_per_minute,
        slowest_endpoints: slowest,
        error_endpoints,
    }
}

/// Bounded store of recent request metrics. Oldest entries are evicted first.
#[derive(Debug)]
pub struct PerformanceMonitor {
    metrics: Mutex<VecDeque<RequestMetric>>,
    capacity: usize,
    slow_threshold_ms: f64,
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_SLOW_THRESHOLD_MS)
    }
}

impl PerformanceMonitor {
    pub fn new(capacity: usize, slow_threshold_ms: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            metrics: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
            slow_threshold_ms,
        }
    }

    pub fn slow_threshold_ms(&self) -> f64 {
        self.slow_threshold_ms
    }

    pub fn is_slow(&self, response_time_ms: f64) -> bool {
        response_time_ms > self.slow_threshold_ms
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<RequestMetric>> {
        // a panic while holding the lock leaves the deque intact
        self.metrics.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, metric: RequestMetric) {
        if self.is_slow(metric.response_time_ms) {
            warn!(
                event = "slow_request",
                request_id = %metric.request_id,
                method = %metric.method,
                path = %metric.path,
                response_time_ms = metric.response_time_ms,
                "slow request detected"
            );
        }
        if metric.is_error() {
            error!(
                event = "request_error",
                request_id = %metric.request_id,
                method = %metric.method,
                path = %metric.path,
                status = metric.status_code,
                error = metric.error.as_deref().unwrap_or(""),
                "request completed with error status"
            );
        }

        let mut buf = self.lock();
        while buf.len() >= self.capacity {
            buf.pop_front();
        }
        buf.push_back(metric);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Stats over all retained metrics, or only the trailing `window`.
    pub fn stats(&self, window: Option<Duration>) -> PerformanceStats {
        self.stats_at(Utc::now(), window)
    }

    pub fn stats_at(&self, now: DateTime<Utc>, window: Option<Duration>) -> PerformanceStats {
        let buf = self.lock();
        let since = window
            .and_then(|w| chrono::Duration::from_std(w).ok())
            .map(|w| now - w);
        let selected: Vec<&RequestMetric> = buf
            .iter()
            .filter(|m| since.map_or(true, |s| m.timestamp >= s))
            .collect();
        compute_stats(&selected, now)
    }

    pub fn metrics_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<RequestMetric> {
        self.lock()
            .iter()
            .filter(|m| m.timestamp >= start && m.timestamp <= end)
            .cloned()
            .collect()
    }

    /// Requests slower than `threshold_ms` (default: the configured threshold), newest first.
    pub fn slow_requests(&self, threshold_ms: Option<f64>) -> Vec<RequestMetric> {
        let threshold = threshold_ms.unwrap_or(self.slow_threshold_ms);
        self.lock()
            .iter()
            .rev()
            .filter(|m| m.response_time_ms > threshold)
            .cloned()
            .collect()
    }

    /// Requests with status >= 400, newest first.
    pub fn error_requests(&self) -> Vec<RequestMetric> {
        self.lock().iter().rev().filter(|m| m.is_error()).cloned().collect()
    }

    /// Plain-text summary for operators.
    pub fn report(&self) -> String {
        let stats = self.stats(None);
        let slow = self.slow_requests(None).len();
        let mut out = String::new();
        let _ = writeln!(out, "Performance Report");
        let _ = writeln!(out, "==================");
        let _ = writeln!(out, "Total Requests: {}", stats.total_requests);
        let _ = writeln!(out, "Average Response Time: {:.2}ms", stats.average_response_time);
        let _ = writeln!(out, "95th Percentile: {:.2}ms", stats.p95_response_time);
        let _ = writeln!(out, "99th Percentile: {:.2}ms", stats.p99_response_time);
        let _ = writeln!(out, "Error Rate: {:.2}%", stats.error_rate * 100.0);
        let _ = writeln!(out, "Requests/Minute: {}", stats.requests_per_minute);
        let _ = writeln!(out, "Slow Requests (>{:.0}ms): {}", self.slow_threshold_ms, slow);
        let _ = writeln!(out);
        let _ = writeln!(out, "Slowest Endpoints:");
        for (i, e) in stats.slowest_endpoints.iter().enumerate() {
            let _ = writeln!(out, "{}. {}: {:.2}ms ({} requests)", i + 1, e.endpoint, e.average_time, e.count);
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "Error Endpoints:");
        for (i, e) in stats.error_endpoints.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {}: {} errors / {} requests ({:.2}%)",
                i + 1,
                e.endpoint,
                e.error_count,
                e.total_requests,
                e.error_rate * 100.0
            );
        }
        out
    }
}
