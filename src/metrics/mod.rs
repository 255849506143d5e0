//! Prometheus metrics for monitoring.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total HTTP requests handled
    pub requests_total: AtomicU64,
    /// Review requests sent upstream
    pub reviews_total: AtomicU64,
    /// Refactor requests sent upstream
    pub refactors_total: AtomicU64,
    /// Completion calls that failed in transport
    pub upstream_failures: AtomicU64,
    /// Completion answers that failed parsing or shape checks
    pub shape_failures: AtomicU64,
    /// Invitation e-mails sent
    pub invitations_sent: AtomicU64,
    /// Results newly written to the store
    pub results_saved: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Increment HTTP request count.
    pub fn inc_requests(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment review count.
    pub fn inc_reviews(&self) {
        self.reviews_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment refactor count.
    pub fn inc_refactors(&self) {
        self.refactors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment upstream transport failure count.
    pub fn inc_upstream_failures(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rejected completion answer count.
    pub fn inc_shape_failures(&self) {
        self.shape_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment sent invitation count.
    pub fn inc_invitations(&self) {
        self.invitations_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment saved result count.
    pub fn inc_results_saved(&self) {
        self.results_saved.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            reviews_total: self.reviews_total.load(Ordering::Relaxed),
            refactors_total: self.refactors_total.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            shape_failures: self.shape_failures.load(Ordering::Relaxed),
            invitations_sent: self.invitations_sent.load(Ordering::Relaxed),
            results_saved: self.results_saved.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self) -> String {
        let s = self.snapshot();
        format!(
            r#"# HELP codiny_requests_total Total number of HTTP requests
# TYPE codiny_requests_total counter
codiny_requests_total {}

# HELP codiny_reviews_total Review requests sent to the completion service
# TYPE codiny_reviews_total counter
codiny_reviews_total {}

# HELP codiny_refactors_total Refactor requests sent to the completion service
# TYPE codiny_refactors_total counter
codiny_refactors_total {}

# HELP codiny_upstream_failures_total Completion calls that failed in transport
# TYPE codiny_upstream_failures_total counter
codiny_upstream_failures_total {}

# HELP codiny_shape_failures_total Completion answers rejected by validation
# TYPE codiny_shape_failures_total counter
codiny_shape_failures_total {}

# HELP codiny_invitations_sent_total Invitation e-mails sent
# TYPE codiny_invitations_sent_total counter
codiny_invitations_sent_total {}

# HELP codiny_results_saved_total Analysis results saved
# TYPE codiny_results_saved_total counter
codiny_results_saved_total {}
"#,
            s.requests_total,
            s.reviews_total,
            s.refactors_total,
            s.upstream_failures,
            s.shape_failures,
            s.invitations_sent,
            s.results_saved
        )
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub reviews_total: u64,
    pub refactors_total: u64,
    pub upstream_failures: u64,
    pub shape_failures: u64,
    pub invitations_sent: u64,
    pub results_saved: u64,
}

/// Timer for measuring durations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
