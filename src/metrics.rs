//! Request counters and timing statistics for the prediction service.

use crate::error::ErrorKind;
use crate::types::verdict::Verdict;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

/// Metrics collector for the service
pub struct ServiceMetrics {
    /// Total requests handled
    pub requests_handled: AtomicU64,
    /// Verdicts rendered
    pub at_risk: AtomicU64,
    pub not_at_risk: AtomicU64,
    /// Failed requests by error kind
    errors_by_kind: RwLock<HashMap<ErrorKind, u64>>,
    /// Processing times (in microseconds)
    processing_times: RwLock<Vec<u64>>,
    /// Start time for rate calculation
    start_time: Instant,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self {
            requests_handled: AtomicU64::new(0),
            at_risk: AtomicU64::new(0),
            not_at_risk: AtomicU64::new(0),
            errors_by_kind: RwLock::new(HashMap::new()),
            processing_times: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    /// Record a successful prediction
    pub fn record_verdict(&self, verdict: Verdict, processing_time: Duration) {
        self.record_request(processing_time);
        match verdict {
            Verdict::AtRisk => self.at_risk.fetch_add(1, Ordering::Relaxed),
            Verdict::NotAtRisk => self.not_at_risk.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record a failed request
    pub fn record_error(&self, kind: ErrorKind, processing_time: Duration) {
        self.record_request(processing_time);
        if let Ok(mut by_kind) = self.errors_by_kind.write() {
            *by_kind.entry(kind).or_insert(0) += 1;
        }
    }

    fn record_request(&self, processing_time: Duration) {
        self.requests_handled.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut times) = self.processing_times.write() {
            times.push(processing_time.as_micros() as u64);
            // Keep only last 10000
            if times.len() > 10000 {
                times.drain(0..5000);
            }
        }
    }

    /// Failed requests by kind
    pub fn errors_by_kind(&self) -> HashMap<ErrorKind, u64> {
        self.errors_by_kind
            .read()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Total failed requests
    pub fn error_count(&self) -> u64 {
        self.errors_by_kind().values().sum()
    }

    /// Get processing time statistics
    pub fn get_processing_stats(&self) -> ProcessingStats {
        let mut sorted = match self.processing_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return ProcessingStats::default(),
        };
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let count = sorted.len();

        ProcessingStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p95_us: sorted[((count as f64 * 0.95) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    /// Requests per second since startup
    pub fn get_throughput(&self) -> f64 {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.requests_handled.load(Ordering::Relaxed) as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let handled = self.requests_handled.load(Ordering::Relaxed);
        let at_risk = self.at_risk.load(Ordering::Relaxed);
        let not_at_risk = self.not_at_risk.load(Ordering::Relaxed);
        let processing = self.get_processing_stats();

        info!(
            handled = handled,
            at_risk = at_risk,
            not_at_risk = not_at_risk,
            errors = self.error_count(),
            throughput = format!("{:.2} req/s", self.get_throughput()),
            "Service summary"
        );
        info!(
            mean_us = processing.mean_us,
            p50_us = processing.p50_us,
            p95_us = processing.p95_us,
            max_us = processing.max_us,
            "Processing time"
        );
        for (kind, count) in self.errors_by_kind() {
            info!(kind = kind.as_str(), count = count, "Errors by kind");
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Processing time statistics
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}
