use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use shared::HealthReport;

const API_NAME: &str = "votes-api";

/// Request outcome counters, owned by the service state and shared with the processor.
#[derive(Debug)]
pub struct Metrics {
    boot_time: Instant,
    successes: AtomicU64,
    failures: AtomicU64,
    compensations_run: AtomicU64,
    compensations_failed: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            boot_time: Instant::now(),
            successes: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            compensations_run: AtomicU64::new(0),
            compensations_failed: AtomicU64::new(0),
        }
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.successes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_compensation(&self, succeeded: bool) {
        self.compensations_run.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.compensations_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> HealthReport {
        let successes = self.successes();
        let failures = self.failures();

        HealthReport {
            api_name: API_NAME.into(),
            status: 200,
            version: env!("CARGO_PKG_VERSION").into(),
            api_uptime: format!("{:?}", self.boot_time.elapsed()),
            total_api_calls: successes + failures,
            total_api_calls_succeed: successes,
            total_api_calls_with_errors: failures,
            compensations_run: self.compensations_run.load(Ordering::Relaxed),
            compensations_failed: self.compensations_failed.load(Ordering::Relaxed),
        }
    }
}
