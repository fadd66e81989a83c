//! Prometheus metrics for the ingestion pipeline.
//!
//! This module provides metrics for:
//! - Submission (staging latency and results)
//! - Outcome handling (validated, rejected, unresolved)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounterVec, Opts};

// =============================================================================
// Submission Metrics
// =============================================================================

/// Time spent staging a payload, in seconds.
pub static STAGE_ELAPSED: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "ingress_stage_seconds",
            "Time taken to stage a payload",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

/// Submissions total by result.
pub static SUBMISSIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("ingress_submissions_total", "Total payload submissions"),
        &["result"], // "staged", "stage_failed"
    )
    .unwrap()
});

// =============================================================================
// Outcome Metrics
// =============================================================================

/// Validation outcomes handled by the event loop.
pub static OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "ingress_validation_outcomes_total",
            "Total validation outcomes handled",
        ),
        &["result"], // "validated", "rejected", "unresolved"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all pipeline metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(STAGE_ELAPSED.clone()),
        Box::new(SUBMISSIONS.clone()),
        Box::new(OUTCOMES.clone()),
    ]
}
