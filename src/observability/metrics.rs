//! Relay metrics.
//!
//! # Metrics
//! - `relay_stage_requests_total` (counter): gateway calls by stage, outcome
//! - `relay_stage_duration_seconds` (histogram): gateway call latency by stage
//! - `relay_pipeline_total` (counter): pipeline runs by kind, outcome

use std::time::Duration;

use crate::gateway::types::Stage;

/// Record one gateway exchange.
pub fn record_stage(stage: Stage, elapsed: Duration, success: bool) {
    ::metrics::counter!(
        "relay_stage_requests_total",
        "stage" => stage.path(),
        "outcome" => outcome(success)
    )
    .increment(1);
    ::metrics::histogram!("relay_stage_duration_seconds", "stage" => stage.path())
        .record(elapsed.as_secs_f64());
}

/// Record the end of a pipeline run.
pub fn record_pipeline(pipeline: &'static str, success: bool) {
    ::metrics::counter!(
        "relay_pipeline_total",
        "pipeline" => pipeline,
        "outcome" => outcome(success)
    )
    .increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}
