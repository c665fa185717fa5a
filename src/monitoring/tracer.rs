/*!
 * Structured Tracing
 * Subscriber setup and wait spans for blocked consumers
 */

use std::time::{Duration, Instant};
use tracing::{debug, info, span, Level, Span};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FAIR_QUEUE_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("FAIR_QUEUE_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Span covering one consumer's time parked in a queue
pub struct WaitSpan {
    span: Span,
    label: String,
    start: Instant,
}

impl WaitSpan {
    pub fn new(label: &str, ticket: usize) -> Self {
        let span = span!(
            Level::DEBUG,
            "queue_wait",
            label = label,
            ticket = ticket,
            wait_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        Self {
            span,
            label: label.to_string(),
            start: Instant::now(),
        }
    }

    /// Record how the wait ended and for how long it lasted
    pub fn finish(self, outcome: &'static str) {
        let wait_us = saturating_micros(self.start.elapsed());
        self.span.record("wait_us", wait_us);
        self.span.record("outcome", outcome);

        let _entered = self.span.enter();
        debug!(label = %self.label, wait_us, outcome, "Consumer resumed");
    }
}

/// Whole microseconds in `elapsed`, clamped to `u64::MAX`
#[inline]
fn saturating_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saturating_micros() {
        assert_eq!(saturating_micros(Duration::from_millis(3)), 3_000);
        assert_eq!(saturating_micros(Duration::from_nanos(999)), 0);
        assert_eq!(saturating_micros(Duration::MAX), u64::MAX);
    }

    #[test]
    fn test_wait_span_finish_without_subscriber() {
        let span = WaitSpan::new("idle", 0);
        assert_eq!(span.label, "idle");
        span.finish("delivered");
    }
}
