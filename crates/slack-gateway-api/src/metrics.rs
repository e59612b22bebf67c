//! Metrics collection for the webhook routes.
//!
//! Each [`ServiceMetrics`] owns its own Prometheus registry so several
//! routers can live in one process (as they do in tests).

use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use slack_bot_sdk::payloads::Route;
use std::sync::Arc;
use std::time::Duration;

/// Service metrics for observability
#[derive(Debug)]
pub struct ServiceMetrics {
    registry: Registry,

    /// Webhook requests by route and HTTP status
    pub webhook_requests_total: IntCounterVec,

    /// Time from request arrival to settlement, by route
    pub webhook_duration_seconds: HistogramVec,
}

impl ServiceMetrics {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        let webhook_requests_total = IntCounterVec::new(
            Opts::new(
                "slack_webhook_requests_total",
                "Total Slack webhook requests received",
            ),
            &["route", "status"],
        )?;
        registry.register(Box::new(webhook_requests_total.clone()))?;

        let webhook_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "slack_webhook_duration_seconds",
                "Slack webhook processing time distribution",
            )
            .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 3.0, 5.0]),
            &["route"],
        )?;
        registry.register(Box::new(webhook_duration_seconds.clone()))?;

        Ok(Arc::new(Self {
            registry,
            webhook_requests_total,
            webhook_duration_seconds,
        }))
    }

    pub fn record_webhook_request(&self, route: Route, status: u16, duration: Duration) {
        let status = status.to_string();
        self.webhook_requests_total
            .with_label_values(&[route.as_str(), status.as_str()])
            .inc();
        self.webhook_duration_seconds
            .with_label_values(&[route.as_str()])
            .observe(duration.as_secs_f64());
    }

    /// Render all metrics in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
