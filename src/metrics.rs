//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use anyhow::{anyhow, Result};

/// Request metrics middleware; also serves `/metrics`.
pub fn build() -> Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("football")
        .endpoint("/metrics")
        .build()
        .map_err(|e| anyhow!("metrics builder: {e}"))
}
