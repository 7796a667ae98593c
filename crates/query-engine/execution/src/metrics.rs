//! Metrics setup and update for the connector.

use prometheus::core::{AtomicI64, AtomicU64, GenericCounter, GenericGauge};

#[derive(Debug, Clone)]
pub struct Metrics {
    pub query_total: GenericCounter<AtomicU64>,
    pub explain_total: GenericCounter<AtomicU64>,
    pub query_errors_total: GenericCounter<AtomicU64>,
    pub pool_size: GenericGauge<AtomicI64>,
    pub pool_idle_count: GenericGauge<AtomicI64>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to initialise metrics: {0}")]
    PrometheusError(#[from] prometheus::Error),
}

/// Create a new int counter metric and register it with the provided Prometheus Registry
fn add_int_counter_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericCounter<AtomicU64>, Error> {
    let int_counter =
        prometheus::IntCounter::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_counter.clone()))?;
    Ok(int_counter)
}

/// Create a new int gauge metric and register it with the provided Prometheus Registry
fn add_int_gauge_metric(
    metrics_registry: &mut prometheus::Registry,
    metric_name: &str,
    metric_description: &str,
) -> Result<GenericGauge<AtomicI64>, Error> {
    let int_gauge =
        prometheus::IntGauge::with_opts(prometheus::Opts::new(metric_name, metric_description))?;
    metrics_registry.register(Box::new(int_gauge.clone()))?;
    Ok(int_gauge)
}

/// Setup counters and gauges used to produce Prometheus metrics
pub fn initialise_metrics(metrics_registry: &mut prometheus::Registry) -> Result<Metrics, Error> {
    let query_total = add_int_counter_metric(
        metrics_registry,
        "sqlite_ndc_query_total",
        "Total successful queries.",
    )?;

    let explain_total = add_int_counter_metric(
        metrics_registry,
        "sqlite_ndc_explain_total",
        "Total successful explains.",
    )?;

    let query_errors_total = add_int_counter_metric(
        metrics_registry,
        "sqlite_ndc_query_errors_total",
        "Total queries and explains that failed.",
    )?;

    let pool_size = add_int_gauge_metric(
        metrics_registry,
        "sqlite_ndc_pool_size",
        "The number of open connections across all database pools. This includes idle connections.",
    )?;

    let pool_idle_count = add_int_gauge_metric(
        metrics_registry,
        "sqlite_ndc_pool_idle",
        "The number of open connections across all database pools that are idle.",
    )?;

    Ok(Metrics {
        query_total,
        explain_total,
        query_errors_total,
        pool_size,
        pool_idle_count,
    })
}

/// Update the pool gauges with the totals over every open pool.
pub fn update_pool_metrics<'a>(
    pools: impl IntoIterator<Item = &'a sqlx::SqlitePool>,
    metrics: &Metrics,
) {
    let (size, idle) = pools.into_iter().fold((0_i64, 0_i64), |(size, idle), pool| {
        let pool_idle = i64::try_from(pool.num_idle()).unwrap_or(i64::MAX);
        (
            size.saturating_add(pool.size().into()),
            idle.saturating_add(pool_idle),
        )
    });
    metrics.pool_size.set(size);
    metrics.pool_idle_count.set(idle);
}
