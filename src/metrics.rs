use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("picks_created_total").absolute(0);
    counter!("picks_graded_total").absolute(0);
    counter!("picks_not_found_total").absolute(0);
    counter!("grading_runs_total").absolute(0);
    counter!("board_refreshes_total").absolute(0);
    counter!("stats_requests_total").absolute(0);

    // Pre-register gauges at zero.
    gauge!("upcoming_games").set(0.0);

    handle
}
