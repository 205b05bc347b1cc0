//! Metrics interface (§6, adjacent): the core emits its own histograms
//! (e.g. async-logger drop counts) through this interface when a caller
//! supplies one. Datasource adapters are free to use the same interface
//! for their own metrics; this crate does not implement a backend.

/// Label pairs attached to a metric observation.
pub type Labels<'a> = &'a [(&'a str, &'a str)];

/// Adjacent interface consumed by the core and by adapters built on it.
/// No implementation is provided here — callers wire this to whatever
/// metrics backend their service already runs (Prometheus, StatsD, …).
pub trait Metrics: Send + Sync {
    fn new_histogram(&self, name: &str, help: &str, buckets: &[f64]);
    fn new_counter(&self, name: &str, help: &str);
    fn new_gauge(&self, name: &str, help: &str);
    fn record_histogram(&self, name: &str, value: f64, labels: Labels<'_>);
    fn increment_counter(&self, name: &str, labels: Labels<'_>);
    fn set_gauge(&self, name: &str, value: f64, labels: Labels<'_>);
}

/// Discards every observation. The default when no metrics backend is
/// configured, so instrumented call sites never need an `Option` check.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn new_histogram(&self, _name: &str, _help: &str, _buckets: &[f64]) {}
    fn new_counter(&self, _name: &str, _help: &str) {}
    fn new_gauge(&self, _name: &str, _help: &str) {}
    fn record_histogram(&self, _name: &str, _value: f64, _labels: Labels<'_>) {}
    fn increment_counter(&self, _name: &str, _labels: Labels<'_>) {}
    fn set_gauge(&self, _name: &str, _value: f64, _labels: Labels<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_metrics_accepts_every_call_without_panicking() {
        let m = NoopMetrics;
        m.new_histogram("h", "help", &[0.1, 0.5, 1.0]);
        m.new_counter("c", "help");
        m.new_gauge("g", "help");
        m.record_histogram("h", 0.3, &[("route", "/x")]);
        m.increment_counter("c", &[]);
        m.set_gauge("g", 1.0, &[]);
    }
}
