//! HTTP Metrics Module
//!
//! Prometheus instruments for the HTTP layer, kept in a registry owned by the
//! application state so every router instance counts independently.

use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Route label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "UNMATCHED";

const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

// == HTTP Metrics ==
/// Request counters, latency histogram, in-flight gauge and panic counter.
#[derive(Clone)]
pub struct HttpMetrics {
    registry: Registry,
    in_flight: IntGauge,
    requests: IntCounterVec,
    requests_by_class: IntCounterVec,
    duration_by_class: HistogramVec,
    panics_recovered: IntCounter,
}

impl HttpMetrics {
    /// Creates the instruments and registers them in a fresh registry.
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let in_flight = IntGauge::new(
            "http_in_flight_requests",
            "Current number of in-flight HTTP requests",
        )?;
        registry.register(Box::new(in_flight.clone()))?;

        let requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests by method/route/status"),
            &["method", "route", "status"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        let requests_by_class = IntCounterVec::new(
            Opts::new(
                "http_requests_class_total",
                "HTTP requests by status class (2xx/4xx/5xx)",
            ),
            &["method", "route", "class"],
        )?;
        registry.register(Box::new(requests_by_class.clone()))?;

        let duration_by_class = HistogramVec::new(
            HistogramOpts::new(
                "http_request_class_duration_seconds",
                "HTTP request duration by status class",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route", "class"],
        )?;
        registry.register(Box::new(duration_by_class.clone()))?;

        let panics_recovered = IntCounter::new(
            "panic_recovered_total",
            "Handler panics converted to 500 responses",
        )?;
        registry.register(Box::new(panics_recovered.clone()))?;

        Ok(Self {
            registry,
            in_flight,
            requests,
            requests_by_class,
            duration_by_class,
            panics_recovered,
        })
    }

    /// Marks a request as started. The gauge drops back when the guard does.
    pub fn start_request(&self) -> InFlightGuard {
        self.in_flight.inc();
        InFlightGuard {
            gauge: self.in_flight.clone(),
        }
    }

    /// Records one finished request.
    pub fn record_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let status_label = status.to_string();
        let class = status_class(status);

        self.requests
            .with_label_values(&[method, route, status_label.as_str()])
            .inc();
        self.requests_by_class
            .with_label_values(&[method, route, class])
            .inc();
        self.duration_by_class
            .with_label_values(&[method, route, class])
            .observe(elapsed.as_secs_f64());
    }

    pub fn record_panic(&self) {
        self.panics_recovered.inc();
    }

    pub fn in_flight(&self) -> i64 {
        self.in_flight.get()
    }

    pub fn panics_recovered(&self) -> u64 {
        self.panics_recovered.get()
    }

    /// Renders every registered metric in the Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}

/// Decrements the in-flight gauge on drop, including when the request
/// future is cancelled.
pub struct InFlightGuard {
    gauge: IntGauge,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

fn status_class(status: u16) -> &'static str {
    match status / 100 {
        1 => "1xx",
        2 => "2xx",
        3 => "3xx",
        4 => "4xx",
        _ => "5xx",
    }
}
