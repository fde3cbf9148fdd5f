//! Request metrics for production monitoring
//!
//! Tracks per-route request counts, latency histograms, and 5xx error
//! counts, and exposes them in Prometheus text format for scraping.
//! All counters are lock-free atomics so concurrent request handlers never
//! block on each other; `render` is safe to call while traffic is flowing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::http::StatusCode;

/// Routes tracked by the registry.
///
/// A fixed set keeps the label space bounded and the exposition
/// deterministic; unmatched paths collapse into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Health,
    Predict,
    Metrics,
    Other,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Health, Route::Predict, Route::Metrics, Route::Other];

    /// Map a request path to its route label
    pub fn from_path(path: &str) -> Self {
        match path {
            "/health" => Route::Health,
            "/predict" => Route::Predict,
            "/metrics" => Route::Metrics,
            _ => Route::Other,
        }
    }

    /// Label value used in the exposition
    pub fn label(&self) -> &'static str {
        match self {
            Route::Health => "health",
            Route::Predict => "predict",
            Route::Metrics => "metrics",
            Route::Other => "other",
        }
    }

    fn index(&self) -> usize {
        match self {
            Route::Health => 0,
            Route::Predict => 1,
            Route::Metrics => 2,
            Route::Other => 3,
        }
    }
}

/// Status class of a completed response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub const ALL: [StatusClass; 3] = [
        StatusClass::Success,
        StatusClass::ClientError,
        StatusClass::ServerError,
    ];

    /// Derive the class from the final HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() / 100 {
            4 => StatusClass::ClientError,
            5 => StatusClass::ServerError,
            _ => StatusClass::Success,
        }
    }

    /// Label value used in the exposition
    pub fn label(&self) -> &'static str {
        match self {
            StatusClass::Success => "2xx",
            StatusClass::ClientError => "4xx",
            StatusClass::ServerError => "5xx",
        }
    }

    fn index(&self) -> usize {
        match self {
            StatusClass::Success => 0,
            StatusClass::ClientError => 1,
            StatusClass::ServerError => 2,
        }
    }
}

/// Upper bounds of the latency histogram buckets, in seconds
const LATENCY_BUCKETS: [(f64, &str); 11] = [
    (0.001, "0.001"),
    (0.0025, "0.0025"),
    (0.005, "0.005"),
    (0.01, "0.01"),
    (0.025, "0.025"),
    (0.05, "0.05"),
    (0.1, "0.1"),
    (0.25, "0.25"),
    (0.5, "0.5"),
    (1.0, "1"),
    (2.5, "2.5"),
];

/// Per-route latency histogram.
///
/// Buckets store non-cumulative counts; cumulative `le` values are computed
/// at render time. The sum is kept in microseconds so it stays an integer
/// under atomic addition.
struct LatencyHistogram {
    buckets: [AtomicU64; LATENCY_BUCKETS.len()],
    overflow: AtomicU64,
    sum_micros: AtomicU64,
}

impl LatencyHistogram {
    fn new() -> Self {
        Self {
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
            overflow: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn observe(&self, duration: Duration) {
        let secs = duration.as_secs_f64();
        match LATENCY_BUCKETS.iter().position(|(bound, _)| secs <= *bound) {
            Some(i) => self.buckets[i].fetch_add(1, Ordering::Relaxed),
            None => self.overflow.fetch_add(1, Ordering::Relaxed),
        };
        self.sum_micros
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }
}

/// Process-wide request metrics, shared by all concurrent handlers.
///
/// Created once at startup and dependency-injected into the HTTP layer;
/// never reset except by process restart.
pub struct MetricsRegistry {
    requests: [[AtomicU64; StatusClass::ALL.len()]; Route::ALL.len()],
    errors: [AtomicU64; Route::ALL.len()],
    latency: [LatencyHistogram; Route::ALL.len()],
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            requests: std::array::from_fn(|_| std::array::from_fn(|_| AtomicU64::new(0))),
            errors: std::array::from_fn(|_| AtomicU64::new(0)),
            latency: std::array::from_fn(|_| LatencyHistogram::new()),
        }
    }

    /// Record one completed request.
    ///
    /// Wait-free; every call is reflected exactly once in the aggregate.
    pub fn observe(&self, route: Route, status_class: StatusClass, duration: Duration) {
        self.requests[route.index()][status_class.index()].fetch_add(1, Ordering::Relaxed);
        self.latency[route.index()].observe(duration);
        if status_class == StatusClass::ServerError {
            self.errors[route.index()].fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Total requests recorded for a route across all status classes
    pub fn requests_total(&self, route: Route) -> u64 {
        self.requests[route.index()]
            .iter()
            .map(|c| c.load(Ordering::Relaxed))
            .sum()
    }

    /// Render all metrics in Prometheus text exposition format.
    ///
    /// Deterministic ordering; every declared label combination is emitted
    /// even at zero so scrapes see the full series from the first poll.
    #[allow(clippy::cast_precision_loss)]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(4096);

        out.push_str("# HELP cardia_requests_total Total HTTP requests handled\n");
        out.push_str("# TYPE cardia_requests_total counter\n");
        for route in Route::ALL {
            for class in StatusClass::ALL {
                let count = self.requests[route.index()][class.index()].load(Ordering::Relaxed);
                out.push_str(&format!(
                    "cardia_requests_total{{route=\"{}\",status=\"{}\"}} {}\n",
                    route.label(),
                    class.label(),
                    count
                ));
            }
        }

        out.push_str("# HELP cardia_request_latency_seconds Request latency in seconds\n");
        out.push_str("# TYPE cardia_request_latency_seconds histogram\n");
        for route in Route::ALL {
            let histogram = &self.latency[route.index()];
            let mut cumulative = 0u64;
            for (i, (_, label)) in LATENCY_BUCKETS.iter().enumerate() {
                cumulative += histogram.buckets[i].load(Ordering::Relaxed);
                out.push_str(&format!(
                    "cardia_request_latency_seconds_bucket{{route=\"{}\",le=\"{}\"}} {}\n",
                    route.label(),
                    label,
                    cumulative
                ));
            }
            cumulative += histogram.overflow.load(Ordering::Relaxed);
            out.push_str(&format!(
                "cardia_request_latency_seconds_bucket{{route=\"{}\",le=\"+Inf\"}} {}\n",
                route.label(),
                cumulative
            ));
            out.push_str(&format!(
                "cardia_request_latency_seconds_sum{{route=\"{}\"}} {:.6}\n",
                route.label(),
                histogram.sum_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
            ));
            out.push_str(&format!(
                "cardia_request_latency_seconds_count{{route=\"{}\"}} {}\n",
                route.label(),
                cumulative
            ));
        }

        out.push_str("# HELP cardia_errors_total Total 5xx responses\n");
        out.push_str("# TYPE cardia_errors_total counter\n");
        for route in Route::ALL {
            out.push_str(&format!(
                "cardia_errors_total{{route=\"{}\"}} {}\n",
                route.label(),
                self.errors[route.index()].load(Ordering::Relaxed)
            ));
        }

        out
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/health"), Route::Health);
        assert_eq!(Route::from_path("/predict"), Route::Predict);
        assert_eq!(Route::from_path("/metrics"), Route::Metrics);
        assert_eq!(Route::from_path("/unknown"), Route::Other);
    }

    #[test]
    fn test_status_class_from_status() {
        assert_eq!(
            StatusClass::from_status(StatusCode::OK),
            StatusClass::Success
        );
        assert_eq!(
            StatusClass::from_status(StatusCode::UNPROCESSABLE_ENTITY),
            StatusClass::ClientError
        );
        assert_eq!(
            StatusClass::from_status(StatusCode::SERVICE_UNAVAILABLE),
            StatusClass::ServerError
        );
    }

    #[test]
    fn test_render_with_zero_observations() {
        let registry = MetricsRegistry::new();
        let output = registry.render();

        assert!(output.contains("# TYPE cardia_requests_total counter"));
        assert!(output.contains("cardia_requests_total{route=\"predict\",status=\"2xx\"} 0"));
        assert!(output.contains("cardia_request_latency_seconds_count{route=\"predict\"} 0"));
        assert!(output.contains("cardia_errors_total{route=\"predict\"} 0"));
    }

    #[test]
    fn test_observe_increments_counters() {
        let registry = MetricsRegistry::new();
        registry.observe(
            Route::Predict,
            StatusClass::Success,
            Duration::from_millis(3),
        );
        registry.observe(
            Route::Predict,
            StatusClass::ServerError,
            Duration::from_millis(7),
        );

        let output = registry.render();
        assert!(output.contains("cardia_requests_total{route=\"predict\",status=\"2xx\"} 1"));
        assert!(output.contains("cardia_requests_total{route=\"predict\",status=\"5xx\"} 1"));
        assert!(output.contains("cardia_errors_total{route=\"predict\"} 1"));
        assert!(output.contains("cardia_request_latency_seconds_count{route=\"predict\"} 2"));
        assert_eq!(registry.requests_total(Route::Predict), 2);
    }

    #[test]
    fn test_histogram_buckets_are_cumulative() {
        let registry = MetricsRegistry::new();
        registry.observe(
            Route::Health,
            StatusClass::Success,
            Duration::from_micros(500),
        );
        registry.observe(
            Route::Health,
            StatusClass::Success,
            Duration::from_millis(20),
        );
        // Beyond the last finite bucket
        registry.observe(Route::Health, StatusClass::Success, Duration::from_secs(5));

        let output = registry.render();
        assert!(output.contains("cardia_request_latency_seconds_bucket{route=\"health\",le=\"0.001\"} 1"));
        assert!(output.contains("cardia_request_latency_seconds_bucket{route=\"health\",le=\"0.025\"} 2"));
        assert!(output.contains("cardia_request_latency_seconds_bucket{route=\"health\",le=\"2.5\"} 2"));
        assert!(output.contains("cardia_request_latency_seconds_bucket{route=\"health\",le=\"+Inf\"} 3"));
        assert!(output.contains("cardia_request_latency_seconds_count{route=\"health\"} 3"));
    }

    #[test]
    fn test_concurrent_observations_are_not_lost() {
        let registry = Arc::new(MetricsRegistry::new());
        let threads: u64 = 8;
        let per_thread: u64 = 250;

        let handles: Vec<_> = (0..threads)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    for _ in 0..per_thread {
                        let class = if i % 2 == 0 {
                            StatusClass::Success
                        } else {
                            StatusClass::ClientError
                        };
                        registry.observe(Route::Predict, class, Duration::from_micros(100));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.requests_total(Route::Predict), threads * per_thread);
        let output = registry.render();
        let expected = format!(
            "cardia_request_latency_seconds_count{{route=\"predict\"}} {}",
            threads * per_thread
        );
        assert!(output.contains(&expected));
    }
}
