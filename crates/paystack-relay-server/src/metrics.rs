use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::sync::LazyLock;

pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// Inbound requests by route and outcome (ok, created, existing, invalid, failed)
pub static REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new("relay_requests_total", "Total number of relay requests"),
        &["route", "outcome"],
    )
    .unwrap()
});

// Paystack failures by route and error kind
pub static UPSTREAM_FAILURES: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "relay_upstream_failures_total",
            "Failed or malformed Paystack interactions",
        ),
        &["route", "kind"],
    )
    .unwrap()
});

pub static ROUTE_LATENCY: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "relay_route_latency_seconds",
            "Latency of relay routes including Paystack calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["route"],
    )
    .unwrap()
});

/// Register all metrics with the registry. Safe to call more than once.
pub fn register_metrics() {
    let _ = REGISTRY.register(Box::new(REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_FAILURES.clone()));
    let _ = REGISTRY.register(Box::new(ROUTE_LATENCY.clone()));
}

/// Render the registry in the Prometheus text format.
pub fn metrics_output() -> Result<String, prometheus::Error> {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Whether a scrape with the given `Authorization` header may read /metrics.
///
/// No configured token means the endpoint is public. Tokens are compared as
/// SHA-256 digests so neither their contents nor their lengths show in timing.
pub fn scrape_allowed(expected: Option<&str>, authorization: Option<&str>) -> bool {
    use sha2::{Digest, Sha256};

    let Some(expected) = expected else {
        return true;
    };
    let Some(presented) = authorization.and_then(|v| v.strip_prefix("Bearer ")) else {
        return false;
    };
    let want = Sha256::digest(expected.as_bytes());
    let got = Sha256::digest(presented.as_bytes());
    want.iter()
        .zip(got.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
