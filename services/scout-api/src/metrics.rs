use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Outcome counters, kept in a registry owned by the application state.
#[derive(Clone)]
pub struct ScoutMetrics {
    registry: Registry,
    outcomes: IntCounterVec,
}

impl ScoutMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some("scout".to_string()), None)?;
        let outcomes = IntCounterVec::new(
            Opts::new("outcomes_total", "Scout requests by route and outcome status"),
            &["route", "status"],
        )?;
        registry.register(Box::new(outcomes.clone()))?;

        Ok(Self { registry, outcomes })
    }

    pub fn record(&self, route: &str, status: &str) {
        self.outcomes.with_label_values(&[route, status]).inc();
    }

    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!(error = %e, "Failed to encode metrics");
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}
