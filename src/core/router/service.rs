//! Service identity and the per-service stats a [`crate::core::router::rule::Rule`]
//! selects among.

use std::sync::Arc;

use super::stats::ServiceStats;

/// An addressable upstream identified by a `(provider, model)` pair.
///
/// Identity is stable for the lifetime of the process; `id()` is the
/// canonical `"<provider>:<model>"` string used as the stats/health key.
/// Stats live behind an `Arc` so a configuration reload can carry a
/// surviving service's warmed-up stats into its replacement (see
/// [`super::registry::RuleRegistry`]) without copying samples.
#[derive(Debug)]
pub struct Service {
    provider: String,
    model: String,
    id: String,
    weight: u32,
    active: bool,
    stats: Arc<ServiceStats>,
}

impl Service {
    /// Build a service with the documented default window/ring sizes.
    pub fn new(provider: impl Into<String>, model: impl Into<String>, weight: u32, active: bool) -> Self {
        Self::with_window(provider, model, weight, active, 60)
    }

    /// Build a service with an explicit rolling window length in seconds.
    pub fn with_window(
        provider: impl Into<String>,
        model: impl Into<String>,
        weight: u32,
        active: bool,
        time_window_secs: u64,
    ) -> Self {
        Self::with_stats(
            provider,
            model,
            weight,
            active,
            Arc::new(ServiceStats::with_defaults(time_window_secs)),
        )
    }

    /// Build a service reusing an existing stats handle, e.g. when a
    /// configuration reload re-attaches a surviving service's warmed-up
    /// stats to its replacement.
    pub fn with_stats(
        provider: impl Into<String>,
        model: impl Into<String>,
        weight: u32,
        active: bool,
        stats: Arc<ServiceStats>,
    ) -> Self {
        let provider = provider.into();
        let model = model.into();
        let id = format!("{provider}:{model}");
        Self {
            provider,
            model,
            id,
            weight,
            active,
            stats,
        }
    }

    /// Canonical `"<provider>:<model>"` identity.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Rolling statistics owned exclusively by this service.
    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }

    /// Clone of the stats handle, for carrying warmup over to a successor
    /// service during a configuration reload.
    pub fn stats_arc(&self) -> Arc<ServiceStats> {
        self.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_provider_colon_model() {
        let svc = Service::new("openai", "gpt-4o", 1, true);
        assert_eq!(svc.id(), "openai:gpt-4o");
    }
}
