//! Projects a candidate service list through a [`HealthMonitor`], with a
//! fallback that avoids total blackout when every candidate looks unhealthy.

use super::clock::Clock;
use super::health::HealthMonitor;
use super::service::Service;

/// Filters services by health, preserving input ordering.
///
/// A filter with no monitor attached treats every service as healthy —
/// this is the "nil monitor" case from the health-filter contract, useful
/// for callers that haven't wired up health tracking yet.
pub struct HealthFilter<'a> {
    monitor: Option<&'a HealthMonitor>,
}

impl<'a> HealthFilter<'a> {
    pub fn new(monitor: &'a HealthMonitor) -> Self {
        Self {
            monitor: Some(monitor),
        }
    }

    /// A filter that reports every service healthy, for callers without a
    /// health monitor wired up.
    pub fn passthrough() -> Self {
        Self { monitor: None }
    }

    /// Subset of `services` reported healthy, in input order.
    pub fn filter<'s>(&self, services: &[&'s Service], clock: &dyn Clock) -> Vec<&'s Service> {
        match self.monitor {
            None => services.to_vec(),
            Some(monitor) => services
                .iter()
                .copied()
                .filter(|s| monitor.is_healthy(s.id(), clock))
                .collect(),
        }
    }

    /// `filter(services)` if non-empty, else the original list unchanged.
    pub fn filter_with_fallback<'s>(
        &self,
        services: &[&'s Service],
        clock: &dyn Clock,
    ) -> Vec<&'s Service> {
        let healthy = self.filter(services, clock);
        if healthy.is_empty() {
            services.to_vec()
        } else {
            healthy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::router::clock::ManualClock;
    use crate::core::router::health::HealthMonitorConfig;

    #[test]
    fn passthrough_reports_everything_healthy() {
        let a = Service::new("openai", "gpt-4o", 1, true);
        let b = Service::new("anthropic", "claude-3", 1, true);
        let clock = ManualClock::new(0);
        let filter = HealthFilter::passthrough();
        assert_eq!(filter.filter(&[&a, &b], &clock).len(), 2);
    }

    #[test]
    fn fallback_returns_all_when_all_unhealthy() {
        let a = Service::new("openai", "gpt-4o", 1, true);
        let b = Service::new("anthropic", "claude-3", 1, true);
        let clock = ManualClock::new(0);
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        monitor.report_rate_limit(a.id(), &clock);
        monitor.report_rate_limit(b.id(), &clock);
        let filter = HealthFilter::new(&monitor);

        assert!(filter.filter(&[&a, &b], &clock).is_empty());
        let fallback = filter.filter_with_fallback(&[&a, &b], &clock);
        assert_eq!(fallback.len(), 2);
    }

    #[test]
    fn filter_preserves_ordering() {
        let a = Service::new("openai", "gpt-4o", 1, true);
        let b = Service::new("anthropic", "claude-3", 1, true);
        let c = Service::new("azure", "gpt-4o", 1, true);
        let clock = ManualClock::new(0);
        let monitor = HealthMonitor::new(HealthMonitorConfig::default());
        monitor.report_rate_limit(b.id(), &clock);
        let filter = HealthFilter::new(&monitor);
        let result = filter.filter(&[&a, &b, &c], &clock);
        assert_eq!(result.iter().map(|s| s.id()).collect::<Vec<_>>(), vec![a.id(), c.id()]);
    }
}
