//! # routing-core
//!
//! Multi-tenant routing and load-balancing core for LLM inference traffic.
//!
//! This crate sits in front of many upstream inference services (each
//! identified by a `(provider, model)` pair) and, for every request,
//! selects one service from a candidate set governed by a named routing
//! [`Rule`], respecting health, weight, and a chosen [`TacticConfig`] that
//! blends request count, token consumption, latency, and generation speed.
//!
//! The HTTP/WebSocket front end, upstream wire-protocol adapters, auth,
//! and persistent configuration storage are deliberately out of scope —
//! this crate exposes only in-process interfaces (see [`core::router`]).
//!
//! ## Quick start
//!
//! ```
//! use routing_core::{HealthFilter, Rule, Scenario, Selector, Service, SystemClock, ThreadRandomSource};
//! use routing_core::{DashMapStreakStore, TacticConfig};
//! use routing_core::core::router::tactic::config::RoundRobinParams;
//!
//! let services = vec![
//!     Service::new("openai", "gpt-4o", 1, true),
//!     Service::new("anthropic", "claude-3-sonnet", 1, true),
//! ];
//! let rule = Rule::new(
//!     "primary",
//!     Scenario::Openai,
//!     services,
//!     TacticConfig::RoundRobin(RoundRobinParams::default()),
//!     true,
//! ).unwrap();
//!
//! let clock = SystemClock;
//! let random = ThreadRandomSource;
//! let streaks = DashMapStreakStore::new();
//! let filter = HealthFilter::passthrough();
//!
//! let chosen = Selector::select(&rule, &filter, &clock, &random, &streaks).unwrap();
//! println!("routed to {}", chosen.id());
//! ```

#![warn(clippy::all)]

pub mod core;
pub mod utils;

pub use core::router::{
    Clock, DashMapStreakStore, FixedRandomSource, HealthFilter, HealthMonitor,
    HealthMonitorConfig, ManualClock, RandomSource, Rule, RouterError, Scenario, SeededRandomSource,
    Selector, Service, StreakStore, SystemClock, TacticConfig, ThreadRandomSource,
};
pub use utils::error::Result;

/// Current version of the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_matches_cargo_metadata() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(NAME, env!("CARGO_PKG_NAME"));
    }
}
