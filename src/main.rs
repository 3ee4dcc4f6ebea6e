//! routing-core-demo — exercises the selection pipeline against a
//! hand-built rule so the library's behavior can be eyeballed without a
//! surrounding gateway.

use std::process::ExitCode;

use tracing::{info, Level};

use routing_core::core::router::tactic::config::{RoundRobinParams, TacticConfig};
use routing_core::{DashMapStreakStore, HealthFilter, Rule, Scenario, Selector, Service, SystemClock, ThreadRandomSource};
use routing_core::utils::logging::init_tracing;

fn main() -> ExitCode {
    init_tracing(Level::INFO);

    let services = vec![
        Service::new("openai", "gpt-4o", 1, true),
        Service::new("anthropic", "claude-3-sonnet", 1, true),
        Service::new("azure", "gpt-4o", 1, true),
    ];

    let rule = match Rule::new(
        "demo-rule",
        Scenario::Openai,
        services,
        TacticConfig::RoundRobin(RoundRobinParams { request_threshold: 2 }),
        true,
    ) {
        Ok(rule) => rule,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let clock = SystemClock;
    let random = ThreadRandomSource;
    let streaks = DashMapStreakStore::new();
    let filter = HealthFilter::passthrough();

    info!("starting selection demo for rule {}", rule.uuid());
    for i in 0..6 {
        match Selector::select(&rule, &filter, &clock, &random, &streaks) {
            Ok(chosen) => info!(request = i, service = chosen.id(), "selected"),
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
