//! Named routing rule: an ordered service list, a current-service cursor,
//! and the tactic used to pick among candidates.

use parking_lot::RwLock;

use super::error::RouterError;
use super::service::Service;
use super::tactic::config::TacticConfig;

/// Coarse tag classifying the inbound API dialect. Opaque to the routing
/// core itself; carried only so callers can group rules by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Openai,
    Anthropic,
    ClaudeCode,
    Opencode,
    Xcode,
    #[serde(rename = "_global")]
    Global,
}

/// A named routing policy binding a candidate service set to a tactic.
///
/// `current_service_id` is serialized behind a single `RwLock` rather than
/// an atomic, since it is a string and writes are rare relative to reads
/// (most selections on an established streak don't change it at all).
pub struct Rule {
    uuid: String,
    scenario: Scenario,
    services: Vec<Service>,
    current_service_id: RwLock<String>,
    tactic: TacticConfig,
    active: bool,
}

impl Rule {
    /// Construct a rule. Rejects an empty `uuid` rather than falling back
    /// to a pointer-derived identity for the round-robin streak key.
    pub fn new(
        uuid: impl Into<String>,
        scenario: Scenario,
        services: Vec<Service>,
        tactic: TacticConfig,
        active: bool,
    ) -> Result<Self, RouterError> {
        let uuid = uuid.into();
        if uuid.is_empty() {
            return Err(RouterError::InvalidRuleIdentifier);
        }
        Ok(Self {
            uuid,
            scenario,
            services,
            current_service_id: RwLock::new(String::new()),
            tactic,
            active,
        })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn tactic(&self) -> &TacticConfig {
        &self.tactic
    }

    pub fn set_tactic(&mut self, tactic: TacticConfig) {
        self.tactic = tactic;
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Services with `active == true`, in declaration order.
    pub fn active_services(&self) -> Vec<&Service> {
        self.services.iter().filter(|s| s.active()).collect()
    }

    /// Current service id cursor. May be empty if nothing has been
    /// selected yet.
    pub fn current_service_id(&self) -> String {
        self.current_service_id.read().clone()
    }

    /// Overwrite the current service id cursor. Writes are serialized
    /// through the lock so no two selections on the same rule observe a
    /// torn cursor.
    pub fn set_current_service_id(&self, id: impl Into<String>) {
        *self.current_service_id.write() = id.into();
    }

    /// Consume the rule, handing back its pieces. Used by
    /// [`super::registry::RuleRegistry`] to rebuild a rule around a
    /// service list with carried-over stats during a reload.
    pub fn into_parts(self) -> (String, Scenario, Vec<Service>, TacticConfig, bool) {
        (self.uuid, self.scenario, self.services, self.tactic, self.active)
    }
}
