//! Routing core error taxonomy.

/// Errors surfaced by the selection pipeline and its supporting components.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RouterError {
    /// The rule has no active service to choose from.
    #[error("rule {0} has no active service")]
    NoActiveService(String),

    /// A tactic returned no service despite a non-empty candidate set.
    ///
    /// Should be unreachable for a correctly implemented tactic; callers should
    /// log this at error level if it ever surfaces.
    #[error("tactic returned no service for rule {0} despite non-empty candidates")]
    SelectionFailed(String),

    /// Config named a tactic kind outside the closed set known to this core.
    #[error("unknown tactic kind: {0}")]
    UnknownTactic(String),

    /// A rule was constructed with an empty or otherwise invalid stable identifier.
    #[error("rule identifier must be a non-empty stable string")]
    InvalidRuleIdentifier,
}
