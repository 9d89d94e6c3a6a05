/// All errors that can be returned by a RuleStore implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No rule with the given id exists in the store.
    #[error("rule not found: {rule_id}")]
    RuleNotFound { rule_id: String },

    /// A rule with this id already exists.
    #[error("rule already exists: {rule_id}")]
    DuplicateRule { rule_id: String },

    /// A backend-specific storage error (I/O, serialization, etc.).
    #[error("store backend error: {0}")]
    Backend(String),
}
