use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::RuleRecord;

/// The storage trait for rule persistence backends.
///
/// The rule codec produces and consumes opaque envelope strings; a
/// `RuleStore` implementation provides durable CRUD over the resulting
/// records. Implementations stamp `created_at` on create and
/// `updated_at` on every write, and must be `Send + Sync + 'static` so
/// they can be shared across async task boundaries.
#[async_trait]
pub trait RuleStore: Send + Sync + 'static {
    /// Insert a new rule record.
    ///
    /// Returns `Err(StoreError::DuplicateRule)` if the id is taken.
    async fn create_rule(&self, record: RuleRecord) -> Result<RuleRecord, StoreError>;

    /// Read a rule by id.
    ///
    /// Returns `Err(StoreError::RuleNotFound)` if it does not exist.
    async fn get_rule(&self, rule_id: &str) -> Result<RuleRecord, StoreError>;

    /// List all rules, ordered by id.
    async fn list_rules(&self) -> Result<Vec<RuleRecord>, StoreError>;

    /// Replace an existing rule record, preserving its `created_at`.
    ///
    /// Returns `Err(StoreError::RuleNotFound)` if it does not exist.
    async fn update_rule(&self, record: RuleRecord) -> Result<RuleRecord, StoreError>;

    /// Delete a rule by id.
    ///
    /// Returns `Err(StoreError::RuleNotFound)` if it does not exist.
    async fn delete_rule(&self, rule_id: &str) -> Result<(), StoreError>;
}

/// Current UTC time as an RFC 3339 string, for backends stamping
/// record timestamps.
pub fn now_timestamp() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string())
}
