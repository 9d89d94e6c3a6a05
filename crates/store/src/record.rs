use serde::{Deserialize, Serialize};

/// A persisted rule as stored in a backend: the wire envelope plus
/// identity and timestamps. `rule_data` is the codec's JSON string; the
/// store never looks inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    /// 1 = condition→action rule, 2 = condition→split rule.
    pub rule_type: i64,
    pub rule_data: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub created_at: String,
    /// ISO 8601 / RFC 3339 timestamp string.
    pub updated_at: String,
}

impl RuleRecord {
    /// Build an unsaved record from envelope fields. Timestamps are
    /// stamped by the backend on create/update.
    pub fn new(id: &str, name: &str, description: &str, rule_type: i64, rule_data: &str) -> Self {
        RuleRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            rule_type,
            rule_data: rule_data.to_string(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}
