//! In-memory reference backend.
//!
//! Used by tests and by tooling that does not need durability. Mirrors
//! the semantics durable backends must provide: duplicate detection on
//! create, not-found on get/update/delete, `created_at` preserved across
//! updates.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::RuleRecord;
use crate::traits::{now_timestamp, RuleStore};

/// A `RuleStore` over a mutex-guarded map.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: Mutex<BTreeMap<String, RuleRecord>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        MemoryRuleStore::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, RuleRecord>>, StoreError> {
        self.rules
            .lock()
            .map_err(|e| StoreError::Backend(format!("poisoned lock: {}", e)))
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn create_rule(&self, mut record: RuleRecord) -> Result<RuleRecord, StoreError> {
        let mut rules = self.lock()?;
        if rules.contains_key(&record.id) {
            return Err(StoreError::DuplicateRule {
                rule_id: record.id.clone(),
            });
        }
        let now = now_timestamp();
        record.created_at = now.clone();
        record.updated_at = now;
        rules.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_rule(&self, rule_id: &str) -> Result<RuleRecord, StoreError> {
        let rules = self.lock()?;
        rules
            .get(rule_id)
            .cloned()
            .ok_or_else(|| StoreError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })
    }

    async fn list_rules(&self) -> Result<Vec<RuleRecord>, StoreError> {
        let rules = self.lock()?;
        Ok(rules.values().cloned().collect())
    }

    async fn update_rule(&self, mut record: RuleRecord) -> Result<RuleRecord, StoreError> {
        let mut rules = self.lock()?;
        let existing = rules
            .get(&record.id)
            .ok_or_else(|| StoreError::RuleNotFound {
                rule_id: record.id.clone(),
            })?;
        record.created_at = existing.created_at.clone();
        record.updated_at = now_timestamp();
        rules.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<(), StoreError> {
        let mut rules = self.lock()?;
        rules
            .remove(rule_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })
    }
}
