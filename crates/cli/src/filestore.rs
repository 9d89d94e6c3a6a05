//! JSON-file-backed `RuleStore`.
//!
//! Every operation loads the whole file, applies the change, and writes
//! it back. Fine for a local rules file; durable backends live behind
//! the same trait.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;

use moneta_store::{now_timestamp, RuleRecord, RuleStore, StoreError};

pub(crate) struct FileRuleStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileRuleStore {
    pub(crate) fn open(path: PathBuf) -> Self {
        FileRuleStore {
            path,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, RuleRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = std::fs::read_to_string(&self.path).map_err(backend)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(backend)
    }

    fn save(&self, rules: &BTreeMap<String, RuleRecord>) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(rules).map_err(backend)?;
        std::fs::write(&self.path, text).map_err(backend)
    }
}

fn backend<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(e.to_string())
}

#[async_trait]
impl RuleStore for FileRuleStore {
    async fn create_rule(&self, mut record: RuleRecord) -> Result<RuleRecord, StoreError> {
        let _guard = self.lock.lock().map_err(backend)?;
        let mut rules = self.load()?;
        if rules.contains_key(&record.id) {
            return Err(StoreError::DuplicateRule {
                rule_id: record.id.clone(),
            });
        }
        let now = now_timestamp();
        record.created_at = now.clone();
        record.updated_at = now;
        rules.insert(record.id.clone(), record.clone());
        self.save(&rules)?;
        Ok(record)
    }

    async fn get_rule(&self, rule_id: &str) -> Result<RuleRecord, StoreError> {
        let _guard = self.lock.lock().map_err(backend)?;
        let rules = self.load()?;
        rules
            .get(rule_id)
            .cloned()
            .ok_or_else(|| StoreError::RuleNotFound {
                rule_id: rule_id.to_string(),
            })
    }

    async fn list_rules(&self) -> Result<Vec<RuleRecord>, StoreError> {
        let _guard = self.lock.lock().map_err(backend)?;
        let rules = self.load()?;
        Ok(rules.into_values().collect())
    }

    async fn update_rule(&self, mut record: RuleRecord) -> Result<RuleRecord, StoreError> {
        let _guard = self.lock.lock().map_err(backend)?;
        let mut rules = self.load()?;
        let existing = rules
            .get(&record.id)
            .ok_or_else(|| StoreError::RuleNotFound {
                rule_id: record.id.clone(),
            })?;
        record.created_at = existing.created_at.clone();
        record.updated_at = now_timestamp();
        rules.insert(record.id.clone(), record.clone());
        self.save(&rules)?;
        Ok(record)
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(backend)?;
        let mut rules = self.load()?;
        if rules.remove(rule_id).is_none() {
            return Err(StoreError::RuleNotFound {
                rule_id: rule_id.to_string(),
            });
        }
        self.save(&rules)
    }
}
