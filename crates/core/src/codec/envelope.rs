//! The persisted rule envelope.
//!
//! A rule is stored and transmitted as `{ name, description, rule_type,
//! rule_data }` where `rule_data` is a JSON string holding `{ ifs, thens }`
//! for standard rules or `{ ifs, splits }` for split rules. This module is
//! the outermost codec boundary: how the envelope travels (HTTP body, rule
//! store record) is the caller's concern.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::codec::{action, condition, split};
use crate::model::{Actions, Rule, SplitConfig};
use crate::registry::ResolverSnapshot;

/// Envelope `rule_type` for a condition→action rule.
pub const RULE_TYPE_STANDARD: i64 = 1;
/// Envelope `rule_type` for a condition→split rule.
pub const RULE_TYPE_SPLIT: i64 = 2;

/// The wire envelope for one persisted rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleEnvelope {
    pub name: String,
    pub description: String,
    pub rule_type: i64,
    /// JSON string: `{"ifs": ...}` plus `"thens"` or `"splits"`.
    pub rule_data: String,
}

/// Errors crossing the envelope boundary. Everything inside a parsed
/// payload degrades silently; only an unparseable `rule_data` string is
/// surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    /// The `rule_data` field is not valid JSON.
    RuleData(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::RuleData(msg) => {
                write!(f, "invalid rule_data payload: {}", msg)
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}

/// Encode a structured rule into its persisted envelope.
///
/// The rule type follows the split codec: a rule whose split config
/// produces records is persisted as a split rule with no `thens`;
/// everything else is a standard rule with no `splits` field.
pub fn encode_rule(rule: &Rule, resolver: &ResolverSnapshot) -> RuleEnvelope {
    let mut data = Map::new();
    data.insert("ifs".to_string(), condition::encode(&rule.conditions));

    let rule_type = match split::encode(&rule.splits, resolver) {
        Some(records) => {
            data.insert("splits".to_string(), records);
            RULE_TYPE_SPLIT
        }
        None => {
            data.insert(
                "thens".to_string(),
                Value::Array(action::encode(&rule.actions, resolver)),
            );
            RULE_TYPE_STANDARD
        }
    };

    RuleEnvelope {
        name: rule.name.clone(),
        description: rule.description.clone(),
        rule_type,
        rule_data: Value::Object(data).to_string(),
    }
}

/// Decode a persisted envelope back into an editable rule using the
/// current registry snapshot. Missing `ifs`/`thens`/`splits` fields mean
/// "no conditions/actions/splits", not an error.
pub fn decode_rule(
    envelope: &RuleEnvelope,
    resolver: &ResolverSnapshot,
) -> Result<Rule, EnvelopeError> {
    let data: Value = serde_json::from_str(&envelope.rule_data)
        .map_err(|e| EnvelopeError::RuleData(e.to_string()))?;

    let conditions = data
        .get("ifs")
        .map(condition::decode)
        .unwrap_or_default();
    let actions = data
        .get("thens")
        .and_then(Value::as_array)
        .map(|thens| action::decode(thens, resolver))
        .unwrap_or_else(Actions::default);
    let splits = data
        .get("splits")
        .map(|payload| split::decode(payload, resolver))
        .unwrap_or_else(SplitConfig::default);

    Ok(Rule {
        name: envelope.name.clone(),
        description: envelope.description.clone(),
        conditions,
        actions,
        splits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReviewStatus, SplitRow, SplitType};
    use crate::registry::{CategoryEntry, TagEntry};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn resolver() -> ResolverSnapshot {
        ResolverSnapshot::new(
            &[TagEntry {
                id: "id_17".to_string(),
                name: "Reimbursable".to_string(),
            }],
            &[CategoryEntry {
                id: "enc_rent".to_string(),
                name: "Rent".to_string(),
            }],
        )
    }

    #[test]
    fn standard_rule_gets_thens_and_type_1() {
        let mut rule = Rule {
            name: "Tag Amazon".to_string(),
            description: "".to_string(),
            ..Rule::default()
        };
        rule.actions.add_tags.enabled = true;
        rule.actions.add_tags.tags = vec!["Reimbursable".to_string()];

        let envelope = encode_rule(&rule, &resolver());
        assert_eq!(envelope.rule_type, RULE_TYPE_STANDARD);

        let data: Value = serde_json::from_str(&envelope.rule_data).unwrap();
        assert_eq!(data["thens"], json!([[3, ["id_17"]]]));
        assert!(data.get("splits").is_none());
    }

    #[test]
    fn split_rule_gets_splits_and_type_2_and_no_thens() {
        let mut rule = Rule::default();
        rule.name = "Split rent".to_string();
        rule.splits = SplitConfig {
            enabled: true,
            hide_original: false,
            split_type: SplitType::Amount,
            rows: vec![SplitRow {
                merchant: "Landlord".to_string(),
                category: "Rent".to_string(),
                value: Decimal::from(900),
                tags: vec![],
                review_status: ReviewStatus::None,
                reviewer: None,
            }],
        };
        // Enabled actions on a split rule are not persisted.
        rule.actions.hide.enabled = true;

        let envelope = encode_rule(&rule, &resolver());
        assert_eq!(envelope.rule_type, RULE_TYPE_SPLIT);

        let data: Value = serde_json::from_str(&envelope.rule_data).unwrap();
        assert!(data.get("thens").is_none());
        assert_eq!(data["splits"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn disabled_split_config_falls_back_to_standard() {
        let mut rule = Rule::default();
        rule.splits.enabled = true; // zero rows
        let envelope = encode_rule(&rule, &resolver());
        assert_eq!(envelope.rule_type, RULE_TYPE_STANDARD);

        let data: Value = serde_json::from_str(&envelope.rule_data).unwrap();
        assert!(data.get("splits").is_none());
    }

    #[test]
    fn missing_fields_decode_to_empty_rule() {
        let envelope = RuleEnvelope {
            name: "Sparse".to_string(),
            description: "".to_string(),
            rule_type: RULE_TYPE_STANDARD,
            rule_data: "{}".to_string(),
        };
        let rule = decode_rule(&envelope, &resolver()).unwrap();
        assert_eq!(rule.name, "Sparse");
        assert_eq!(rule.conditions, Default::default());
        assert_eq!(rule.actions, Default::default());
        assert!(!rule.splits.enabled);
    }

    #[test]
    fn unparseable_rule_data_is_the_one_surfaced_error() {
        let envelope = RuleEnvelope {
            name: "Corrupt".to_string(),
            description: "".to_string(),
            rule_type: RULE_TYPE_STANDARD,
            rule_data: "{not json".to_string(),
        };
        match decode_rule(&envelope, &resolver()) {
            Err(EnvelopeError::RuleData(_)) => {}
            other => panic!("expected RuleData error, got {:?}", other),
        }
    }
}
