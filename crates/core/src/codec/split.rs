//! Split-configuration encode/decode.
//!
//! A split rule persists an array of flat records, one per split row.
//! Each record carries `amount` or `percentage` (the other is null)
//! according to the config's split type. The shared `hide_original`
//! flag is duplicated onto every record for consumers that read any
//! record; this codec reads it back from the first record only.

use serde_json::{Map, Value};

use crate::codec::tags;
use crate::codec::value;
use crate::model::{ReviewStatus, SplitConfig, SplitRow, SplitType};
use crate::registry::ResolverSnapshot;

/// Encode a split configuration to its wire records.
///
/// Returns `None` when splitting is disabled or there are no rows: the
/// caller must omit the `splits` field entirely, never persist `[]`.
/// An absent `splits` field is what marks a rule as a standard
/// condition→action rule.
pub fn encode(splits: &SplitConfig, resolver: &ResolverSnapshot) -> Option<Value> {
    if !splits.is_active() {
        return None;
    }

    let records: Vec<Value> = splits
        .rows
        .iter()
        .map(|row| encode_row(row, splits, resolver))
        .collect();
    Some(Value::Array(records))
}

fn encode_row(row: &SplitRow, splits: &SplitConfig, resolver: &ResolverSnapshot) -> Value {
    let mut record = Map::new();
    record.insert("merchant".to_string(), Value::String(row.merchant.clone()));
    record.insert(
        "category_id".to_string(),
        resolver
            .category_id(&row.category)
            .map(|id| Value::String(id.to_string()))
            .unwrap_or(Value::Null),
    );

    let amount = value::decimal_to(row.value);
    match splits.split_type {
        SplitType::Amount => {
            record.insert("amount".to_string(), amount);
            record.insert("percentage".to_string(), Value::Null);
        }
        SplitType::Percentage => {
            record.insert("amount".to_string(), Value::Null);
            record.insert("percentage".to_string(), amount);
        }
    }

    let tag_ids = resolver.tag_ids(row.tags.iter().map(String::as_str));
    record.insert(
        "tags".to_string(),
        Value::Array(tag_ids.into_iter().map(Value::String).collect()),
    );
    record.insert(
        "review_status".to_string(),
        Value::from(review_status_to_wire(row.review_status)),
    );
    if let Some(reviewer) = &row.reviewer {
        record.insert("reviewer".to_string(), Value::String(reviewer.clone()));
    }
    record.insert("hide_original".to_string(), Value::Bool(splits.hide_original));

    Value::Object(record)
}

/// Decode wire records into a split configuration. Records missing the
/// value field for the detected split type are dropped; dangling tag and
/// category ids are dropped fieldwise. An empty or malformed payload
/// decodes to a disabled config.
pub fn decode(payload: &Value, resolver: &ResolverSnapshot) -> SplitConfig {
    let mut config = SplitConfig::default();
    let Some(records) = payload.as_array() else {
        return config;
    };
    let Some(first) = records.first() else {
        return config;
    };

    config.hide_original = first
        .get("hide_original")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    config.split_type = if first.get("amount").is_some_and(|v| !v.is_null()) {
        SplitType::Amount
    } else {
        SplitType::Percentage
    };

    let value_field = match config.split_type {
        SplitType::Amount => "amount",
        SplitType::Percentage => "percentage",
    };

    for record in records {
        let Some(obj) = record.as_object() else {
            continue;
        };
        let Some(row_value) = obj.get(value_field).and_then(value::decimal_from) else {
            continue;
        };

        let merchant = obj
            .get("merchant")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let category = obj
            .get("category_id")
            .and_then(value::id_from)
            .and_then(|id| resolver.category_name(&id).map(str::to_string))
            .unwrap_or_default();
        let tag_ids = obj.get("tags").map(value::id_list).unwrap_or_default();
        let tags = resolver.tag_names(tag_ids.iter().map(String::as_str));
        let review_status = obj
            .get("review_status")
            .and_then(Value::as_i64)
            .and_then(review_status_from_wire)
            .unwrap_or_default();
        let reviewer = obj
            .get("reviewer")
            .and_then(Value::as_str)
            .map(str::to_string);

        config.rows.push(SplitRow {
            merchant,
            category,
            value: row_value,
            tags,
            review_status,
            reviewer,
        });
    }

    config.enabled = !config.rows.is_empty();
    config
}

fn review_status_to_wire(status: ReviewStatus) -> i64 {
    match status {
        ReviewStatus::None => tags::REVIEW_NONE,
        ReviewStatus::NeedsReview => tags::REVIEW_NEEDS_REVIEW,
        ReviewStatus::Reviewed => tags::REVIEW_REVIEWED,
    }
}

fn review_status_from_wire(status: i64) -> Option<ReviewStatus> {
    match status {
        tags::REVIEW_NONE => Some(ReviewStatus::None),
        tags::REVIEW_NEEDS_REVIEW => Some(ReviewStatus::NeedsReview),
        tags::REVIEW_REVIEWED => Some(ReviewStatus::Reviewed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{CategoryEntry, TagEntry};
    use rust_decimal::Decimal;
    use serde_json::json;

    fn resolver() -> ResolverSnapshot {
        ResolverSnapshot::new(
            &[TagEntry {
                id: "id_17".to_string(),
                name: "Reimbursable".to_string(),
            }],
            &[
                CategoryEntry {
                    id: "enc_rent".to_string(),
                    name: "Rent".to_string(),
                },
                CategoryEntry {
                    id: "enc_util".to_string(),
                    name: "Utilities".to_string(),
                },
            ],
        )
    }

    fn two_way_split() -> SplitConfig {
        SplitConfig {
            enabled: true,
            hide_original: true,
            split_type: SplitType::Percentage,
            rows: vec![
                SplitRow {
                    merchant: "Landlord".to_string(),
                    category: "Rent".to_string(),
                    value: Decimal::from(70),
                    tags: vec!["Reimbursable".to_string()],
                    review_status: ReviewStatus::NeedsReview,
                    reviewer: Some("sam".to_string()),
                },
                SplitRow {
                    merchant: "Landlord".to_string(),
                    category: "Utilities".to_string(),
                    value: Decimal::from(30),
                    tags: vec![],
                    review_status: ReviewStatus::None,
                    reviewer: None,
                },
            ],
        }
    }

    #[test]
    fn disabled_or_empty_yields_none_never_empty_array() {
        assert!(encode(&SplitConfig::default(), &resolver()).is_none());

        let mut config = two_way_split();
        config.enabled = false;
        assert!(encode(&config, &resolver()).is_none());

        let mut config = two_way_split();
        config.rows.clear();
        assert!(encode(&config, &resolver()).is_none());
    }

    #[test]
    fn records_carry_amount_xor_percentage() {
        let config = two_way_split();
        let payload = encode(&config, &resolver()).unwrap();
        let records = payload.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0]["amount"].is_null());
        assert_eq!(records[0]["percentage"], json!(70));
        assert_eq!(records[0]["category_id"], json!("enc_rent"));
        assert_eq!(records[0]["tags"], json!(["id_17"]));
        assert_eq!(records[0]["review_status"], json!(1));
        assert_eq!(records[0]["reviewer"], json!("sam"));

        let mut config = config;
        config.split_type = SplitType::Amount;
        let payload = encode(&config, &resolver()).unwrap();
        let records = payload.as_array().unwrap();
        assert_eq!(records[1]["amount"], json!(30));
        assert!(records[1]["percentage"].is_null());
    }

    #[test]
    fn hide_original_duplicated_on_encode_read_from_first_on_decode() {
        let config = two_way_split();
        let payload = encode(&config, &resolver()).unwrap();
        for record in payload.as_array().unwrap() {
            assert_eq!(record["hide_original"], json!(true));
        }

        let decoded = decode(&payload, &resolver());
        assert!(decoded.hide_original);

        // A payload where later records disagree still follows the first.
        let mut records = payload.as_array().unwrap().clone();
        records[1]["hide_original"] = json!(false);
        let decoded = decode(&Value::Array(records), &resolver());
        assert!(decoded.hide_original);
    }

    #[test]
    fn round_trip_preserves_rows() {
        let config = two_way_split();
        let payload = encode(&config, &resolver()).unwrap();
        let decoded = decode(&payload, &resolver());
        assert_eq!(decoded, config);
    }

    #[test]
    fn dangling_references_drop_fieldwise() {
        let payload = json!([{
            "merchant": "Gym",
            "category_id": "enc_deleted",
            "amount": 25,
            "percentage": null,
            "tags": ["id_17", "id_gone"],
            "review_status": 2,
            "hide_original": false
        }]);
        let decoded = decode(&payload, &resolver());
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].category, "");
        assert_eq!(decoded.rows[0].tags, vec!["Reimbursable"]);
        assert_eq!(decoded.rows[0].review_status, ReviewStatus::Reviewed);
    }

    #[test]
    fn malformed_records_are_dropped() {
        let payload = json!([
            {"merchant": "A", "amount": 10, "percentage": null, "tags": [], "review_status": 0, "hide_original": false},
            {"merchant": "B", "amount": null, "percentage": 50, "tags": [], "review_status": 0, "hide_original": false},
            "not a record"
        ]);
        // First record fixes the split type to Amount; the second has no
        // amount and is dropped.
        let decoded = decode(&payload, &resolver());
        assert_eq!(decoded.split_type, SplitType::Amount);
        assert_eq!(decoded.rows.len(), 1);
        assert_eq!(decoded.rows[0].merchant, "A");
        assert!(decoded.enabled);
    }

    #[test]
    fn empty_payload_decodes_to_disabled_config() {
        let decoded = decode(&json!([]), &resolver());
        assert!(!decoded.enabled);
        assert!(decoded.rows.is_empty());
    }
}
