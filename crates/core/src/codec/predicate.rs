//! Per-predicate encode/decode between structured matchers and tagged
//! tuples `[tag, op, ...operands]`.
//!
//! Both directions are total over their inputs: an operator/kind
//! combination the codec does not recognize yields `None` and the caller
//! drops that predicate instead of failing the rule.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::codec::tags;
use crate::codec::value;
use crate::model::{
    AmountOp, DateOp, DescriptionOp, Direction, MatchTarget, MerchantPredicate, TextOp,
};

/// One wire-level predicate, the unit the tuple codec works in. The
/// condition codec flattens the structured condition set into these on
/// encode and folds them back on decode.
#[derive(Debug, Clone, PartialEq)]
pub enum WirePredicate {
    Merchant {
        target: MatchTarget,
        predicate: MerchantPredicate,
    },
    Amount {
        direction: Option<Direction>,
        op: Option<AmountOp>,
        value: Option<Decimal>,
        upper: Option<Decimal>,
    },
    Date {
        op: DateOp,
        start: String,
        end: Option<String>,
    },
    Category {
        id: String,
    },
    Account {
        id: String,
    },
    Description {
        op: DescriptionOp,
        value: String,
    },
}

/// Encode one predicate to its tagged tuple. Returns `None` for
/// combinations the wire cannot express (missing operands, no operator).
pub fn encode(pred: &WirePredicate) -> Option<Value> {
    match pred {
        WirePredicate::Merchant { target, predicate } => {
            let tag = match target {
                MatchTarget::MerchantName => tags::COND_MERCHANT,
                MatchTarget::OriginalStatement => tags::COND_ORIGINAL_TEXT,
            };
            let op = text_op_to_wire(predicate.op);
            Some(json!([tag, op, predicate.value]))
        }

        WirePredicate::Amount {
            direction,
            op,
            value,
            upper,
        } => encode_amount(*direction, *op, *value, *upper),

        WirePredicate::Date { op, start, end } => {
            if !value::is_iso_date(start) {
                return None;
            }
            match op {
                DateOp::Between => {
                    let end = end.as_deref().filter(|e| value::is_iso_date(e))?;
                    Some(json!([tags::COND_DATE, tags::DATE_BETWEEN, start, end]))
                }
                DateOp::After => Some(json!([tags::COND_DATE, tags::DATE_AFTER, start])),
                DateOp::Before => Some(json!([tags::COND_DATE, tags::DATE_BEFORE, start])),
                DateOp::On => Some(json!([tags::COND_DATE, tags::DATE_ON, start])),
            }
        }

        WirePredicate::Category { id } => Some(json!([tags::COND_CATEGORY, id])),

        WirePredicate::Account { id } => Some(json!([tags::COND_ACCOUNT, id])),

        WirePredicate::Description { op, value } => {
            let op = match op {
                DescriptionOp::Contains => tags::DESC_CONTAINS,
                DescriptionOp::ExactMatch => tags::DESC_EXACT_MATCH,
            };
            Some(json!([tags::COND_DESCRIPTION, op, value]))
        }
    }
}

/// The amount tag is two-dimensional: one tuple expresses either the
/// operator grouping (tags 1-4) or the direction grouping (tags 5-6).
/// A set direction wins; operator tags are used only without one. The
/// editing layer never sets both groupings with a non-GreaterThan
/// operator, so the round trip stays exact in practice.
fn encode_amount(
    direction: Option<Direction>,
    op: Option<AmountOp>,
    value: Option<Decimal>,
    upper: Option<Decimal>,
) -> Option<Value> {
    if let Some(direction) = direction {
        let tag = match direction {
            Direction::Expense => tags::AMOUNT_EXPENSE,
            Direction::Income => tags::AMOUNT_INCOME,
        };
        return Some(match value {
            Some(v) => json!([tags::COND_AMOUNT, tag, value::decimal_to(v)]),
            None => json!([tags::COND_AMOUNT, tag]),
        });
    }
    match op? {
        AmountOp::GreaterThan => Some(json!([
            tags::COND_AMOUNT,
            tags::AMOUNT_GREATER_THAN,
            value::decimal_to(value?)
        ])),
        AmountOp::LessThan => Some(json!([
            tags::COND_AMOUNT,
            tags::AMOUNT_LESS_THAN,
            value::decimal_to(value?)
        ])),
        AmountOp::EqualTo => Some(json!([
            tags::COND_AMOUNT,
            tags::AMOUNT_EQUAL_TO,
            value::decimal_to(value?)
        ])),
        AmountOp::Between => Some(json!([
            tags::COND_AMOUNT,
            tags::AMOUNT_BETWEEN,
            value::decimal_to(value?),
            value::decimal_to(upper?)
        ])),
    }
}

/// Decode one tagged tuple. Returns `None` for unknown tags, unknown
/// sub-tags, and malformed operands.
pub fn decode(tuple: &Value) -> Option<WirePredicate> {
    let (tag, rest) = value::tuple_parts(tuple)?;
    match tag {
        tags::COND_MERCHANT | tags::COND_ORIGINAL_TEXT => {
            let target = if tag == tags::COND_MERCHANT {
                MatchTarget::MerchantName
            } else {
                MatchTarget::OriginalStatement
            };
            let op = text_op_from_wire(rest.first()?.as_i64()?)?;
            let value = rest.get(1)?.as_str()?.to_string();
            Some(WirePredicate::Merchant {
                target,
                predicate: MerchantPredicate { op, value },
            })
        }

        tags::COND_AMOUNT => decode_amount(rest),

        tags::COND_DATE => {
            let op = rest.first()?.as_i64()?;
            let start = value::iso_date_from(rest.get(1)?)?;
            match op {
                tags::DATE_AFTER => Some(date_pred(DateOp::After, start, None)),
                tags::DATE_BEFORE => Some(date_pred(DateOp::Before, start, None)),
                tags::DATE_ON => Some(date_pred(DateOp::On, start, None)),
                tags::DATE_BETWEEN => {
                    let end = value::iso_date_from(rest.get(2)?)?;
                    Some(date_pred(DateOp::Between, start, Some(end)))
                }
                _ => None,
            }
        }

        tags::COND_ACCOUNT => Some(WirePredicate::Account {
            id: value::id_from(rest.first()?)?,
        }),

        tags::COND_CATEGORY => Some(WirePredicate::Category {
            id: value::id_from(rest.first()?)?,
        }),

        tags::COND_DESCRIPTION => {
            let op = match rest.first()?.as_i64()? {
                tags::DESC_CONTAINS => DescriptionOp::Contains,
                tags::DESC_EXACT_MATCH => DescriptionOp::ExactMatch,
                _ => return None,
            };
            let value = rest.get(1)?.as_str()?.to_string();
            Some(WirePredicate::Description { op, value })
        }

        _ => None,
    }
}

/// Inverse of [`encode_amount`]. Direction tags imply GreaterThan when an
/// operand is present so that a `{direction, greater-than, value}` rule
/// survives the round trip byte-exactly.
fn decode_amount(rest: &[Value]) -> Option<WirePredicate> {
    let sub = rest.first()?.as_i64()?;
    let operand = rest.get(1).and_then(value::decimal_from);
    match sub {
        tags::AMOUNT_GREATER_THAN => Some(amount_pred(None, AmountOp::GreaterThan, operand?, None)),
        tags::AMOUNT_LESS_THAN => Some(amount_pred(None, AmountOp::LessThan, operand?, None)),
        tags::AMOUNT_EQUAL_TO => Some(amount_pred(None, AmountOp::EqualTo, operand?, None)),
        tags::AMOUNT_BETWEEN => {
            let upper = rest.get(2).and_then(value::decimal_from)?;
            Some(amount_pred(None, AmountOp::Between, operand?, Some(upper)))
        }
        tags::AMOUNT_EXPENSE | tags::AMOUNT_INCOME => {
            let direction = if sub == tags::AMOUNT_EXPENSE {
                Direction::Expense
            } else {
                Direction::Income
            };
            Some(WirePredicate::Amount {
                direction: Some(direction),
                op: operand.is_some().then_some(AmountOp::GreaterThan),
                value: operand,
                upper: None,
            })
        }
        _ => None,
    }
}

fn amount_pred(
    direction: Option<Direction>,
    op: AmountOp,
    value: Decimal,
    upper: Option<Decimal>,
) -> WirePredicate {
    WirePredicate::Amount {
        direction,
        op: Some(op),
        value: Some(value),
        upper,
    }
}

fn date_pred(op: DateOp, start: String, end: Option<String>) -> WirePredicate {
    WirePredicate::Date { op, start, end }
}

fn text_op_to_wire(op: TextOp) -> i64 {
    match op {
        TextOp::ExactMatch => tags::TEXT_EXACT_MATCH,
        TextOp::Contains => tags::TEXT_CONTAINS,
        TextOp::StartsWith => tags::TEXT_STARTS_WITH,
        TextOp::EndsWith => tags::TEXT_ENDS_WITH,
    }
}

fn text_op_from_wire(op: i64) -> Option<TextOp> {
    match op {
        tags::TEXT_EXACT_MATCH => Some(TextOp::ExactMatch),
        tags::TEXT_CONTAINS => Some(TextOp::Contains),
        tags::TEXT_STARTS_WITH => Some(TextOp::StartsWith),
        tags::TEXT_ENDS_WITH => Some(TextOp::EndsWith),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn merchant_tuple_uses_target_tag() {
        let pred = WirePredicate::Merchant {
            target: MatchTarget::MerchantName,
            predicate: MerchantPredicate {
                op: TextOp::Contains,
                value: "Amazon".to_string(),
            },
        };
        assert_eq!(encode(&pred), Some(json!([5, 2, "Amazon"])));
        assert_eq!(decode(&json!([5, 2, "Amazon"])), Some(pred));

        let pred = WirePredicate::Merchant {
            target: MatchTarget::OriginalStatement,
            predicate: MerchantPredicate {
                op: TextOp::ExactMatch,
                value: "AMZN MKTP".to_string(),
            },
        };
        assert_eq!(encode(&pred), Some(json!([1, 1, "AMZN MKTP"])));
        assert_eq!(decode(&json!([1, 1, "AMZN MKTP"])), Some(pred));
    }

    #[test]
    fn legacy_text_sub_tags_map_to_starts_and_ends_with() {
        let decoded = decode(&json!([5, 3, "UBER"])).unwrap();
        match &decoded {
            WirePredicate::Merchant { predicate, .. } => {
                assert_eq!(predicate.op, TextOp::StartsWith)
            }
            other => panic!("expected merchant predicate, got {:?}", other),
        }
        assert_eq!(encode(&decoded), Some(json!([5, 3, "UBER"])));

        let decoded = decode(&json!([1, 4, "LLC"])).unwrap();
        match &decoded {
            WirePredicate::Merchant { predicate, .. } => {
                assert_eq!(predicate.op, TextOp::EndsWith)
            }
            other => panic!("expected merchant predicate, got {:?}", other),
        }
    }

    #[test]
    fn amount_direction_tag_wins_over_operator() {
        // The direction grouping takes the tag even when an operator is
        // also set on the structured side.
        let pred = WirePredicate::Amount {
            direction: Some(Direction::Expense),
            op: Some(AmountOp::GreaterThan),
            value: Some(dec(50)),
            upper: None,
        };
        assert_eq!(encode(&pred), Some(json!([2, 5, 50])));
        // Decode restores both fields.
        assert_eq!(decode(&json!([2, 5, 50])), Some(pred));
    }

    #[test]
    fn amount_operator_tags_round_trip() {
        let pred = WirePredicate::Amount {
            direction: None,
            op: Some(AmountOp::LessThan),
            value: Some(dec(30)),
            upper: None,
        };
        assert_eq!(encode(&pred), Some(json!([2, 2, 30])));
        assert_eq!(decode(&json!([2, 2, 30])), Some(pred));

        let pred = WirePredicate::Amount {
            direction: None,
            op: Some(AmountOp::Between),
            value: Some(dec(10)),
            upper: Some(dec(100)),
        };
        assert_eq!(encode(&pred), Some(json!([2, 4, 10, 100])));
        assert_eq!(decode(&json!([2, 4, 10, 100])), Some(pred));
    }

    #[test]
    fn amount_direction_without_operand() {
        let pred = WirePredicate::Amount {
            direction: Some(Direction::Income),
            op: None,
            value: None,
            upper: None,
        };
        assert_eq!(encode(&pred), Some(json!([2, 6])));
        assert_eq!(decode(&json!([2, 6])), Some(pred));
    }

    #[test]
    fn amount_missing_operands_dropped() {
        assert!(encode(&WirePredicate::Amount {
            direction: None,
            op: Some(AmountOp::GreaterThan),
            value: None,
            upper: None,
        })
        .is_none());
        assert!(encode(&WirePredicate::Amount {
            direction: None,
            op: Some(AmountOp::Between),
            value: Some(dec(10)),
            upper: None,
        })
        .is_none());
        assert!(encode(&WirePredicate::Amount {
            direction: None,
            op: None,
            value: Some(dec(10)),
            upper: None,
        })
        .is_none());
        assert!(decode(&json!([2, 1])).is_none());
        assert!(decode(&json!([2, 4, 10])).is_none());
    }

    #[test]
    fn date_tuples_round_trip_and_validate() {
        let pred = WirePredicate::Date {
            op: DateOp::Between,
            start: "2024-01-01".to_string(),
            end: Some("2024-06-30".to_string()),
        };
        assert_eq!(encode(&pred), Some(json!([3, 4, "2024-01-01", "2024-06-30"])));
        assert_eq!(decode(&json!([3, 4, "2024-01-01", "2024-06-30"])), Some(pred));

        let pred = WirePredicate::Date {
            op: DateOp::After,
            start: "2024-02-29".to_string(),
            end: None,
        };
        assert_eq!(encode(&pred), Some(json!([3, 1, "2024-02-29"])));

        // Invalid dates drop the tuple on both sides.
        assert!(encode(&WirePredicate::Date {
            op: DateOp::On,
            start: "not-a-date".to_string(),
            end: None,
        })
        .is_none());
        assert!(decode(&json!([3, 3, "2024-13-40"])).is_none());
    }

    #[test]
    fn category_and_account_carry_opaque_ids() {
        let pred = WirePredicate::Category {
            id: "enc_4fk2".to_string(),
        };
        assert_eq!(encode(&pred), Some(json!([6, "enc_4fk2"])));
        assert_eq!(decode(&json!([6, "enc_4fk2"])), Some(pred));

        // Numeric account ids from older payloads are accepted.
        assert_eq!(
            decode(&json!([4, 1203])),
            Some(WirePredicate::Account {
                id: "1203".to_string()
            })
        );
    }

    #[test]
    fn unknown_tags_and_sub_tags_are_dropped() {
        assert!(decode(&json!([99, 1, "x"])).is_none());
        assert!(decode(&json!([2, 9, 50])).is_none());
        assert!(decode(&json!([3, 9, "2024-01-01"])).is_none());
        assert!(decode(&json!([7, 3, "text"])).is_none());
        assert!(decode(&json!([5, 9, "Amazon"])).is_none());
        assert!(decode(&json!("not a tuple")).is_none());
    }
}
