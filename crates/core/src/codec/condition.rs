//! Condition-set encode/decode over the nested boolean wire structure.
//!
//! The wire form is a disjunction of self-contained conjunctions: an
//! outer array with one inner array per merchant OR-group, where every
//! inner array repeats the full broadcast tuple set so a consumer can
//! evaluate each group in isolation. When no merchant groups are enabled
//! the payload degenerates to a single flat tuple list, which is also
//! the legacy persisted format this decoder still accepts.

use serde_json::Value;

use crate::codec::predicate::{self, WirePredicate};
use crate::model::{
    AmountCondition, ConditionSet, DateCondition, DescriptionCondition, MerchantGroup,
};

/// Encode a condition set to its `ifs` wire value.
pub fn encode(set: &ConditionSet) -> Value {
    let broadcast = broadcast_tuples(set);

    let groups: Vec<&MerchantGroup> = if set.merchant.enabled {
        set.merchant
            .groups
            .iter()
            .filter(|g| !g.predicates.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    if groups.is_empty() {
        return Value::Array(broadcast);
    }

    let outer: Vec<Value> = groups
        .iter()
        .map(|group| {
            let mut tuples: Vec<Value> = group
                .predicates
                .iter()
                .filter_map(|p| {
                    predicate::encode(&WirePredicate::Merchant {
                        target: group.target,
                        predicate: p.clone(),
                    })
                })
                .collect();
            tuples.extend(broadcast.iter().cloned());
            Value::Array(tuples)
        })
        .collect();
    Value::Array(outer)
}

/// Encode the enabled non-merchant conditions, one tuple per predicate
/// (membership conditions emit one tuple per selected id). These are the
/// tuples replicated into every OR-group.
fn broadcast_tuples(set: &ConditionSet) -> Vec<Value> {
    let mut tuples = Vec::new();

    if set.amount.enabled {
        tuples.extend(predicate::encode(&WirePredicate::Amount {
            direction: set.amount.direction,
            op: set.amount.op,
            value: set.amount.value,
            upper: set.amount.upper,
        }));
    }
    if set.categories.enabled {
        for id in &set.categories.ids {
            tuples.extend(predicate::encode(&WirePredicate::Category { id: id.clone() }));
        }
    }
    if set.accounts.enabled {
        for id in &set.accounts.ids {
            tuples.extend(predicate::encode(&WirePredicate::Account { id: id.clone() }));
        }
    }
    if set.description.enabled {
        tuples.extend(predicate::encode(&WirePredicate::Description {
            op: set.description.op,
            value: set.description.value.clone(),
        }));
    }
    if set.date.enabled {
        tuples.extend(predicate::encode(&WirePredicate::Date {
            op: set.date.op,
            start: set.date.start.clone(),
            end: set.date.end.clone(),
        }));
    }

    tuples
}

/// Decode an `ifs` wire value, nested or legacy flat, into a condition
/// set. Unrecognized tuples are skipped; the result is always a
/// structurally valid set.
pub fn decode(ifs: &Value) -> ConditionSet {
    let mut set = ConditionSet::default();
    let Some(arr) = ifs.as_array() else {
        return set;
    };

    if is_nested(arr) {
        let mut groups = Vec::new();
        for group_value in arr {
            let Some(tuples) = group_value.as_array() else {
                continue;
            };
            if let Some(group) = fold_tuples(tuples, &mut set) {
                groups.push(group);
            }
        }
        if !groups.is_empty() {
            set.merchant.enabled = true;
            set.merchant.groups = groups;
        }
    } else if let Some(group) = fold_tuples(arr, &mut set) {
        // Legacy flat payload: all merchant tuples collapse into one
        // implicit OR-group holding a single AND-chain.
        set.merchant.enabled = true;
        set.merchant.groups = vec![group];
    }

    set.merchant.normalize();
    set
}

/// A nested payload is an array of tuple arrays: its first element's
/// first element is itself an array.
fn is_nested(arr: &[Value]) -> bool {
    arr.first()
        .and_then(Value::as_array)
        .and_then(|inner| inner.first())
        .is_some_and(Value::is_array)
}

/// Walk one tuple list: merchant tuples accumulate into an AND-chain
/// (returned as a group, target taken from the first merchant tuple);
/// everything else populates the broadcast fields on `set`.
fn fold_tuples(tuples: &[Value], set: &mut ConditionSet) -> Option<MerchantGroup> {
    let mut group: Option<MerchantGroup> = None;
    for tuple in tuples {
        match predicate::decode(tuple) {
            Some(WirePredicate::Merchant { target, predicate }) => {
                group
                    .get_or_insert_with(|| MerchantGroup {
                        target,
                        predicates: Vec::new(),
                    })
                    .predicates
                    .push(predicate);
            }
            Some(other) => apply_broadcast(set, other),
            None => {}
        }
    }
    group
}

fn apply_broadcast(set: &mut ConditionSet, pred: WirePredicate) {
    match pred {
        WirePredicate::Amount {
            direction,
            op,
            value,
            upper,
        } => {
            set.amount = AmountCondition {
                enabled: true,
                direction,
                op,
                value,
                upper,
            };
        }
        WirePredicate::Date { op, start, end } => {
            set.date = DateCondition {
                enabled: true,
                op,
                start,
                end,
            };
        }
        WirePredicate::Description { op, value } => {
            set.description = DescriptionCondition {
                enabled: true,
                op,
                value,
            };
        }
        WirePredicate::Category { id } => {
            set.categories.enabled = true;
            set.categories.ids.insert(id);
        }
        WirePredicate::Account { id } => {
            set.accounts.enabled = true;
            set.accounts.ids.insert(id);
        }
        WirePredicate::Merchant { .. } => {}
    }
}
