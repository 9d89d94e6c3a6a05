//! Action-list encode/decode.
//!
//! One tagged tuple per enabled action. Tag and category display names
//! cross the wire as registry ids; the resolver snapshot translates in
//! both directions and anything it cannot resolve is dropped.

use serde_json::{json, Value};

use crate::codec::tags;
use crate::codec::value;
use crate::model::Actions;
use crate::registry::ResolverSnapshot;

/// Encode the enabled actions to `thens` tuples. An action whose
/// name no longer resolves against the snapshot is omitted.
pub fn encode(actions: &Actions, resolver: &ResolverSnapshot) -> Vec<Value> {
    let mut thens = Vec::new();

    if actions.rename.enabled {
        thens.push(json!([tags::ACTION_RENAME_MERCHANT, actions.rename.name]));
    }
    if actions.recategorize.enabled {
        if let Some(id) = resolver.category_id(&actions.recategorize.category) {
            thens.push(json!([tags::ACTION_UPDATE_CATEGORY, id]));
        }
    }
    if actions.add_tags.enabled {
        let ids = resolver.tag_ids(actions.add_tags.tags.iter().map(String::as_str));
        if !ids.is_empty() {
            thens.push(json!([tags::ACTION_ADD_TAGS, ids]));
        }
    }
    if actions.hide.enabled {
        thens.push(json!([tags::ACTION_HIDE_TRANSACTION]));
    }
    if actions.link_goal.enabled {
        thens.push(json!([tags::ACTION_LINK_TO_GOAL, actions.link_goal.goal_id]));
    }

    thens
}

/// Decode `thens` tuples into the structured action set. Unknown tags
/// are skipped; tag ids missing from the snapshot are dropped from the
/// resulting list without touching sibling actions.
pub fn decode(tuples: &[Value], resolver: &ResolverSnapshot) -> Actions {
    let mut actions = Actions::default();

    for tuple in tuples {
        let Some((tag, rest)) = value::tuple_parts(tuple) else {
            continue;
        };
        match tag {
            tags::ACTION_RENAME_MERCHANT => {
                if let Some(name) = rest.first().and_then(Value::as_str) {
                    actions.rename.enabled = true;
                    actions.rename.name = name.to_string();
                }
            }
            tags::ACTION_UPDATE_CATEGORY => {
                let name = rest
                    .first()
                    .and_then(value::id_from)
                    .and_then(|id| resolver.category_name(&id).map(str::to_string));
                if let Some(name) = name {
                    actions.recategorize.enabled = true;
                    actions.recategorize.category = name;
                }
            }
            tags::ACTION_ADD_TAGS => {
                // The payload may be a bare id instead of an id array in
                // legacy payloads.
                if let Some(payload) = rest.first() {
                    let ids = value::id_list(payload);
                    actions.add_tags.enabled = true;
                    actions.add_tags.tags =
                        resolver.tag_names(ids.iter().map(String::as_str));
                }
            }
            tags::ACTION_HIDE_TRANSACTION => {
                actions.hide.enabled = true;
            }
            tags::ACTION_LINK_TO_GOAL => {
                if let Some(goal_id) = rest.first().and_then(value::id_from) {
                    actions.link_goal.enabled = true;
                    actions.link_goal.goal_id = goal_id;
                }
            }
            _ => {}
        }
    }

    actions
}
