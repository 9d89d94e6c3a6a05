//! Structured rule model shared by the codec and the editing layer.
//!
//! These types are the in-memory form of an automation rule: a condition
//! set, an action set, and an optional transaction split. The wire form
//! (tagged tuples inside the persisted envelope) exists only at the codec
//! boundary; nothing here carries wire tags.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ──────────────────────────────────────────────
// Merchant conditions (OR-of-AND structure)
// ──────────────────────────────────────────────

/// Text matching operator for merchant and original-statement predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOp {
    ExactMatch,
    Contains,
    StartsWith,
    EndsWith,
}

impl Default for TextOp {
    fn default() -> Self {
        TextOp::Contains
    }
}

/// Which transaction text field a merchant group matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTarget {
    MerchantName,
    OriginalStatement,
}

impl Default for MatchTarget {
    fn default() -> Self {
        MatchTarget::MerchantName
    }
}

/// A single text test inside an AND-chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantPredicate {
    pub op: TextOp,
    pub value: String,
}

/// One OR-group: an ordered AND-chain of text predicates, all matching
/// the same text field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantGroup {
    pub target: MatchTarget,
    pub predicates: Vec<MerchantPredicate>,
}

impl MerchantGroup {
    pub fn new(target: MatchTarget) -> Self {
        MerchantGroup {
            target,
            predicates: vec![MerchantPredicate::default()],
        }
    }
}

impl Default for MerchantGroup {
    fn default() -> Self {
        MerchantGroup::new(MatchTarget::default())
    }
}

/// The nested boolean structure over merchant text predicates: the outer
/// list is disjunctive, each inner chain conjunctive.
///
/// Invariant: the group list is never empty and every group holds at
/// least one predicate. An "empty" condition is one group with one
/// empty-value predicate. The structural operations below maintain this;
/// [`MerchantCondition::normalize`] restores it on arbitrary input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantCondition {
    pub enabled: bool,
    pub groups: Vec<MerchantGroup>,
}

impl Default for MerchantCondition {
    fn default() -> Self {
        MerchantCondition {
            enabled: false,
            groups: vec![MerchantGroup::default()],
        }
    }
}

impl MerchantCondition {
    /// Append a new OR-group holding one empty predicate.
    pub fn add_group(&mut self, target: MatchTarget) {
        self.groups.push(MerchantGroup::new(target));
    }

    /// Append an empty AND-predicate to the group at `group_idx`.
    /// Out-of-range indices are ignored.
    pub fn add_predicate(&mut self, group_idx: usize) {
        if let Some(group) = self.groups.get_mut(group_idx) {
            group.predicates.push(MerchantPredicate::default());
        }
    }

    /// Remove one predicate. Removing the last predicate of a group
    /// removes the group; removing the last group leaves one group with
    /// one empty-value predicate.
    pub fn remove_predicate(&mut self, group_idx: usize, pred_idx: usize) {
        let Some(group) = self.groups.get_mut(group_idx) else {
            return;
        };
        if pred_idx >= group.predicates.len() {
            return;
        }
        group.predicates.remove(pred_idx);
        if group.predicates.is_empty() {
            self.groups.remove(group_idx);
        }
        if self.groups.is_empty() {
            self.groups.push(MerchantGroup::default());
        }
    }

    /// Restore the structural invariant: drop empty groups, then make
    /// sure at least one group remains.
    pub fn normalize(&mut self) {
        self.groups.retain(|g| !g.predicates.is_empty());
        if self.groups.is_empty() {
            self.groups.push(MerchantGroup::default());
        }
    }
}

// ──────────────────────────────────────────────
// Broadcast conditions
// ──────────────────────────────────────────────

/// Amount comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountOp {
    GreaterThan,
    LessThan,
    EqualTo,
    Between,
}

/// Transaction direction. Carried alongside the amount operator, not as
/// an operator variant; the wire can express only one of the two per
/// tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Expense,
    Income,
}

/// Amount condition. `op` and `direction` are orthogonal structured
/// fields; `upper` is only used with [`AmountOp::Between`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountCondition {
    pub enabled: bool,
    pub direction: Option<Direction>,
    pub op: Option<AmountOp>,
    pub value: Option<Decimal>,
    pub upper: Option<Decimal>,
}

/// Date comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOp {
    After,
    Before,
    On,
    Between,
}

impl Default for DateOp {
    fn default() -> Self {
        DateOp::On
    }
}

/// Date condition over ISO `YYYY-MM-DD` strings. `end` is only used
/// with [`DateOp::Between`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateCondition {
    pub enabled: bool,
    pub op: DateOp,
    pub start: String,
    pub end: Option<String>,
}

/// Description text operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionOp {
    Contains,
    ExactMatch,
}

impl Default for DescriptionOp {
    fn default() -> Self {
        DescriptionOp::Contains
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionCondition {
    pub enabled: bool,
    pub op: DescriptionOp,
    pub value: String,
}

/// Membership test over externally-issued category ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCondition {
    pub enabled: bool,
    pub ids: BTreeSet<String>,
}

/// Membership test over account ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountCondition {
    pub enabled: bool,
    pub ids: BTreeSet<String>,
}

/// The full condition side of a rule. The merchant condition carries the
/// nested OR-of-AND structure; every other enabled condition is a
/// broadcast condition, modeled once here and replicated into each
/// OR-group only at encode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionSet {
    pub merchant: MerchantCondition,
    pub amount: AmountCondition,
    pub date: DateCondition,
    pub description: DescriptionCondition,
    pub categories: CategoryCondition,
    pub accounts: AccountCondition,
}

// ──────────────────────────────────────────────
// Actions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameAction {
    pub enabled: bool,
    pub name: String,
}

/// Recategorize action. Holds the category display name; the codec
/// resolves it to the registry id at the wire boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecategorizeAction {
    pub enabled: bool,
    pub category: String,
}

/// Add-tags action. Holds tag display names; ids exist only on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddTagsAction {
    pub enabled: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HideAction {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkGoalAction {
    pub enabled: bool,
    pub goal_id: String,
}

/// The action side of a standard rule. One wire tuple per enabled action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Actions {
    pub rename: RenameAction,
    pub recategorize: RecategorizeAction,
    pub add_tags: AddTagsAction,
    pub hide: HideAction,
    pub link_goal: LinkGoalAction,
}

// ──────────────────────────────────────────────
// Splits
// ──────────────────────────────────────────────

/// Review state of a split row. Wire values: None=0, NeedsReview=1,
/// Reviewed=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    None,
    NeedsReview,
    Reviewed,
}

impl Default for ReviewStatus {
    fn default() -> Self {
        ReviewStatus::None
    }
}

/// Whether split rows carry fixed amounts or percentages of the original
/// transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitType {
    Amount,
    Percentage,
}

impl Default for SplitType {
    fn default() -> Self {
        SplitType::Amount
    }
}

/// One row of a transaction split. `value` is an amount or a percentage
/// depending on the owning config's `split_type`; the amount/percentage
/// XOR appears only in the wire records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRow {
    pub merchant: String,
    /// Category display name; resolved to the registry id on encode.
    pub category: String,
    pub value: Decimal,
    pub tags: Vec<String>,
    pub review_status: ReviewStatus,
    pub reviewer: Option<String>,
}

/// Split configuration for a rule. `hide_original` is shared across all
/// rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub enabled: bool,
    pub hide_original: bool,
    pub split_type: SplitType,
    pub rows: Vec<SplitRow>,
}

impl SplitConfig {
    /// True when this config will produce wire records: enabled with at
    /// least one row.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.rows.is_empty()
    }
}

// ──────────────────────────────────────────────
// Rule
// ──────────────────────────────────────────────

/// Kind of a persisted rule, derived from the split configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Conditions drive an action list.
    Standard,
    /// Conditions drive a transaction split.
    Split,
}

/// A complete editable rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rule {
    pub name: String,
    pub description: String,
    pub conditions: ConditionSet,
    pub actions: Actions,
    pub splits: SplitConfig,
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        if self.splits.is_active() {
            RuleKind::Split
        } else {
            RuleKind::Standard
        }
    }
}
