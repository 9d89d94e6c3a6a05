//! Wire tag tables for the tagged-tuple format.
//!
//! Tags are the only type information carried on the wire. The values are
//! fixed by the persisted format and must never be reassigned.

// ── Condition tuple tags ────────────────────────────────────────────

pub const COND_ORIGINAL_TEXT: i64 = 1;
pub const COND_AMOUNT: i64 = 2;
pub const COND_DATE: i64 = 3;
pub const COND_ACCOUNT: i64 = 4;
pub const COND_MERCHANT: i64 = 5;
pub const COND_CATEGORY: i64 = 6;
pub const COND_DESCRIPTION: i64 = 7;

// ── Merchant / original-text operator sub-tags ──────────────────────

pub const TEXT_EXACT_MATCH: i64 = 1;
pub const TEXT_CONTAINS: i64 = 2;
/// StartsWith rides on the historical "original statement" field tag.
/// The value is a legacy alias, not a prefix operator in older payloads.
pub const TEXT_STARTS_WITH: i64 = 3;
/// EndsWith rides on the historical "merchant name" field tag.
pub const TEXT_ENDS_WITH: i64 = 4;

// ── Amount operator sub-tags ────────────────────────────────────────

pub const AMOUNT_GREATER_THAN: i64 = 1;
pub const AMOUNT_LESS_THAN: i64 = 2;
pub const AMOUNT_EQUAL_TO: i64 = 3;
pub const AMOUNT_BETWEEN: i64 = 4;
pub const AMOUNT_EXPENSE: i64 = 5;
pub const AMOUNT_INCOME: i64 = 6;

// ── Date operator sub-tags ──────────────────────────────────────────

pub const DATE_AFTER: i64 = 1;
pub const DATE_BEFORE: i64 = 2;
pub const DATE_ON: i64 = 3;
pub const DATE_BETWEEN: i64 = 4;

// ── Description operator sub-tags ───────────────────────────────────

pub const DESC_CONTAINS: i64 = 1;
pub const DESC_EXACT_MATCH: i64 = 2;

// ── Action tuple tags ───────────────────────────────────────────────

pub const ACTION_RENAME_MERCHANT: i64 = 1;
pub const ACTION_UPDATE_CATEGORY: i64 = 2;
pub const ACTION_ADD_TAGS: i64 = 3;
pub const ACTION_HIDE_TRANSACTION: i64 = 4;
pub const ACTION_LINK_TO_GOAL: i64 = 5;

// ── Split record review status ──────────────────────────────────────

pub const REVIEW_NONE: i64 = 0;
pub const REVIEW_NEEDS_REVIEW: i64 = 1;
pub const REVIEW_REVIEWED: i64 = 2;
