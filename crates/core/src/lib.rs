//! moneta-core: automation rule model and wire codec.
//!
//! Provides the structured rule model edited by the rules UI, the
//! registry resolver snapshot, and the codec that translates rules to
//! and from the persisted tagged-tuple envelope.
//!
//! # Public API
//!
//! Key types are re-exported at the crate root for convenience:
//!
//! - [`Rule`], [`ConditionSet`], [`Actions`], [`SplitConfig`] -- the
//!   structured model
//! - [`ResolverSnapshot`] -- immutable name↔id tables for one call
//! - [`encode_rule()`] / [`decode_rule()`] -- the envelope boundary
//!
//! The per-section codecs (`codec::condition`, `codec::action`,
//! `codec::split`, `codec::predicate`) are public for callers that work
//! below the envelope.

pub mod codec;
pub mod model;
pub mod registry;

// ── Convenience re-exports: model ────────────────────────────────────

pub use model::{
    Actions, AmountCondition, AmountOp, ConditionSet, DateCondition, DateOp,
    DescriptionCondition, DescriptionOp, Direction, MatchTarget, MerchantCondition,
    MerchantGroup, MerchantPredicate, ReviewStatus, Rule, RuleKind, SplitConfig, SplitRow,
    SplitType, TextOp,
};
pub use registry::{CategoryEntry, ResolverSnapshot, TagEntry};

// ── Convenience re-exports: envelope boundary ────────────────────────

pub use codec::envelope::{
    decode_rule, encode_rule, EnvelopeError, RuleEnvelope, RULE_TYPE_SPLIT, RULE_TYPE_STANDARD,
};
