mod error;
mod memory;
mod record;
mod traits;

pub use error::StoreError;
pub use memory::MemoryRuleStore;
pub use record::RuleRecord;
pub use traits::{now_timestamp, RuleStore};
