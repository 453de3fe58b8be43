//! Daily challenge subsystem
//!
//! The challenge bank, per-difficulty daily quotas, and the non-repeating
//! random selector that draws from the bank.

mod catalog;
mod quota;
pub mod selector;

pub use catalog::{ChallengeCatalogEntry, Difficulty};
pub use quota::{DailyQuota, QuotaStatus};
