//! Credit ledger for the SkillSwap core.
//!
//! Credits are the non-monetary unit exchanged for teaching time. This
//! crate owns every balance mutation in the system and guarantees:
//!
//! - balances never go negative; a debit that would do so fails with no
//!   partial effect
//! - exactly one [`skillswap_types::TransactionRecord`] is appended per
//!   successful mutation, zero per failed one
//! - mutations against the same account are serialized, so concurrent
//!   debits cannot race a low balance below zero

pub mod error;
pub mod ledger;

pub use error::LedgerError;
pub use ledger::{CreditLedger, DEFAULT_HISTORY_LIMIT};
