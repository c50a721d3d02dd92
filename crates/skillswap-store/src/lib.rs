//! Store boundaries for the SkillSwap core.
//!
//! The core never talks to a database directly; it talks to the four
//! trait boundaries defined here:
//!
//! - [`AccountStore`] — user profiles (balance, skill lists, aggregates)
//! - [`MatchStore`] — match records, including the uniqueness lookup
//! - [`SessionStore`] — session records
//! - [`TransactionStore`] — the append-only credit audit trail
//!
//! The `InMemory*` implementations back tests, demos, and embedding; a
//! database-backed deployment supplies its own implementations.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{
    InMemoryAccountStore, InMemoryMatchStore, InMemorySessionStore, InMemoryTransactionStore,
};
pub use traits::{AccountStore, MatchStore, SessionStore, TransactionStore};
