//! High-level facade for the SkillSwap core.
//!
//! [`Engine`] wires the credit ledger, match scoring, and session
//! lifecycle over the four store boundaries and exposes the complete
//! operation surface a transport layer (HTTP, CLI) needs. The engine
//! returns typed results only; mapping failures to protocol responses is
//! the caller's job, and outbound notifications go through the
//! [`EventSink`] collaborator rather than any transport the core owns.

pub mod engine;
pub mod error;
pub mod events;

pub use engine::{Engine, SessionRole};
pub use error::{EngineError, EngineResult};
pub use events::{EventSink, NullSink, SwapEvent};

// Re-export key types so transport crates depend on the facade alone.
pub use skillswap_ledger::DEFAULT_HISTORY_LIMIT;
pub use skillswap_match::{MatchCandidate, SCORE_THRESHOLD};
pub use skillswap_types::{
    DesiredLevel, Match, MatchId, MatchStatus, ProficiencyLevel, PublicProfile, Session,
    SessionId, SessionStatus, SkillId, TransactionKind, TransactionRecord, UserId, UserProfile,
};
