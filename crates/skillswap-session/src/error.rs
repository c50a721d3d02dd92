use skillswap_ledger::LedgerError;
use skillswap_store::StoreError;
use skillswap_types::{MatchId, SessionId, SessionStatus, TypeError, UserId};

/// Errors produced by session lifecycle operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("user {0} is not a party to this session or match")]
    Unauthorized(UserId),

    /// The learner cannot pay for the session. Surfaced at creation as a
    /// user-facing validation failure, before any record exists.
    #[error("insufficient credits: this session costs {required}, balance is {available}")]
    InsufficientFunds { required: u32, available: u32 },

    #[error("cannot transition session from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },

    #[error("feedback is only accepted for completed sessions")]
    SessionNotCompleted,

    #[error(transparent)]
    Validation(#[from] TypeError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
