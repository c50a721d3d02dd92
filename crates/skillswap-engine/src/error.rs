use thiserror::Error;

use skillswap_types::{MatchId, UserId};

/// The failure surface handed to transport layers.
///
/// Every engine operation either fully applies or returns one of these
/// with no partial effect. The transport layer translates kinds into
/// protocol responses; nothing here carries transport artifacts.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("user {0} is not a party to this match")]
    Unauthorized(UserId),

    #[error("a match already exists for these users and this skill pair")]
    DuplicateMatch,

    #[error(transparent)]
    Validation(#[from] skillswap_types::TypeError),

    #[error(transparent)]
    Session(#[from] skillswap_session::SessionError),

    #[error(transparent)]
    Ledger(#[from] skillswap_ledger::LedgerError),

    #[error(transparent)]
    Matching(#[from] skillswap_match::MatchError),

    #[error("store error: {0}")]
    Store(#[from] skillswap_store::StoreError),
}

pub type EngineResult<T> = Result<T, EngineError>;
