use skillswap_types::{
    Match, MatchId, Session, SessionId, SkillId, TransactionRecord, UserId, UserProfile,
};

use crate::error::StoreResult;

/// User profiles: balances, skill lists, rating aggregates, counters.
///
/// Missing keys read as `Ok(None)`; `save_user` requires the profile to
/// have been inserted first. Implementations must be safe for concurrent
/// callers, but callers needing read-modify-write atomicity (the ledger)
/// must serialize around the store themselves.
pub trait AccountStore: Send + Sync {
    fn get_user(&self, id: &UserId) -> StoreResult<Option<UserProfile>>;

    /// Insert a new profile. Fails if the id already exists.
    fn insert_user(&self, user: UserProfile) -> StoreResult<()>;

    /// Overwrite an existing profile. Fails if the id was never inserted.
    fn save_user(&self, user: &UserProfile) -> StoreResult<()>;

    /// Every registered profile. The match finder scans the full
    /// population; there is deliberately no pagination at this boundary.
    fn list_users(&self) -> StoreResult<Vec<UserProfile>>;
}

/// Match records and the uniqueness lookup.
pub trait MatchStore: Send + Sync {
    fn get_match(&self, id: &MatchId) -> StoreResult<Option<Match>>;

    /// Look up a match by unordered user pair and **ordered** skill pair.
    ///
    /// This is the duplicate check behind the match uniqueness invariant:
    /// the reverse skill pairing is a different match and must not hit.
    fn find_match(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        skill_offered: &SkillId,
        skill_requested: &SkillId,
    ) -> StoreResult<Option<Match>>;

    fn insert_match(&self, record: Match) -> StoreResult<()>;

    fn save_match(&self, record: &Match) -> StoreResult<()>;

    /// All matches the user is a party to, newest first.
    fn matches_for(&self, user: &UserId) -> StoreResult<Vec<Match>>;
}

/// Session records.
pub trait SessionStore: Send + Sync {
    fn get_session(&self, id: &SessionId) -> StoreResult<Option<Session>>;

    fn insert_session(&self, record: Session) -> StoreResult<()>;

    fn save_session(&self, record: &Session) -> StoreResult<()>;

    /// All sessions where the user teaches or learns, most recently
    /// scheduled first.
    fn sessions_for(&self, user: &UserId) -> StoreResult<Vec<Session>>;
}

/// The append-only credit audit trail.
///
/// Records are immutable once appended; there is no update or delete at
/// this boundary by construction.
pub trait TransactionStore: Send + Sync {
    fn append(&self, record: TransactionRecord) -> StoreResult<()>;

    /// Up to `limit` records for the account, newest first.
    fn list_for(&self, account: &UserId, limit: usize) -> StoreResult<Vec<TransactionRecord>>;

    /// Total records held for the account.
    fn count_for(&self, account: &UserId) -> StoreResult<usize>;
}
