use std::collections::HashMap;
use std::sync::RwLock;

use skillswap_types::{
    Match, MatchId, Session, SessionId, SkillId, TransactionRecord, UserId, UserProfile,
};

use crate::error::{StoreError, StoreResult};
use crate::traits::{AccountStore, MatchStore, SessionStore, TransactionStore};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// In-memory account store for tests, demos, and embedding.
#[derive(Default)]
pub struct InMemoryAccountStore {
    users: RwLock<HashMap<UserId, UserProfile>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn get_user(&self, id: &UserId) -> StoreResult<Option<UserProfile>> {
        let users = self.users.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(users.get(id).cloned())
    }

    fn insert_user(&self, user: UserProfile) -> StoreResult<()> {
        let mut users = self.users.write().map_err(|_| StoreError::LockPoisoned)?;
        if users.contains_key(&user.id) {
            return Err(StoreError::DuplicateId(user.id.to_string()));
        }
        users.insert(user.id, user);
        Ok(())
    }

    fn save_user(&self, user: &UserProfile) -> StoreResult<()> {
        let mut users = self.users.write().map_err(|_| StoreError::LockPoisoned)?;
        if !users.contains_key(&user.id) {
            return Err(StoreError::UnknownId(user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    fn list_users(&self) -> StoreResult<Vec<UserProfile>> {
        let users = self.users.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut all: Vec<_> = users.values().cloned().collect();
        // HashMap iteration order is unstable; fix it so population scans
        // are reproducible.
        all.sort_by_key(|u| u.id);
        Ok(all)
    }
}

// ---------------------------------------------------------------------------
// Matches
// ---------------------------------------------------------------------------

/// In-memory match store.
#[derive(Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, Match>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn get_match(&self, id: &MatchId) -> StoreResult<Option<Match>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(matches.get(id).cloned())
    }

    fn find_match(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        skill_offered: &SkillId,
        skill_requested: &SkillId,
    ) -> StoreResult<Option<Match>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(matches
            .values()
            .find(|m| m.links(user_a, user_b, skill_offered, skill_requested))
            .cloned())
    }

    fn insert_match(&self, record: Match) -> StoreResult<()> {
        let mut matches = self.matches.write().map_err(|_| StoreError::LockPoisoned)?;
        if matches.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.to_string()));
        }
        matches.insert(record.id, record);
        Ok(())
    }

    fn save_match(&self, record: &Match) -> StoreResult<()> {
        let mut matches = self.matches.write().map_err(|_| StoreError::LockPoisoned)?;
        if !matches.contains_key(&record.id) {
            return Err(StoreError::UnknownId(record.id.to_string()));
        }
        matches.insert(record.id, record.clone());
        Ok(())
    }

    fn matches_for(&self, user: &UserId) -> StoreResult<Vec<Match>> {
        let matches = self.matches.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut found: Vec<_> = matches
            .values()
            .filter(|m| m.involves(user))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// In-memory session store.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get_session(&self, id: &SessionId) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn insert_session(&self, record: Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        if sessions.contains_key(&record.id) {
            return Err(StoreError::DuplicateId(record.id.to_string()));
        }
        sessions.insert(record.id, record);
        Ok(())
    }

    fn save_session(&self, record: &Session) -> StoreResult<()> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::LockPoisoned)?;
        if !sessions.contains_key(&record.id) {
            return Err(StoreError::UnknownId(record.id.to_string()));
        }
        sessions.insert(record.id, record.clone());
        Ok(())
    }

    fn sessions_for(&self, user: &UserId) -> StoreResult<Vec<Session>> {
        let sessions = self.sessions.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut found: Vec<_> = sessions
            .values()
            .filter(|s| s.involves(user))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.scheduled_date.cmp(&a.scheduled_date));
        Ok(found)
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// In-memory transaction store. Appends are kept in arrival order per
/// account; reads walk the tail backwards for newest-first.
#[derive(Default)]
pub struct InMemoryTransactionStore {
    streams: RwLock<HashMap<UserId, Vec<TransactionRecord>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn append(&self, record: TransactionRecord) -> StoreResult<()> {
        let mut streams = self.streams.write().map_err(|_| StoreError::LockPoisoned)?;
        streams.entry(record.account).or_default().push(record);
        Ok(())
    }

    fn list_for(&self, account: &UserId, limit: usize) -> StoreResult<Vec<TransactionRecord>> {
        let streams = self.streams.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(streams
            .get(account)
            .map(|records| records.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    fn count_for(&self, account: &UserId) -> StoreResult<usize> {
        let streams = self.streams.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(streams.get(account).map(Vec::len).unwrap_or(0))
    }
}
