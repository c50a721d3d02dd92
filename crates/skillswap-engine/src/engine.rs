use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::info;

use skillswap_ledger::{CreditLedger, DEFAULT_HISTORY_LIMIT};
use skillswap_match::{score, MatchCandidate, MatchFinder};
use skillswap_session::SessionLifecycle;
use skillswap_store::{
    AccountStore, InMemoryAccountStore, InMemoryMatchStore, InMemorySessionStore,
    InMemoryTransactionStore, MatchStore, SessionStore, StoreError, TransactionStore,
};
use skillswap_types::{
    DesiredLevel, Match, MatchId, MatchStatus, ProficiencyLevel, Session, SessionId,
    SessionStatus, SkillId, TransactionRecord, UserId, UserProfile, SIGNUP_CREDITS,
};

use crate::error::{EngineError, EngineResult};
use crate::events::{EventSink, NullSink, SwapEvent};

/// Which side of a session a user is on, for listing filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionRole {
    Teacher,
    Learner,
}

/// The SkillSwap core behind one object: registration, matching,
/// sessions, and credits, over pluggable stores.
pub struct Engine {
    accounts: Arc<dyn AccountStore>,
    matches: Arc<dyn MatchStore>,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<CreditLedger>,
    finder: MatchFinder,
    lifecycle: SessionLifecycle,
    events: Arc<dyn EventSink>,
    // Serializes the duplicate check against the insert in create_match;
    // the finder deliberately runs outside this lock.
    match_creation: Mutex<()>,
}

impl Engine {
    /// Compose an engine over the given collaborators.
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        matches: Arc<dyn MatchStore>,
        sessions: Arc<dyn SessionStore>,
        transactions: Arc<dyn TransactionStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let ledger = Arc::new(CreditLedger::new(accounts.clone(), transactions));
        let finder = MatchFinder::new(accounts.clone(), matches.clone());
        let lifecycle = SessionLifecycle::new(
            accounts.clone(),
            matches.clone(),
            sessions.clone(),
            ledger.clone(),
        );
        Self {
            accounts,
            matches,
            sessions,
            ledger,
            finder,
            lifecycle,
            events,
            match_creation: Mutex::new(()),
        }
    }

    /// An engine over fresh in-memory stores, for tests and embedding.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryMatchStore::new()),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(InMemoryTransactionStore::new()),
            Arc::new(NullSink),
        )
    }

    // -----------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------

    /// Register a user. The signup credits are granted through the
    /// ledger, so the opening balance has a `Bonus` record explaining it.
    pub fn register_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> EngineResult<UserProfile> {
        let mut profile = UserProfile::new(name, email);
        profile.credits = 0;
        let id = profile.id;
        self.accounts.insert_user(profile)?;
        self.ledger
            .grant_bonus(id, SIGNUP_CREDITS, "Welcome to SkillSwap")?;

        info!(user = %id.short_id(), "user registered");
        self.profile(&id)
    }

    /// The caller's own full profile.
    pub fn profile(&self, user: &UserId) -> EngineResult<UserProfile> {
        self.accounts
            .get_user(user)?
            .ok_or(EngineError::UserNotFound(*user))
    }

    pub fn add_offered_skill(
        &self,
        user: UserId,
        skill: SkillId,
        proficiency: ProficiencyLevel,
    ) -> EngineResult<UserProfile> {
        let mut profile = self.profile(&user)?;
        profile.add_offered_skill(skill, proficiency)?;
        self.accounts.save_user(&profile)?;
        Ok(profile)
    }

    pub fn add_requested_skill(
        &self,
        user: UserId,
        skill: SkillId,
        desired: DesiredLevel,
    ) -> EngineResult<UserProfile> {
        let mut profile = self.profile(&user)?;
        profile.add_requested_skill(skill, desired)?;
        self.accounts.save_user(&profile)?;
        Ok(profile)
    }

    pub fn remove_offered_skill(&self, user: UserId, skill: SkillId) -> EngineResult<UserProfile> {
        let mut profile = self.profile(&user)?;
        profile.remove_offered_skill(&skill);
        self.accounts.save_user(&profile)?;
        Ok(profile)
    }

    pub fn remove_requested_skill(
        &self,
        user: UserId,
        skill: SkillId,
    ) -> EngineResult<UserProfile> {
        let mut profile = self.profile(&user)?;
        profile.remove_requested_skill(&skill);
        self.accounts.save_user(&profile)?;
        Ok(profile)
    }

    // -----------------------------------------------------------------
    // Matching
    // -----------------------------------------------------------------

    /// Compatibility score for a specific candidate exchange.
    pub fn score_match(
        &self,
        user1: &UserId,
        user2: &UserId,
        skill_offered: &SkillId,
        skill_requested: &SkillId,
    ) -> EngineResult<u8> {
        let first = self.profile(user1)?;
        let second = self.profile(user2)?;
        Ok(score(&first, &second, skill_offered, skill_requested))
    }

    /// All viable candidate exchanges for a user, best first. Recomputed
    /// fresh on every call.
    pub fn find_matches(&self, user: &UserId) -> EngineResult<Vec<MatchCandidate>> {
        let profile = self.profile(user)?;
        Ok(self.finder.find_matches(&profile)?)
    }

    /// Initiate a match. This is the authority for the uniqueness
    /// invariant: at most one match per unordered user pair and ordered
    /// skill pair, checked and inserted under one lock.
    pub fn create_match(
        &self,
        initiator: UserId,
        counterpart: UserId,
        skill_offered: SkillId,
        skill_requested: SkillId,
    ) -> EngineResult<Match> {
        let first = self.profile(&initiator)?;
        let second = self.profile(&counterpart)?;

        let _guard = self
            .match_creation
            .lock()
            .map_err(|_| EngineError::Store(StoreError::LockPoisoned))?;
        if self
            .matches
            .find_match(&initiator, &counterpart, &skill_offered, &skill_requested)?
            .is_some()
        {
            return Err(EngineError::DuplicateMatch);
        }

        let match_score = score(&first, &second, &skill_offered, &skill_requested);
        let record = Match::new(
            initiator,
            counterpart,
            skill_offered,
            skill_requested,
            match_score,
            initiator,
        );
        self.matches.insert_match(record.clone())?;

        info!(
            match_id = %record.id.short_id(),
            score = match_score,
            "match created"
        );
        let event = SwapEvent::MatchCreated {
            match_id: record.id,
            initiated_by: initiator,
            score: match_score,
        };
        self.events.route(counterpart, event);
        Ok(record)
    }

    /// Externally driven match transition (accept, reject, archive).
    /// The actor must be a party to the match.
    pub fn update_match_status(
        &self,
        match_id: MatchId,
        actor: UserId,
        status: MatchStatus,
    ) -> EngineResult<Match> {
        let mut record = self
            .matches
            .get_match(&match_id)?
            .ok_or(EngineError::MatchNotFound(match_id))?;
        if !record.involves(&actor) {
            return Err(EngineError::Unauthorized(actor));
        }
        record.status = status;
        self.matches.save_match(&record)?;
        Ok(record)
    }

    /// The user's matches, newest first, optionally filtered by status.
    pub fn matches_for(
        &self,
        user: &UserId,
        status: Option<MatchStatus>,
    ) -> EngineResult<Vec<Match>> {
        let mut found = self.matches.matches_for(user)?;
        if let Some(status) = status {
            found.retain(|m| m.status == status);
        }
        Ok(found)
    }

    // -----------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------

    /// Schedule a session against a match; the requester teaches.
    pub fn create_session(
        &self,
        match_id: MatchId,
        requester: UserId,
        scheduled_date: DateTime<Utc>,
        duration_minutes: u32,
        meeting_link: impl Into<String>,
    ) -> EngineResult<Session> {
        let session = self.lifecycle.create_session(
            match_id,
            requester,
            scheduled_date,
            duration_minutes,
            meeting_link,
        )?;
        let event = SwapEvent::SessionScheduled {
            session_id: session.id,
            scheduled_date: session.scheduled_date,
            credits: session.credits_spent,
        };
        self.events.route(session.learner, event);
        Ok(session)
    }

    /// Transition a session; completion settles credits exactly once.
    pub fn update_session_status(
        &self,
        session_id: SessionId,
        requester: UserId,
        new_status: SessionStatus,
    ) -> EngineResult<Session> {
        let was_completed = self
            .lifecycle
            .get_session(&session_id, &requester)
            .map(|s| s.status == SessionStatus::Completed)
            .unwrap_or(false);
        let session = self
            .lifecycle
            .update_status(session_id, requester, new_status)?;
        if session.status == SessionStatus::Completed && !was_completed {
            let event = SwapEvent::SessionCompleted {
                session_id: session.id,
                credits: session.credits_spent,
            };
            self.events.route(session.teacher, event.clone());
            self.events.route(session.learner, event);
        }
        Ok(session)
    }

    /// Record one side's rating and comments for a completed session.
    pub fn submit_feedback(
        &self,
        session_id: SessionId,
        requester: UserId,
        rating: u8,
        comments: impl Into<String>,
    ) -> EngineResult<Session> {
        Ok(self
            .lifecycle
            .submit_feedback(session_id, requester, rating, comments)?)
    }

    pub fn get_session(&self, session_id: &SessionId, requester: &UserId) -> EngineResult<Session> {
        Ok(self.lifecycle.get_session(session_id, requester)?)
    }

    /// The user's sessions, most recently scheduled first, optionally
    /// filtered by status and by which side the user is on.
    pub fn sessions_for(
        &self,
        user: &UserId,
        status: Option<SessionStatus>,
        role: Option<SessionRole>,
    ) -> EngineResult<Vec<Session>> {
        let mut found = self.sessions.sessions_for(user)?;
        if let Some(status) = status {
            found.retain(|s| s.status == status);
        }
        if let Some(role) = role {
            found.retain(|s| match role {
                SessionRole::Teacher => &s.teacher == user,
                SessionRole::Learner => &s.learner == user,
            });
        }
        Ok(found)
    }

    // -----------------------------------------------------------------
    // Credits
    // -----------------------------------------------------------------

    pub fn credit(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
    ) -> EngineResult<u32> {
        let balance = self.ledger.credit(user, amount, description, session)?;
        self.events.route(
            user,
            SwapEvent::CreditsMoved {
                kind: skillswap_types::TransactionKind::Earned,
                amount,
                balance,
            },
        );
        Ok(balance)
    }

    pub fn debit(
        &self,
        user: UserId,
        amount: u32,
        description: impl Into<String>,
        session: Option<SessionId>,
    ) -> EngineResult<u32> {
        let balance = self.ledger.debit(user, amount, description, session)?;
        self.events.route(
            user,
            SwapEvent::CreditsMoved {
                kind: skillswap_types::TransactionKind::Spent,
                amount,
                balance,
            },
        );
        Ok(balance)
    }

    pub fn balance(&self, user: &UserId) -> EngineResult<u32> {
        Ok(self.ledger.balance(user)?)
    }

    /// Transaction history, newest first, default limit of
    /// [`DEFAULT_HISTORY_LIMIT`] entries.
    pub fn transactions(
        &self,
        user: &UserId,
        limit: Option<usize>,
    ) -> EngineResult<Vec<TransactionRecord>> {
        Ok(self
            .ledger
            .transactions(user, limit.unwrap_or(DEFAULT_HISTORY_LIMIT))?)
    }
}
