use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use skillswap_ledger::{CreditLedger, LedgerError};
use skillswap_store::{AccountStore, MatchStore, SessionStore, StoreError};
use skillswap_types::{
    credits_for_duration, Feedback, MatchId, MatchStatus, Session, SessionId, SessionStatus,
    UserId,
};
use tracing::{debug, info};

use crate::error::SessionError;

/// Drives sessions through their lifecycle and applies settlement.
///
/// Status changes for the same session are serialized through a
/// per-session mutex, so a completion observed concurrently cannot settle
/// twice. Cross-account effects (learner debit, teacher credit) are each
/// atomic on their own account but deliberately not a single cross-account
/// transaction; the shared session id ties them together for audit.
pub struct SessionLifecycle {
    accounts: Arc<dyn AccountStore>,
    matches: Arc<dyn MatchStore>,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<CreditLedger>,
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl SessionLifecycle {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        matches: Arc<dyn MatchStore>,
        sessions: Arc<dyn SessionStore>,
        ledger: Arc<CreditLedger>,
    ) -> Self {
        Self {
            accounts,
            matches,
            sessions,
            ledger,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Schedule a session against a match.
    ///
    /// The requester teaches; the counterpart learns the match's offered
    /// skill. The learner pays `ceil(duration / 60)` credits immediately.
    /// A shortfall fails before any session record, ledger entry, or
    /// match-status change exists. On success the parent match is
    /// promoted to `Active` if it is not already.
    pub fn create_session(
        &self,
        match_id: MatchId,
        requester: UserId,
        scheduled_date: DateTime<Utc>,
        duration_minutes: u32,
        meeting_link: impl Into<String>,
    ) -> Result<Session, SessionError> {
        let mut parent = self
            .matches
            .get_match(&match_id)?
            .ok_or(SessionError::MatchNotFound(match_id))?;
        let learner = parent
            .counterpart(&requester)
            .ok_or(SessionError::Unauthorized(requester))?;
        let teacher = requester;

        let credits_needed = credits_for_duration(duration_minutes)?;
        let learner_profile = self
            .accounts
            .get_user(&learner)?
            .ok_or(SessionError::UserNotFound(learner))?;
        if learner_profile.credits < credits_needed {
            return Err(SessionError::InsufficientFunds {
                required: credits_needed,
                available: learner_profile.credits,
            });
        }

        let session = Session::new(
            match_id,
            teacher,
            learner,
            parent.skill_offered,
            scheduled_date,
            duration_minutes,
            meeting_link,
        )?;

        // Debit before inserting the record: if the balance was drained
        // between the check above and here, the ledger refuses and no
        // session exists. The reverse order could leave an unpaid session.
        match self.ledger.debit(
            learner,
            credits_needed,
            format!("Session scheduled: {}", session.id),
            Some(session.id),
        ) {
            Ok(_) => {}
            Err(LedgerError::InsufficientFunds {
                required,
                available,
            }) => {
                return Err(SessionError::InsufficientFunds {
                    required,
                    available,
                })
            }
            Err(other) => return Err(other.into()),
        }

        if let Err(insert_err) = self.sessions.insert_session(session.clone()) {
            // Hand the credits back; the session never existed.
            self.ledger.refund(
                learner,
                credits_needed,
                format!("Session creation failed: {}", session.id),
                Some(session.id),
            )?;
            return Err(insert_err.into());
        }

        if parent.status != MatchStatus::Active {
            parent.status = MatchStatus::Active;
            self.matches.save_match(&parent)?;
        }

        info!(
            session = %session.id.short_id(),
            teacher = %teacher.short_id(),
            learner = %learner.short_id(),
            cost = credits_needed,
            "session scheduled"
        );
        Ok(session)
    }

    /// Transition a session out of `Scheduled`.
    ///
    /// All of `Completed`, `Cancelled`, and `NoShow` are terminal. Only
    /// `Scheduled -> Completed` has settlement side effects, applied
    /// exactly once: re-completing an already completed session is an
    /// idempotent no-op, while any other transition out of a terminal
    /// state is rejected.
    pub fn update_status(
        &self,
        session_id: SessionId,
        requester: UserId,
        new_status: SessionStatus,
    ) -> Result<Session, SessionError> {
        let session_lock = self.lock_for(session_id)?;
        let _guard = session_lock
            .lock()
            .map_err(|_| SessionError::Store(StoreError::LockPoisoned))?;

        let mut session = self
            .sessions
            .get_session(&session_id)?
            .ok_or(SessionError::SessionNotFound(session_id))?;
        if !session.involves(&requester) {
            return Err(SessionError::Unauthorized(requester));
        }

        if session.status == SessionStatus::Completed && new_status == SessionStatus::Completed {
            debug!(session = %session_id.short_id(), "repeat completion ignored");
            return Ok(session);
        }
        if session.status.is_terminal() || !new_status.is_terminal() {
            return Err(SessionError::InvalidTransition {
                from: session.status,
                to: new_status,
            });
        }

        if new_status == SessionStatus::Completed {
            self.settle(&session)?;
        }
        session.status = new_status;
        self.sessions.save_session(&session)?;

        info!(
            session = %session_id.short_id(),
            status = ?new_status,
            "session transitioned"
        );
        Ok(session)
    }

    /// Record one side's rating and comments for a completed session.
    ///
    /// Each side submits at most once in effect: a resubmission replaces
    /// the stored feedback but never re-applies rating aggregation. Only
    /// the learner's first rating moves the teacher's running average;
    /// teacher feedback is stored and aggregated nowhere.
    pub fn submit_feedback(
        &self,
        session_id: SessionId,
        requester: UserId,
        rating: u8,
        comments: impl Into<String>,
    ) -> Result<Session, SessionError> {
        let mut session = self
            .sessions
            .get_session(&session_id)?
            .ok_or(SessionError::SessionNotFound(session_id))?;
        if !session.involves(&requester) {
            return Err(SessionError::Unauthorized(requester));
        }
        if session.status != SessionStatus::Completed {
            return Err(SessionError::SessionNotCompleted);
        }

        let feedback = Feedback::new(rating, comments)?;
        if requester == session.teacher {
            session.feedback_from_teacher = Some(feedback);
        } else {
            let first_submission = session.feedback_from_learner.is_none();
            session.feedback_from_learner = Some(feedback);
            if first_submission {
                let mut teacher = self
                    .accounts
                    .get_user(&session.teacher)?
                    .ok_or(SessionError::UserNotFound(session.teacher))?;
                teacher.rating_as_teacher.record(rating);
                self.accounts.save_user(&teacher)?;
            }
        }
        self.sessions.save_session(&session)?;
        Ok(session)
    }

    /// The completed-session settlement: pay the teacher and advance both
    /// activity counters. Runs under the caller's per-session guard.
    fn settle(&self, session: &Session) -> Result<(), SessionError> {
        self.ledger.credit(
            session.teacher,
            session.credits_spent,
            format!("Session completed: {}", session.id),
            Some(session.id),
        )?;

        let mut teacher = self
            .accounts
            .get_user(&session.teacher)?
            .ok_or(SessionError::UserNotFound(session.teacher))?;
        teacher.sessions_taught += 1;
        self.accounts.save_user(&teacher)?;

        let mut learner = self
            .accounts
            .get_user(&session.learner)?
            .ok_or(SessionError::UserNotFound(session.learner))?;
        learner.sessions_learned += 1;
        self.accounts.save_user(&learner)?;
        Ok(())
    }

    /// Fetch a session, requester must be a party.
    pub fn get_session(
        &self,
        session_id: &SessionId,
        requester: &UserId,
    ) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .get_session(session_id)?
            .ok_or(SessionError::SessionNotFound(*session_id))?;
        if !session.involves(requester) {
            return Err(SessionError::Unauthorized(*requester));
        }
        Ok(session)
    }

    fn lock_for(&self, session: SessionId) -> Result<Arc<Mutex<()>>, SessionError> {
        let mut locks = self
            .session_locks
            .lock()
            .map_err(|_| SessionError::Store(StoreError::LockPoisoned))?;
        Ok(Arc::clone(locks.entry(session).or_default()))
    }
}

#[cfg(test)]
mod tests {
    use skillswap_store::{
        InMemoryAccountStore, InMemoryMatchStore, InMemorySessionStore, InMemoryTransactionStore,
    };
    use skillswap_types::{Match, TypeError, UserProfile};

    use super::*;

    struct Fixture {
        accounts: Arc<InMemoryAccountStore>,
        matches: Arc<InMemoryMatchStore>,
        ledger: Arc<CreditLedger>,
        lifecycle: SessionLifecycle,
        teacher: UserId,
        learner: UserId,
        match_id: MatchId,
    }

    impl Fixture {
        fn new() -> Self {
            let accounts = Arc::new(InMemoryAccountStore::new());
            let matches = Arc::new(InMemoryMatchStore::new());
            let sessions = Arc::new(InMemorySessionStore::new());
            let transactions = Arc::new(InMemoryTransactionStore::new());
            let ledger = Arc::new(CreditLedger::new(accounts.clone(), transactions.clone()));

            let teacher_profile = UserProfile::new("teacher", "teacher@example.com");
            let learner_profile = UserProfile::new("learner", "learner@example.com");
            let (teacher, learner) = (teacher_profile.id, learner_profile.id);
            accounts.insert_user(teacher_profile).unwrap();
            accounts.insert_user(learner_profile).unwrap();

            let record = Match::new(
                teacher,
                learner,
                skillswap_types::SkillId::new(),
                skillswap_types::SkillId::new(),
                60,
                teacher,
            );
            let match_id = record.id;
            matches.insert_match(record).unwrap();

            let lifecycle = SessionLifecycle::new(
                accounts.clone(),
                matches.clone(),
                sessions,
                ledger.clone(),
            );
            Self {
                accounts,
                matches,
                ledger,
                lifecycle,
                teacher,
                learner,
                match_id,
            }
        }

        fn schedule(&self, duration: u32) -> Result<Session, SessionError> {
            self.lifecycle.create_session(
                self.match_id,
                self.teacher,
                Utc::now(),
                duration,
                "https://meet.example.com/abc",
            )
        }

        fn set_learner_credits(&self, credits: u32) {
            let mut learner = self.accounts.get_user(&self.learner).unwrap().unwrap();
            learner.credits = credits;
            self.accounts.save_user(&learner).unwrap();
        }
    }

    #[test]
    fn creation_debits_the_learner_and_activates_the_match() {
        let fx = Fixture::new();
        let session = fx.schedule(90).unwrap();

        assert_eq!(session.credits_spent, 2);
        assert_eq!(session.teacher, fx.teacher);
        assert_eq!(session.learner, fx.learner);
        assert_eq!(fx.ledger.balance(&fx.learner).unwrap(), 3);
        assert_eq!(
            fx.matches.get_match(&fx.match_id).unwrap().unwrap().status,
            MatchStatus::Active
        );

        let history = fx.ledger.transactions(&fx.learner, 50).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].session, Some(session.id));
    }

    #[test]
    fn creation_fails_cleanly_when_the_learner_cannot_pay() {
        let fx = Fixture::new();
        fx.set_learner_credits(1);

        let err = fx.schedule(90).unwrap_err();
        assert_eq!(
            err,
            SessionError::InsufficientFunds {
                required: 2,
                available: 1
            }
        );
        // No partial effects: balance, history, and match all untouched.
        assert_eq!(fx.ledger.balance(&fx.learner).unwrap(), 1);
        assert!(fx.ledger.transactions(&fx.learner, 50).unwrap().is_empty());
        assert_eq!(
            fx.matches.get_match(&fx.match_id).unwrap().unwrap().status,
            MatchStatus::Pending
        );
    }

    #[test]
    fn out_of_range_duration_is_a_validation_error() {
        let fx = Fixture::new();
        assert_eq!(
            fx.schedule(10).unwrap_err(),
            SessionError::Validation(TypeError::DurationOutOfRange(10))
        );
    }

    #[test]
    fn outsiders_cannot_schedule_against_a_match() {
        let fx = Fixture::new();
        let stranger = UserId::new();
        let err = fx
            .lifecycle
            .create_session(fx.match_id, stranger, Utc::now(), 60, "")
            .unwrap_err();
        assert_eq!(err, SessionError::Unauthorized(stranger));
    }

    #[test]
    fn completion_pays_the_teacher_and_advances_counters() {
        let fx = Fixture::new();
        let session = fx.schedule(120).unwrap();

        let updated = fx
            .lifecycle
            .update_status(session.id, fx.learner, SessionStatus::Completed)
            .unwrap();
        assert_eq!(updated.status, SessionStatus::Completed);
        assert_eq!(fx.ledger.balance(&fx.teacher).unwrap(), 7);

        let teacher = fx.accounts.get_user(&fx.teacher).unwrap().unwrap();
        let learner = fx.accounts.get_user(&fx.learner).unwrap().unwrap();
        assert_eq!(teacher.sessions_taught, 1);
        assert_eq!(teacher.sessions_learned, 0);
        assert_eq!(learner.sessions_learned, 1);
    }

    #[test]
    fn repeat_completion_settles_exactly_once() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();

        fx.lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Completed)
            .unwrap();
        let again = fx
            .lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Completed)
            .unwrap();

        assert_eq!(again.status, SessionStatus::Completed);
        assert_eq!(fx.ledger.balance(&fx.teacher).unwrap(), 6);
        assert_eq!(fx.ledger.transactions(&fx.teacher, 50).unwrap().len(), 1);
        let teacher = fx.accounts.get_user(&fx.teacher).unwrap().unwrap();
        assert_eq!(teacher.sessions_taught, 1);
    }

    #[test]
    fn terminal_states_reject_other_transitions() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();

        fx.lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Cancelled)
            .unwrap();
        let err = fx
            .lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Completed)
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                from: SessionStatus::Cancelled,
                to: SessionStatus::Completed,
            }
        );
    }

    #[test]
    fn cancellation_does_not_refund() {
        let fx = Fixture::new();
        let session = fx.schedule(90).unwrap();
        fx.lifecycle
            .update_status(session.id, fx.learner, SessionStatus::NoShow)
            .unwrap();

        // creditsSpent is fixed at creation and stays spent.
        assert_eq!(fx.ledger.balance(&fx.learner).unwrap(), 3);
        assert_eq!(fx.ledger.balance(&fx.teacher).unwrap(), 5);
    }

    #[test]
    fn a_session_cannot_return_to_scheduled() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();
        let err = fx
            .lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Scheduled)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidTransition { .. }));
    }

    #[test]
    fn learner_feedback_moves_the_teacher_average_once() {
        let fx = Fixture::new();
        // Seed an existing reputation: average 4.0 over 3 ratings.
        let mut teacher = fx.accounts.get_user(&fx.teacher).unwrap().unwrap();
        teacher.rating_as_teacher.average = 4.0;
        teacher.rating_as_teacher.count = 3;
        fx.accounts.save_user(&teacher).unwrap();

        let session = fx.schedule(60).unwrap();
        fx.lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Completed)
            .unwrap();
        fx.lifecycle
            .submit_feedback(session.id, fx.learner, 5, "clear and patient")
            .unwrap();

        let teacher = fx.accounts.get_user(&fx.teacher).unwrap().unwrap();
        assert_eq!(teacher.rating_as_teacher.average, 4.25);
        assert_eq!(teacher.rating_as_teacher.count, 4);

        // Resubmission overwrites the comment but not the aggregate.
        let updated = fx
            .lifecycle
            .submit_feedback(session.id, fx.learner, 1, "changed my mind")
            .unwrap();
        assert_eq!(updated.feedback_from_learner.as_ref().unwrap().rating, 1);
        let teacher = fx.accounts.get_user(&fx.teacher).unwrap().unwrap();
        assert_eq!(teacher.rating_as_teacher.average, 4.25);
        assert_eq!(teacher.rating_as_teacher.count, 4);
    }

    #[test]
    fn teacher_feedback_is_stored_but_never_aggregated() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();
        fx.lifecycle
            .update_status(session.id, fx.teacher, SessionStatus::Completed)
            .unwrap();

        let updated = fx
            .lifecycle
            .submit_feedback(session.id, fx.teacher, 5, "eager learner")
            .unwrap();
        assert!(updated.feedback_from_teacher.is_some());

        let learner = fx.accounts.get_user(&fx.learner).unwrap().unwrap();
        assert_eq!(learner.rating_as_learner.count, 0);
        assert_eq!(learner.rating_as_teacher.count, 0);
    }

    #[test]
    fn feedback_requires_a_completed_session() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();
        assert_eq!(
            fx.lifecycle
                .submit_feedback(session.id, fx.learner, 4, "")
                .unwrap_err(),
            SessionError::SessionNotCompleted
        );
    }

    #[test]
    fn feedback_rating_is_validated() {
        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();
        fx.lifecycle
            .update_status(session.id, fx.learner, SessionStatus::Completed)
            .unwrap();
        assert_eq!(
            fx.lifecycle
                .submit_feedback(session.id, fx.learner, 6, "")
                .unwrap_err(),
            SessionError::Validation(TypeError::RatingOutOfRange(6))
        );
    }

    #[test]
    fn concurrent_completions_settle_once() {
        use std::thread;

        let fx = Fixture::new();
        let session = fx.schedule(60).unwrap();
        let lifecycle = Arc::new(fx.lifecycle);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let lifecycle = Arc::clone(&lifecycle);
                let requester = fx.teacher;
                let id = session.id;
                thread::spawn(move || {
                    lifecycle.update_status(id, requester, SessionStatus::Completed)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        assert_eq!(fx.ledger.balance(&fx.teacher).unwrap(), 6);
        assert_eq!(fx.ledger.transactions(&fx.teacher, 50).unwrap().len(), 1);
    }
}
