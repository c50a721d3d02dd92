use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::{MatchId, SessionId, SkillId, UserId};

/// Shortest bookable session, in minutes.
pub const MIN_DURATION_MINUTES: u32 = 15;
/// Longest bookable session, in minutes (8 hours).
pub const MAX_DURATION_MINUTES: u32 = 480;
/// Maximum length of feedback comments.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Lifecycle state of a session. `Scheduled` is the only non-terminal
/// state; every other state is final.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scheduled)
    }
}

/// One side's rating and comments for a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Rating in [1, 5].
    pub rating: u8,
    pub comments: String,
    pub submitted_at: DateTime<Utc>,
}

impl Feedback {
    /// Validate and construct feedback; rejects out-of-range ratings and
    /// oversized comments.
    pub fn new(rating: u8, comments: impl Into<String>) -> Result<Self, TypeError> {
        if !(1..=5).contains(&rating) {
            return Err(TypeError::RatingOutOfRange(rating));
        }
        let comments = comments.into();
        if comments.chars().count() > MAX_COMMENT_CHARS {
            return Err(TypeError::CommentsTooLong {
                max: MAX_COMMENT_CHARS,
                actual: comments.chars().count(),
            });
        }
        Ok(Self {
            rating,
            comments,
            submitted_at: Utc::now(),
        })
    }
}

/// A scheduled teaching engagement derived from a match.
///
/// `credits_spent` is fixed at creation from the duration and never
/// recomputed, even if the session is later cancelled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub match_id: MatchId,
    pub teacher: UserId,
    pub learner: UserId,
    pub skill: SkillId,
    pub scheduled_date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: SessionStatus,
    pub credits_spent: u32,
    pub meeting_link: String,
    pub feedback_from_teacher: Option<Feedback>,
    pub feedback_from_learner: Option<Feedback>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Validate the duration and construct a `Scheduled` session with its
    /// credit cost fixed to `ceil(duration / 60)`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_id: MatchId,
        teacher: UserId,
        learner: UserId,
        skill: SkillId,
        scheduled_date: DateTime<Utc>,
        duration_minutes: u32,
        meeting_link: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let credits_spent = credits_for_duration(duration_minutes)?;
        Ok(Self {
            id: SessionId::new(),
            match_id,
            teacher,
            learner,
            skill,
            scheduled_date,
            duration_minutes,
            status: SessionStatus::Scheduled,
            credits_spent,
            meeting_link: meeting_link.into(),
            feedback_from_teacher: None,
            feedback_from_learner: None,
            created_at: Utc::now(),
        })
    }

    /// Whether the given user is the teacher or the learner.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.teacher == user || &self.learner == user
    }
}

/// Credit cost for a session: one credit per started hour.
pub fn credits_for_duration(duration_minutes: u32) -> Result<u32, TypeError> {
    if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&duration_minutes) {
        return Err(TypeError::DurationOutOfRange(duration_minutes));
    }
    Ok(duration_minutes.div_ceil(60))
}
