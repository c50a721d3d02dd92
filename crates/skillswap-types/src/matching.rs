use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MatchId, SkillId, UserId};

/// Lifecycle state of a match. Transitions are driven by the two parties;
/// the engine itself only ever promotes a match to `Active` when the first
/// session is scheduled against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Pending,
    Accepted,
    Rejected,
    Active,
    Inactive,
}

/// A proposed or active skill exchange between two users.
///
/// Uniqueness invariant: at most one match exists for an unordered
/// {user1, user2} pair and an **ordered** (skill_offered, skill_requested)
/// pair. Direction matters because teacher and learner roles are
/// asymmetric; the reverse skill pairing is a distinct match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub user1: UserId,
    pub user2: UserId,
    /// Skill offered by `user1` (taught in sessions under this match).
    pub skill_offered: SkillId,
    /// Skill `user1` wants in return.
    pub skill_requested: SkillId,
    /// Compatibility score in [0, 100] computed at creation.
    pub score: u8,
    pub status: MatchStatus,
    pub initiated_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Match {
    pub fn new(
        user1: UserId,
        user2: UserId,
        skill_offered: SkillId,
        skill_requested: SkillId,
        score: u8,
        initiated_by: UserId,
    ) -> Self {
        Self {
            id: MatchId::new(),
            user1,
            user2,
            skill_offered,
            skill_requested,
            score,
            status: MatchStatus::Pending,
            initiated_by,
            created_at: Utc::now(),
        }
    }

    /// Whether the given user is one of the two parties.
    pub fn involves(&self, user: &UserId) -> bool {
        &self.user1 == user || &self.user2 == user
    }

    /// The other party, if `user` is a party at all.
    pub fn counterpart(&self, user: &UserId) -> Option<UserId> {
        if &self.user1 == user {
            Some(self.user2)
        } else if &self.user2 == user {
            Some(self.user1)
        } else {
            None
        }
    }

    /// Whether this match links the given unordered user pair with the
    /// given ordered skill pair.
    pub fn links(
        &self,
        user_a: &UserId,
        user_b: &UserId,
        skill_offered: &SkillId,
        skill_requested: &SkillId,
    ) -> bool {
        let same_users = (&self.user1 == user_a && &self.user2 == user_b)
            || (&self.user1 == user_b && &self.user2 == user_a);
        same_users
            && &self.skill_offered == skill_offered
            && &self.skill_requested == skill_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Match {
        Match::new(
            UserId::new(),
            UserId::new(),
            SkillId::new(),
            SkillId::new(),
            42,
            UserId::new(),
        )
    }

    #[test]
    fn new_match_is_pending() {
        let m = sample();
        assert_eq!(m.status, MatchStatus::Pending);
        assert_eq!(m.score, 42);
    }

    #[test]
    fn counterpart_resolves_both_directions() {
        let m = sample();
        assert_eq!(m.counterpart(&m.user1), Some(m.user2));
        assert_eq!(m.counterpart(&m.user2), Some(m.user1));
        assert_eq!(m.counterpart(&UserId::new()), None);
    }

    #[test]
    fn links_ignores_user_order_but_not_skill_order() {
        let m = sample();
        assert!(m.links(&m.user2, &m.user1, &m.skill_offered, &m.skill_requested));
        assert!(!m.links(&m.user1, &m.user2, &m.skill_requested, &m.skill_offered));
    }
}
