use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::skill::{DesiredLevel, OfferedSkill, ProficiencyLevel, RequestedSkill};
use crate::{SkillId, UserId};

/// Credits granted to every account at registration.
pub const SIGNUP_CREDITS: u32 = 5;

/// Running average of ratings received, maintained incrementally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregate {
    /// Mean rating in [0, 5]; 0.0 until the first rating lands.
    pub average: f64,
    /// Number of ratings folded into the average.
    pub count: u32,
}

impl RatingAggregate {
    /// Fold one new rating into the aggregate as a weighted incremental
    /// mean: `(average * count + rating) / (count + 1)`.
    pub fn record(&mut self, rating: u8) {
        let new_count = self.count + 1;
        self.average = (self.average * f64::from(self.count) + f64::from(rating))
            / f64::from(new_count);
        self.count = new_count;
    }
}

/// A registered user: skill lists, credit balance, reputation, activity.
///
/// The balance is mutated only through the credit ledger; everything else
/// here is owned by the profile itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar: String,
    pub skills_offered: Vec<OfferedSkill>,
    pub skills_requested: Vec<RequestedSkill>,
    /// Credit balance. Invariant: never negative, hence unsigned.
    pub credits: u32,
    pub rating_as_teacher: RatingAggregate,
    pub rating_as_learner: RatingAggregate,
    pub sessions_taught: u32,
    pub sessions_learned: u32,
}

impl UserProfile {
    /// Create a fresh profile with the signup credit grant and empty
    /// skill lists.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            bio: String::new(),
            avatar: String::new(),
            skills_offered: Vec::new(),
            skills_requested: Vec::new(),
            credits: SIGNUP_CREDITS,
            rating_as_teacher: RatingAggregate::default(),
            rating_as_learner: RatingAggregate::default(),
            sessions_taught: 0,
            sessions_learned: 0,
        }
    }

    /// Add a skill to the offered list.
    ///
    /// A skill may appear at most once per list; duplicates are rejected
    /// here rather than by the store.
    pub fn add_offered_skill(
        &mut self,
        skill: SkillId,
        proficiency: ProficiencyLevel,
    ) -> Result<(), TypeError> {
        if self.offers(&skill) {
            return Err(TypeError::DuplicateSkill(skill));
        }
        self.skills_offered.push(OfferedSkill::new(skill, proficiency));
        Ok(())
    }

    /// Add a skill to the requested list. Same at-most-once rule as
    /// [`Self::add_offered_skill`].
    pub fn add_requested_skill(
        &mut self,
        skill: SkillId,
        desired: DesiredLevel,
    ) -> Result<(), TypeError> {
        if self.requests(&skill) {
            return Err(TypeError::DuplicateSkill(skill));
        }
        self.skills_requested.push(RequestedSkill::new(skill, desired));
        Ok(())
    }

    /// Remove a skill from the offered list. Returns `true` if it was present.
    pub fn remove_offered_skill(&mut self, skill: &SkillId) -> bool {
        let before = self.skills_offered.len();
        self.skills_offered.retain(|s| &s.skill != skill);
        self.skills_offered.len() != before
    }

    /// Remove a skill from the requested list. Returns `true` if it was present.
    pub fn remove_requested_skill(&mut self, skill: &SkillId) -> bool {
        let before = self.skills_requested.len();
        self.skills_requested.retain(|s| &s.skill != skill);
        self.skills_requested.len() != before
    }

    /// Whether this user offers the given skill.
    pub fn offers(&self, skill: &SkillId) -> bool {
        self.skills_offered.iter().any(|s| &s.skill == skill)
    }

    /// Whether this user requests the given skill.
    pub fn requests(&self, skill: &SkillId) -> bool {
        self.skills_requested.iter().any(|s| &s.skill == skill)
    }

    /// Sessions taught plus sessions learned.
    pub fn total_sessions(&self) -> u32 {
        self.sessions_taught + self.sessions_learned
    }

    /// The redacted view safe to hand to other users.
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id,
            name: self.name.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
            rating_as_teacher: self.rating_as_teacher,
            credits: self.credits,
        }
    }
}

/// What one user is allowed to see about another: no email, no ledger
/// history, just the facts needed to evaluate a match candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: UserId,
    pub name: String,
    pub avatar: String,
    pub bio: String,
    pub rating_as_teacher: RatingAggregate,
    pub credits: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_starts_with_signup_credits() {
        let user = UserProfile::new("Ada", "ada@example.com");
        assert_eq!(user.credits, SIGNUP_CREDITS);
        assert_eq!(user.sessions_taught, 0);
        assert_eq!(user.rating_as_teacher.count, 0);
    }

    #[test]
    fn duplicate_offered_skill_is_rejected() {
        let mut user = UserProfile::new("Ada", "ada@example.com");
        let rust = SkillId::new();
        user.add_offered_skill(rust, ProficiencyLevel::Expert).unwrap();
        let err = user
            .add_offered_skill(rust, ProficiencyLevel::Beginner)
            .unwrap_err();
        assert_eq!(err, TypeError::DuplicateSkill(rust));
        assert_eq!(user.skills_offered.len(), 1);
    }

    #[test]
    fn same_skill_may_appear_in_both_lists() {
        let mut user = UserProfile::new("Ada", "ada@example.com");
        let chess = SkillId::new();
        user.add_offered_skill(chess, ProficiencyLevel::Intermediate)
            .unwrap();
        user.add_requested_skill(chess, DesiredLevel::Advanced).unwrap();
        assert!(user.offers(&chess));
        assert!(user.requests(&chess));
    }

    #[test]
    fn remove_skill_reports_presence() {
        let mut user = UserProfile::new("Ada", "ada@example.com");
        let skill = SkillId::new();
        user.add_requested_skill(skill, DesiredLevel::Beginner).unwrap();
        assert!(user.remove_requested_skill(&skill));
        assert!(!user.remove_requested_skill(&skill));
    }

    #[test]
    fn rating_aggregate_incremental_mean() {
        let mut rating = RatingAggregate {
            average: 4.0,
            count: 3,
        };
        rating.record(5);
        assert_eq!(rating.average, 4.25);
        assert_eq!(rating.count, 4);
    }

    #[test]
    fn first_rating_sets_the_average() {
        let mut rating = RatingAggregate::default();
        rating.record(3);
        assert_eq!(rating.average, 3.0);
        assert_eq!(rating.count, 1);
    }

    #[test]
    fn public_profile_omits_email() {
        let user = UserProfile::new("Ada", "ada@example.com");
        let public = user.public_profile();
        let json = serde_json::to_string(&public).unwrap();
        assert!(!json.contains("ada@example.com"));
        assert_eq!(public.id, user.id);
    }
}
