use serde::{Deserialize, Serialize};

use crate::SkillId;

/// How well a user can teach an offered skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Default for ProficiencyLevel {
    fn default() -> Self {
        Self::Intermediate
    }
}

/// The level a user wants to reach in a requested skill.
///
/// Deliberately one step short of [`ProficiencyLevel`]: nobody requests
/// to be taught to expert level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl Default for DesiredLevel {
    fn default() -> Self {
        Self::Beginner
    }
}

/// One entry in a user's offered-skills list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferedSkill {
    pub skill: SkillId,
    pub proficiency: ProficiencyLevel,
}

impl OfferedSkill {
    pub fn new(skill: SkillId, proficiency: ProficiencyLevel) -> Self {
        Self { skill, proficiency }
    }
}

/// One entry in a user's requested-skills list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedSkill {
    pub skill: SkillId,
    pub desired: DesiredLevel,
}

impl RequestedSkill {
    pub fn new(skill: SkillId, desired: DesiredLevel) -> Self {
        Self { skill, desired }
    }
}
