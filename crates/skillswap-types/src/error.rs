use crate::SkillId;

/// Errors produced while constructing or mutating foundation types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("skill {0} already present in the list")]
    DuplicateSkill(SkillId),

    #[error("rating {0} out of range; must be between 1 and 5")]
    RatingOutOfRange(u8),

    #[error("comments exceed {max} characters (got {actual})")]
    CommentsTooLong { max: usize, actual: usize },

    #[error("session duration {0} minutes out of range; must be between 15 and 480")]
    DurationOutOfRange(u32),

    #[error("transaction amount must be greater than zero")]
    ZeroAmount,
}
