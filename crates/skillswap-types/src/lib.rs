//! Foundation types for the SkillSwap core.
//!
//! This crate provides the identifiers, profile structures, and record
//! types used throughout the SkillSwap system. Every other skillswap crate
//! depends on `skillswap-types`.
//!
//! # Key Types
//!
//! - [`UserId`], [`SkillId`], [`MatchId`], [`SessionId`] — time-ordered
//!   UUID v7 identifiers
//! - [`UserProfile`] — skill lists, credit balance, rating aggregates,
//!   session counters
//! - [`Match`] — a proposed or active skill-exchange relationship
//! - [`Session`] — a scheduled teaching engagement with a fixed credit cost
//! - [`TransactionRecord`] — one immutable entry in the credit audit trail

pub mod error;
pub mod id;
pub mod matching;
pub mod session;
pub mod skill;
pub mod transaction;
pub mod user;

pub use error::TypeError;
pub use id::{MatchId, SessionId, SkillId, UserId};
pub use matching::{Match, MatchStatus};
pub use session::{credits_for_duration, Feedback, Session, SessionStatus};
pub use skill::{DesiredLevel, OfferedSkill, ProficiencyLevel, RequestedSkill};
pub use transaction::{TransactionKind, TransactionRecord};
pub use user::{PublicProfile, RatingAggregate, UserProfile, SIGNUP_CREDITS};
