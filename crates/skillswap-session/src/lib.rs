//! Session lifecycle for the SkillSwap core.
//!
//! A session is created against a match, costs the learner
//! `ceil(duration / 60)` credits up front, and settles exactly once when
//! it completes: the teacher earns the same number of credits and both
//! parties' session counters advance. Feedback is collected per side,
//! and only learner ratings move the teacher's running average.

pub mod error;
pub mod lifecycle;

pub use error::SessionError;
pub use lifecycle::SessionLifecycle;
