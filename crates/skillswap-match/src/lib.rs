//! Match scoring and candidate discovery.
//!
//! Two pieces:
//!
//! - [`score`] — a pure, deterministic 0–100 compatibility heuristic over
//!   two profiles and a specific offered/requested skill pair
//! - [`MatchFinder`] — the full-population candidate scan, filtered by
//!   existing matches and the score threshold, ranked by score

pub mod error;
pub mod finder;
pub mod score;

pub use error::MatchError;
pub use finder::{MatchCandidate, MatchFinder, SCORE_THRESHOLD};
pub use score::score;
