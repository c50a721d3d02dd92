use std::sync::Arc;

use skillswap_store::{AccountStore, MatchStore};
use skillswap_types::{PublicProfile, SkillId, UserProfile};
use tracing::debug;

use crate::error::MatchError;
use crate::score::score;

/// Minimum score for a candidate to be surfaced.
pub const SCORE_THRESHOLD: u8 = 30;

/// One viable exchange surfaced by [`MatchFinder::find_matches`]: a
/// redacted view of the counterpart plus the skill pair and its score.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchCandidate {
    pub user: PublicProfile,
    /// Offered by the searching user, requested by the counterpart.
    pub skill_offered: SkillId,
    /// Offered by the counterpart, requested by the searching user.
    pub skill_requested: SkillId,
    pub score: u8,
}

/// Enumerates viable candidate exchanges for a user across the full
/// population.
///
/// Read-only: results are recomputed fresh on every call, never cached.
/// A match created concurrently with a scan may still be surfaced once;
/// match creation, not the finder, enforces the no-duplicate invariant.
pub struct MatchFinder {
    accounts: Arc<dyn AccountStore>,
    matches: Arc<dyn MatchStore>,
}

impl MatchFinder {
    pub fn new(accounts: Arc<dyn AccountStore>, matches: Arc<dyn MatchStore>) -> Self {
        Self { accounts, matches }
    }

    /// All viable exchanges for `current`, sorted descending by score.
    ///
    /// Every other user is tested against the full Cartesian product of
    /// `current`'s offered × requested lists: a user with 3 offered and 3
    /// requested skills yields 9 candidate pairs per counterpart. A pair
    /// survives if the counterpart requests the offered skill, offers the
    /// requested one, no match already links the pair, and the score
    /// clears [`SCORE_THRESHOLD`]. The sort is stable, so equal scores
    /// keep discovery order.
    pub fn find_matches(&self, current: &UserProfile) -> Result<Vec<MatchCandidate>, MatchError> {
        let mut candidates = Vec::new();

        for other in self.accounts.list_users()? {
            if other.id == current.id {
                continue;
            }

            for offered in &current.skills_offered {
                for requested in &current.skills_requested {
                    if !other.requests(&offered.skill) || !other.offers(&requested.skill) {
                        continue;
                    }

                    let existing = self.matches.find_match(
                        &current.id,
                        &other.id,
                        &offered.skill,
                        &requested.skill,
                    )?;
                    if existing.is_some() {
                        continue;
                    }

                    let candidate_score =
                        score(current, &other, &offered.skill, &requested.skill);
                    if candidate_score >= SCORE_THRESHOLD {
                        candidates.push(MatchCandidate {
                            user: other.public_profile(),
                            skill_offered: offered.skill,
                            skill_requested: requested.skill,
                            score: candidate_score,
                        });
                    }
                }
            }
        }

        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        debug!(
            user = %current.id.short_id(),
            count = candidates.len(),
            "candidate scan finished"
        );
        Ok(candidates)
    }
}
