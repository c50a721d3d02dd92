use skillswap_types::{SkillId, UserProfile};

/// Compatibility score between two users for a candidate exchange.
///
/// Pure and deterministic: no I/O, no clock, same inputs always produce
/// the same value. Five bounded components, summed and clamped to
/// [0, 100], rounded to the nearest integer:
///
/// 1. mutual-fit base (0/25/50) — does each side's offer meet the other
///    side's request?
/// 2. rating bonus (0–20) — combined teacher rating averages, doubled
/// 3. experience bonus (0–15) — half a point per session taught
/// 4. credit availability (0/5/10) — who can actually pay for a session?
/// 5. activity bonus (0/5) — both sides have session history at all
///
/// `skill_offered` is offered by `user1`; `skill_requested` is what
/// `user1` wants from `user2`.
pub fn score(
    user1: &UserProfile,
    user2: &UserProfile,
    skill_offered: &SkillId,
    skill_requested: &SkillId,
) -> u8 {
    let mut total = 0.0;

    // Mutual fit: a full exchange is worth twice a one-sided one.
    let forward = user1.offers(skill_offered) && user2.requests(skill_offered);
    let backward = user2.offers(skill_requested) && user1.requests(skill_requested);
    total += match (forward, backward) {
        (true, true) => 50.0,
        (true, false) | (false, true) => 25.0,
        (false, false) => 0.0,
    };

    // Rating bonus: averages are in [0, 5] each, so this caps at 20.
    let rating1 = user1.rating_as_teacher.average;
    let rating2 = user2.rating_as_teacher.average;
    total += (rating1 + rating2) * 2.0;

    // Experience bonus: half a point per session taught, capped at 15.
    let taught = f64::from(user1.sessions_taught + user2.sessions_taught);
    total += (taught * 0.5).min(15.0);

    // Credit availability: an exchange needs at least one side able to pay.
    total += match (user1.credits >= 1, user2.credits >= 1) {
        (true, true) => 10.0,
        (true, false) | (false, true) => 5.0,
        (false, false) => 0.0,
    };

    // Activity bonus: both sides have been active at all.
    if user1.total_sessions() > 0 && user2.total_sessions() > 0 {
        total += 5.0;
    }

    total.min(100.0).round() as u8
}
