//! Popcorn-kernel point policy.
//!
//! Every watched-list transition carries a fixed point delta. The deltas here
//! are the policy; applying them to a user's running balance (with the floor
//! at zero) is the ledger's job at the data-mutation boundary.

/// Points for marking a movie watched.
pub const WATCH_POINTS: i64 = 1;

/// Additional points for a non-empty review.
pub const REVIEW_POINTS: i64 = 5;

/// Delta for marking a movie watched: +1, +6 with a review.
pub fn mark_watched_delta(has_review: bool) -> i64 {
    if has_review {
        WATCH_POINTS + REVIEW_POINTS
    } else {
        WATCH_POINTS
    }
}

/// Delta for removing a watched entry (delete or move to watchlist):
/// the exact negation of what marking it earned.
pub fn removal_delta(has_review: bool) -> i64 {
    -mark_watched_delta(has_review)
}

/// Delta for an in-place update, based on the review-presence transition:
/// +5 when a review appears, -5 when one disappears, 0 otherwise.
pub fn review_transition_delta(had_review: bool, has_review: bool) -> i64 {
    match (had_review, has_review) {
        (false, true) => REVIEW_POINTS,
        (true, false) => -REVIEW_POINTS,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_table() {
        assert_eq!(mark_watched_delta(false), 1);
        assert_eq!(mark_watched_delta(true), 6);
        assert_eq!(review_transition_delta(false, true), 5);
        assert_eq!(review_transition_delta(true, false), -5);
        assert_eq!(review_transition_delta(true, true), 0);
        assert_eq!(review_transition_delta(false, false), 0);
        assert_eq!(removal_delta(false), -1);
        assert_eq!(removal_delta(true), -6);
    }

    #[test]
    fn mark_then_delete_is_net_zero() {
        for has_review in [false, true] {
            assert_eq!(
                mark_watched_delta(has_review) + removal_delta(has_review),
                0
            );
        }
    }

    #[test]
    fn review_lifecycle_scenario() {
        // Mark watched with review (+6), remove the review (-5), delete (-1):
        // the user ends exactly where they started.
        let mut balance = 0i64;
        balance += mark_watched_delta(true);
        assert_eq!(balance, 6);
        balance += review_transition_delta(true, false);
        assert_eq!(balance, 1);
        balance += removal_delta(false);
        assert_eq!(balance, 0);
    }
}
