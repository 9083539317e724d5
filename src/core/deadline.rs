use chrono::NaiveDate;

/// Default lead time below which a deadline is considered too rushed
pub const DEFAULT_MIN_DEADLINE_DAYS: i64 = 30;

/// End of the actionable window
const WINDOW_END_DAYS: i64 = 180;
/// Width of the interpolation inside the actionable window
const WINDOW_SPAN_DAYS: f64 = 150.0;
const PAST_SCORE: f64 = 0.0;
const RUSHED_SCORE: f64 = 0.2;
const WINDOW_FLOOR: f64 = 0.8;
const LONG_LEAD_FLOOR: f64 = 0.3;
const LONG_LEAD_DECAY_DAYS: f64 = 365.0;

/// Whole days from `today` until `deadline` (negative once passed)
#[inline]
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Urgency score for a deadline seen from `today`
///
/// * past deadline: 0.0
/// * fewer than `min_deadline_days` left: 0.2
/// * inside the window up to 180 days: 0.8 to 1.0, closer is higher
/// * beyond 180 days: decays by a year's worth, floored at 0.3
pub fn urgency_score(deadline: NaiveDate, today: NaiveDate, min_deadline_days: i64) -> f64 {
    urgency_for_days(days_remaining(deadline, today), min_deadline_days)
}

/// Piecewise urgency over days remaining
pub fn urgency_for_days(days: i64, min_deadline_days: i64) -> f64 {
    if days < 0 {
        return PAST_SCORE;
    }

    if days < min_deadline_days {
        return RUSHED_SCORE;
    }

    if days <= WINDOW_END_DAYS {
        let score = WINDOW_FLOOR + 0.2 * (WINDOW_END_DAYS - days) as f64 / WINDOW_SPAN_DAYS;
        return score.clamp(WINDOW_FLOOR, 1.0);
    }

    (1.0 - (days - WINDOW_END_DAYS) as f64 / LONG_LEAD_DECAY_DAYS).max(LONG_LEAD_FLOOR)
}
