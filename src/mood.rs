//! Daily mood check-in. One check-in per calendar day; consecutive days
//! build a streak that scales the points reward.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::badges::{Activity, BadgeBook};
use crate::points::PointsLedger;
use crate::store::{self, KvStore};

const LAST_DATE_KEY: &str = "lastMoodCheckIn";
const STREAK_KEY: &str = "checkInStreak";
const LAST_MOOD_KEY: &str = "lastMoodCheckInMood";

const BASE_POINTS: u64 = 15;
const STREAK_BONUS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInReport {
    pub streak: u32,
    pub points_awarded: u64,
}

/// Last recorded mood, if any
pub fn last_mood(store: &dyn KvStore) -> Option<String> {
    store::get(store, LAST_MOOD_KEY)
}

pub fn current_streak(store: &dyn KvStore) -> u32 {
    store::get(store, STREAK_KEY).unwrap_or(0)
}

pub fn checked_in_on(store: &dyn KvStore, date: NaiveDate) -> bool {
    store::get::<NaiveDate>(store, LAST_DATE_KEY) == Some(date)
}

/// Record the mood for the day of `now`. Returns None when a check-in
/// already happened that day; nothing changes in that case. On success the
/// streak either continues from yesterday or restarts at 1, and the reward
/// is 15 base points plus a 10 point bonus per prior streak day.
pub fn check_in(
    store: &mut dyn KvStore,
    ledger: &mut PointsLedger,
    badges: &mut BadgeBook,
    mood: &str,
    now: DateTime<Utc>,
) -> Option<CheckInReport> {
    let today = now.date_naive();
    let last: Option<NaiveDate> = store::get(store, LAST_DATE_KEY);
    if last == Some(today) {
        return None;
    }

    let yesterday = today.checked_sub_days(Days::new(1));
    let streak = if last.is_some() && last == yesterday {
        current_streak(store) + 1
    } else {
        1
    };

    let points = BASE_POINTS + STREAK_BONUS * (streak as u64 - 1);
    ledger.add_points(points, &format!("Mood check-in (Streak: {streak})"), now);
    badges.update_progress(Activity::CheckIn);

    let writes = [
        store::set(store, LAST_DATE_KEY, &today),
        store::set(store, STREAK_KEY, &streak),
        store::set(store, LAST_MOOD_KEY, &mood),
    ];
    for result in writes {
        if let Err(e) = result {
            log::warn!("failed to persist mood check-in: {e}");
        }
    }
    ledger.save(store);

    Some(CheckInReport { streak, points_awarded: points })
}
