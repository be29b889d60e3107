// src/utils/streak.rs

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

/// The calendar day used for streak accounting (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A user's daily activity streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current_streak: i64,
    pub last_activity_date: Option<NaiveDate>,
}

impl StreakState {
    /// Records activity on `today`.
    ///
    /// * first activity ever, or a gap of two days or more: streak restarts at 1
    /// * activity yesterday: streak grows by one
    /// * already active today: streak unchanged
    ///
    /// `last_activity_date` always becomes `today`, so repeated calls on the
    /// same day are no-ops after the first.
    pub fn advance(self, today: NaiveDate) -> StreakState {
        let yesterday = today.checked_sub_days(Days::new(1));

        let current_streak = match self.last_activity_date {
            None => 1,
            Some(last) if last == today => self.current_streak,
            Some(last) if Some(last) == yesterday => self.current_streak + 1,
            Some(_) => 1,
        };

        StreakState {
            current_streak,
            last_activity_date: Some(today),
        }
    }
}
