use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Offset, Utc};
use tracing::warn;

use crate::models::AvailabilityWindow;

/// Decides whether weekly availability windows are open at a given instant.
///
/// Windows are stored in clinic-local wall time, so the evaluator carries the
/// offset used to turn a UTC instant into local day-of-week and time-of-day.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityEvaluator {
    offset: FixedOffset,
}

impl Default for AvailabilityEvaluator {
    fn default() -> Self {
        Self::utc()
    }
}

impl AvailabilityEvaluator {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn with_offset_minutes(minutes: i32) -> Self {
        match minutes.checked_mul(60).and_then(FixedOffset::east_opt) {
            Some(offset) => Self { offset },
            None => {
                warn!("Availability UTC offset of {} minutes is out of range, using UTC", minutes);
                Self::utc()
            }
        }
    }

    pub fn local_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.with_timezone(&self.offset).naive_local()
    }

    pub fn is_open(&self, window: &AvailabilityWindow, now: DateTime<Utc>) -> bool {
        is_available(window, self.local_time(now))
    }

    /// A location is open when any of its windows is.
    pub fn any_open<'a, I>(&self, windows: I, now: DateTime<Utc>) -> bool
    where
        I: IntoIterator<Item = &'a AvailabilityWindow>,
    {
        let local = self.local_time(now);
        windows.into_iter().any(|window| is_available(window, local))
    }
}

/// Evaluate one window against a clinic-local instant.
///
/// The provider's `is_available` switch gates everything. 24-hour windows ignore
/// the clock; the rest need a matching ISO weekday and a time inside
/// `[start_time, end_time]`. A window whose end is before its start (overnight)
/// is compared as a plain same-day range and so never matches.
pub fn is_available(window: &AvailabilityWindow, now: NaiveDateTime) -> bool {
    if !window.is_available {
        return false;
    }

    if window.is_24_hours {
        return true;
    }

    let (Some(day_of_week), Some(start), Some(end)) =
        (window.day_of_week, window.start_time, window.end_time)
    else {
        return false;
    };

    let today = now.weekday().number_from_monday() as i32;
    let time = now.time();

    day_of_week == today && start <= time && time <= end
}
