//! "Is it open right now" evaluation over [`CanonicalHours`].
//!
//! The evaluation instant is a local weekday plus minute-of-day supplied by
//! the caller; no timezone conversion happens here.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use loofind_core::Facility;
use serde::Serialize;

use crate::model::{CanonicalHours, WeeklySchedule, MINUTES_PER_DAY};
use crate::normalize::normalize_logged;

/// A local calendar instant reduced to what the evaluator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalInstant {
    weekday: Weekday,
    minute_of_day: u16,
}

impl LocalInstant {
    /// Returns `None` unless `minute_of_day` is a valid clock minute.
    #[must_use]
    pub fn new(weekday: Weekday, minute_of_day: u16) -> Option<Self> {
        (minute_of_day < MINUTES_PER_DAY).then_some(Self {
            weekday,
            minute_of_day,
        })
    }

    /// Returns `None` for hours above 23 or minutes above 59.
    #[must_use]
    pub fn at(weekday: Weekday, hour: u16, minute: u16) -> Option<Self> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Self::new(weekday, hour * 60 + minute)
    }

    #[must_use]
    pub fn from_naive(local: &NaiveDateTime) -> Self {
        // hour() <= 23 and minute() <= 59, so the sum always fits below 1440.
        #[allow(clippy::cast_possible_truncation)]
        let minute_of_day = (local.hour() * 60 + local.minute()) as u16;
        Self {
            weekday: local.weekday(),
            minute_of_day,
        }
    }

    /// The host's current local wall-clock time.
    #[must_use]
    pub fn now_local() -> Self {
        Self::from_naive(&chrono::Local::now().naive_local())
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    #[must_use]
    pub fn minute_of_day(&self) -> u16 {
        self.minute_of_day
    }
}

/// Derived open/closed state; recomputed per query and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    pub is_open: bool,
}

impl AvailabilitySnapshot {
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_open {
            "Open"
        } else {
            "Closed"
        }
    }
}

/// Whether the hours allow a visit at `at`.
///
/// Unknown hours are never considered open.
#[must_use]
pub fn is_open(hours: &CanonicalHours, at: LocalInstant) -> bool {
    match hours {
        CanonicalHours::Always24x7 => true,
        CanonicalHours::Unspecified => false,
        CanonicalHours::PerDay(schedule) => schedule
            .get(at.weekday)
            .is_some_and(|window| window.contains(at.minute_of_day)),
    }
}

#[must_use]
pub fn snapshot(hours: &CanonicalHours, at: LocalInstant) -> AvailabilitySnapshot {
    AvailabilitySnapshot {
        is_open: is_open(hours, at),
    }
}

/// Normalizes a directory entry's stored hours and evaluates them at `at`.
#[must_use]
pub fn is_facility_open(facility: &Facility, at: LocalInstant) -> bool {
    let hours = match &facility.hours {
        Some(value) => normalize_logged(&facility.id, value),
        None => CanonicalHours::Unspecified,
    };
    is_open(&hours, at)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Opening,
    Closing,
}

/// The weekday and minute of the next opening or closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextChange {
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub minute_of_day: u16,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_weekday<S: serde::Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(crate::model::weekday_key(*day))
}

/// Days of schedule laid out by [`next_change`]: a full week ahead plus one
/// more so an overnight run starting on the last day can still close.
const SCAN_DAYS: u32 = 9;

/// Finds the next opening (or closing) time after `at` for per-day schedules.
///
/// Open minutes are laid out exactly as [`is_open`] sees them, starting at
/// `at`'s weekday, and runs that continue across midnight are merged. The
/// next opening is the start of the first run beginning after `at`, up to the
/// same weekday one week later. The next closing is the last open minute of
/// the first run ending after `at`, so an overnight window that runs into
/// the next day's hours closes when those hours end, and one that does not
/// closes at 23:59. Returns `None` for 24/7 or unknown hours, for schedules
/// with no open day, and when the current run never ends within the scan.
#[must_use]
pub fn next_change(
    hours: &CanonicalHours,
    at: LocalInstant,
    transition: Transition,
) -> Option<NextChange> {
    let schedule = hours.schedule()?;
    let day_len = u32::from(MINUTES_PER_DAY);
    let now = u32::from(at.minute_of_day);
    let runs = open_runs(schedule, at.weekday, SCAN_DAYS);

    let minute = match transition {
        Transition::Opening => runs
            .iter()
            .map(|&(start, _)| start)
            .find(|&start| start > now && start < 8 * day_len)?,
        Transition::Closing => runs
            .iter()
            .map(|&(_, end)| end)
            .find(|&end| end > now)
            .filter(|&end| end < SCAN_DAYS * day_len - 1)?,
    };

    let weekday = (0..minute / day_len).fold(at.weekday, |day, _| day.succ());
    Some(NextChange {
        weekday,
        minute_of_day: u16::try_from(minute % day_len).ok()?,
    })
}

/// Inclusive open runs in minutes counted from the start of `from`.
fn open_runs(schedule: &WeeklySchedule, from: Weekday, days: u32) -> Vec<(u32, u32)> {
    let day_len = u32::from(MINUTES_PER_DAY);
    let mut runs = Vec::new();

    let mut day = from;
    for offset in 0..days {
        let base = offset * day_len;
        if let Some(window) = schedule.get(day).filter(|w| !w.is_closed()) {
            let (open, close) = (u32::from(window.open()), u32::from(window.close()));
            if window.is_overnight() {
                push_run(&mut runs, base, base + close);
                push_run(&mut runs, base + open, base + day_len - 1);
            } else {
                push_run(&mut runs, base + open, base + close);
            }
        }
        day = day.succ();
    }
    runs
}

fn push_run(runs: &mut Vec<(u32, u32)>, start: u32, end: u32) {
    if let Some(last) = runs.last_mut().filter(|last| last.1 + 1 >= start) {
        last.1 = last.1.max(end);
    } else {
        runs.push((start, end));
    }
}
