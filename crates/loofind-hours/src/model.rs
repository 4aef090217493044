//! Canonical hours representation shared by the normalizer and the evaluator.

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Number of minutes in a day; valid clock minutes are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u16 = 1440;

/// All seven weekdays, Monday first.
pub(crate) const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Lowercase English weekday name, as used for schedule keys.
#[must_use]
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// One open/close pair for a single day, in minutes since midnight.
///
/// A window whose `close` is earlier than its `open` spans midnight. A
/// `closed` window carries no meaningful times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    open: u16,
    close: u16,
    closed: bool,
}

impl TimeWindow {
    /// Builds an open window. Returns `None` unless both endpoints are valid
    /// clock minutes.
    #[must_use]
    pub fn new(open: u16, close: u16) -> Option<Self> {
        if open < MINUTES_PER_DAY && close < MINUTES_PER_DAY {
            Some(Self {
                open,
                close,
                closed: false,
            })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn closed() -> Self {
        Self {
            open: 0,
            close: 0,
            closed: true,
        }
    }

    #[must_use]
    pub fn open(&self) -> u16 {
        self.open
    }

    #[must_use]
    pub fn close(&self) -> u16 {
        self.close
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[must_use]
    pub fn is_overnight(&self) -> bool {
        !self.closed && self.close < self.open
    }

    /// Whether `minute` falls inside the window. Both endpoints are inclusive.
    #[must_use]
    pub fn contains(&self, minute: u16) -> bool {
        if self.closed {
            return false;
        }
        if self.close >= self.open {
            self.open <= minute && minute <= self.close
        } else {
            minute >= self.open || minute <= self.close
        }
    }
}

/// Per-weekday windows. A day with no window is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<TimeWindow>; 7],
}

impl WeeklySchedule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, day: Weekday) -> Option<TimeWindow> {
        self.days[day.num_days_from_monday() as usize]
    }

    pub fn set(&mut self, day: Weekday, window: TimeWindow) {
        self.days[day.num_days_from_monday() as usize] = Some(window);
    }

    /// Builder-style [`WeeklySchedule::set`].
    #[must_use]
    pub fn with(mut self, day: Weekday, window: TimeWindow) -> Self {
        self.set(day, window);
        self
    }

    /// Monday through Sunday, for a "view all hours" listing.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, Option<TimeWindow>)> + '_ {
        WEEKDAYS.iter().map(|&day| (day, self.get(day)))
    }

    /// Number of days with an open window.
    #[must_use]
    pub fn open_days(&self) -> usize {
        self.days
            .iter()
            .filter(|w| w.is_some_and(|w| !w.is_closed()))
            .count()
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(WEEKDAYS.len()))?;
        for (day, window) in self.days() {
            map.serialize_entry(weekday_key(day), &window.unwrap_or(TimeWindow::closed()))?;
        }
        map.end()
    }
}

/// Normalized hours for one directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum CanonicalHours {
    #[serde(rename = "always_24x7")]
    Always24x7,
    /// Hours are unknown. Never treated as open.
    Unspecified,
    PerDay(WeeklySchedule),
}

impl CanonicalHours {
    #[must_use]
    pub fn is_always_open(&self) -> bool {
        matches!(self, CanonicalHours::Always24x7)
    }

    #[must_use]
    pub fn schedule(&self) -> Option<&WeeklySchedule> {
        match self {
            CanonicalHours::PerDay(schedule) => Some(schedule),
            CanonicalHours::Always24x7 | CanonicalHours::Unspecified => None,
        }
    }
}
