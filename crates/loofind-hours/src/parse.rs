//! Low-level clock and weekday parsing used by [`crate::normalize`].

use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;

use crate::model::{TimeWindow, WEEKDAYS};

static TWELVE_HOUR_CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d{1,2})(:(\d{2}))?\s*(AM|PM)$").expect("valid 12-hour clock regex")
});

/// Why a free-text clause could not be turned into a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClauseIssue {
    MissingDaySeparator,
    UnknownWeekday,
    MissingRangeSeparator,
    InvalidOpenTime,
    InvalidCloseTime,
}

impl ClauseIssue {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ClauseIssue::MissingDaySeparator => "missing ': ' between weekday and times",
            ClauseIssue::UnknownWeekday => "unknown weekday",
            ClauseIssue::MissingRangeSeparator => "missing ' to ' between times",
            ClauseIssue::InvalidOpenTime => "opening time is not a 12-hour clock time",
            ClauseIssue::InvalidCloseTime => "closing time is not a 12-hour clock time",
        }
    }
}

/// Full English weekday name, case-insensitive, surrounding whitespace ignored.
pub(crate) fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim();
    WEEKDAYS
        .iter()
        .copied()
        .find(|&day| crate::model::weekday_key(day).eq_ignore_ascii_case(name))
}

/// Parses `"H:MM"` / `"HH:MM"` on a 24-hour clock into minutes since midnight.
pub(crate) fn parse_clock_24h(text: &str) -> Option<u16> {
    let (hours, minutes) = text.trim().split_once(':')?;
    if !(1..=2).contains(&hours.len())
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    let hours: u16 = hours.parse().ok()?;
    let minutes: u16 = minutes.parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Parses `"6 AM"`, `"11:30pm"`, `"12 PM"` into minutes since midnight.
///
/// 12 AM is midnight (0) and 12 PM is noon (720); other PM hours add 720.
/// Hours outside 1..=12 and minutes outside 0..=59 are rejected.
pub(crate) fn parse_clock_12h(text: &str) -> Option<u16> {
    let caps = TWELVE_HOUR_CLOCK.captures(text.trim())?;
    let hour: u16 = caps.get(1)?.as_str().parse().ok()?;
    let minutes: u16 = match caps.get(3) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if !(1..=12).contains(&hour) || minutes >= 60 {
        return None;
    }
    let is_pm = caps.get(4)?.as_str().eq_ignore_ascii_case("pm");
    let hour = match (is_pm, hour) {
        (false, 12) => 0,
        (true, 12) => 12,
        (true, h) => h + 12,
        (false, h) => h,
    };
    Some(hour * 60 + minutes)
}

/// Schedule-object times are `"HH:MM"`; a 12-hour time is accepted as a
/// fallback because older clients stored those.
pub(crate) fn parse_clock(text: &str) -> Option<u16> {
    parse_clock_24h(text).or_else(|| parse_clock_12h(text))
}

/// Parses one `"<Weekday>: <time> to <time>"` clause of a free-text schedule.
pub(crate) fn parse_free_text_clause(clause: &str) -> Result<(Weekday, TimeWindow), ClauseIssue> {
    let (day, range) = clause
        .split_once(": ")
        .ok_or(ClauseIssue::MissingDaySeparator)?;
    let day = parse_weekday(day).ok_or(ClauseIssue::UnknownWeekday)?;
    let (open, close) = range
        .split_once(" to ")
        .ok_or(ClauseIssue::MissingRangeSeparator)?;
    let open = parse_clock_12h(open).ok_or(ClauseIssue::InvalidOpenTime)?;
    let close = parse_clock_12h(close).ok_or(ClauseIssue::InvalidCloseTime)?;
    // Both endpoints are < 1440 by construction.
    let window = TimeWindow::new(open, close).ok_or(ClauseIssue::InvalidCloseTime)?;
    Ok((day, window))
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
