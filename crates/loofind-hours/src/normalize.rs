//! Normalization from [`RawHours`] to [`CanonicalHours`].
//!
//! Normalization never fails. A record that cannot be understood at all
//! becomes [`CanonicalHours::Unspecified`]; a single unreadable day becomes
//! closed. Every such fallback is reported as a [`Degradation`] so the caller
//! can log it; this module itself stays free of side effects apart from
//! [`normalize_logged`].

use chrono::Weekday;
use serde_json::Value;

use crate::model::{weekday_key, CanonicalHours, TimeWindow, WeeklySchedule};
use crate::parse::{parse_clock, parse_free_text_clause, parse_weekday};
use crate::raw::{LegacyWeeklyHours, RawDay, RawHours, StructuredHours};

/// A normalization fallback that did not abort the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// The stored value matched none of the known hours shapes.
    UnrecognizedShape,
    /// A structured object carried neither a schedule nor a true flag.
    NoSchedule,
    /// A schedule key that is not a weekday name; the entry is ignored.
    UnknownDayKey { key: String },
    /// A day's open/close could not be read; the day is treated as closed.
    InvalidDay { day: Weekday, reason: &'static str },
    /// A free-text clause was dropped; its weekday stays closed.
    SkippedClause { clause: String, reason: &'static str },
    /// A later free-text clause named a weekday that already had hours.
    DuplicateDay { day: Weekday },
    /// No free-text clause could be parsed.
    NoUsableClauses,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::UnrecognizedShape => write!(f, "unrecognized hours shape"),
            Degradation::NoSchedule => write!(f, "hours object has no schedule"),
            Degradation::UnknownDayKey { key } => write!(f, "unknown schedule key '{key}'"),
            Degradation::InvalidDay { day, reason } => {
                write!(f, "{} treated as closed: {reason}", weekday_key(*day))
            }
            Degradation::SkippedClause { clause, reason } => {
                write!(f, "skipped clause '{clause}': {reason}")
            }
            Degradation::DuplicateDay { day } => {
                write!(f, "duplicate hours for {}; first kept", weekday_key(*day))
            }
            Degradation::NoUsableClauses => write!(f, "no parseable clauses in hours text"),
        }
    }
}

/// Result of normalization along with every fallback taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub hours: CanonicalHours,
    pub degradations: Vec<Degradation>,
}

impl Normalized {
    fn clean(hours: CanonicalHours) -> Self {
        Self {
            hours,
            degradations: Vec::new(),
        }
    }
}

/// Normalizes a raw hours value, discarding the degradation report.
#[must_use]
pub fn normalize(raw: &RawHours) -> CanonicalHours {
    normalize_with_report(raw).hours
}

/// Normalizes a raw hours value.
///
/// Shape priority: a true 24/7 flag wins over everything, then a true unsure
/// flag, then a structured schedule, then a legacy weekly object, then free
/// text.
#[must_use]
pub fn normalize_with_report(raw: &RawHours) -> Normalized {
    match raw {
        RawHours::Always24x7 => Normalized::clean(CanonicalHours::Always24x7),
        RawHours::Unknown => Normalized::clean(CanonicalHours::Unspecified),
        RawHours::Structured(structured) => normalize_structured(structured),
        RawHours::LegacyWeekly(legacy) => normalize_legacy(legacy),
        RawHours::FreeText(text) => normalize_free_text(text),
    }
}

/// Classifies and normalizes a stored JSON hours value in one step.
#[must_use]
pub fn normalize_json(value: &Value) -> Normalized {
    match RawHours::from_json(value) {
        Some(raw) => normalize_with_report(&raw),
        None => Normalized {
            hours: CanonicalHours::Unspecified,
            degradations: vec![Degradation::UnrecognizedShape],
        },
    }
}

/// [`normalize_json`], emitting one `debug` event per degradation.
#[must_use]
pub fn normalize_logged(entry_id: &str, value: &Value) -> CanonicalHours {
    let normalized = normalize_json(value);
    for degradation in &normalized.degradations {
        tracing::debug!(entry_id, %degradation, "hours normalization degraded");
    }
    normalized.hours
}

// ---------------------------------------------------------------------------
// Shape handlers
// ---------------------------------------------------------------------------

fn flag_override(is_24_7: bool, is_unsure: bool) -> Option<CanonicalHours> {
    if is_24_7 {
        Some(CanonicalHours::Always24x7)
    } else if is_unsure {
        Some(CanonicalHours::Unspecified)
    } else {
        None
    }
}

fn normalize_structured(structured: &StructuredHours) -> Normalized {
    if let Some(hours) = flag_override(structured.is_24_7, structured.is_unsure) {
        return Normalized::clean(hours);
    }
    let Some(schedule) = &structured.schedule else {
        return Normalized {
            hours: CanonicalHours::Unspecified,
            degradations: vec![Degradation::NoSchedule],
        };
    };
    normalize_day_map(schedule)
}

fn normalize_legacy(legacy: &LegacyWeeklyHours) -> Normalized {
    if let Some(hours) = flag_override(legacy.is_24_7, legacy.is_unsure) {
        return Normalized::clean(hours);
    }
    normalize_day_map(&legacy.days)
}

fn normalize_day_map(days: &[(String, RawDay)]) -> Normalized {
    let mut schedule = WeeklySchedule::new();
    let mut degradations = Vec::new();

    for (key, raw_day) in days {
        let Some(day) = parse_weekday(key) else {
            degradations.push(Degradation::UnknownDayKey { key: key.clone() });
            continue;
        };
        match day_window(raw_day) {
            Ok(window) => schedule.set(day, window),
            Err(reason) => {
                degradations.push(Degradation::InvalidDay { day, reason });
                schedule.set(day, TimeWindow::closed());
            }
        }
    }

    Normalized {
        hours: CanonicalHours::PerDay(schedule),
        degradations,
    }
}

fn day_window(raw_day: &RawDay) -> Result<TimeWindow, &'static str> {
    if raw_day.is_closed == Some(true) {
        return Ok(TimeWindow::closed());
    }
    let open = raw_day.open.as_deref().ok_or("missing opening time")?;
    let close = raw_day.close.as_deref().ok_or("missing closing time")?;
    let open = parse_clock(open).ok_or("invalid opening time")?;
    let close = parse_clock(close).ok_or("invalid closing time")?;
    TimeWindow::new(open, close).ok_or("time outside the day")
}

fn normalize_free_text(text: &str) -> Normalized {
    let mut schedule = WeeklySchedule::new();
    let mut degradations = Vec::new();
    let mut parsed = 0usize;

    for clause in text.split(", ") {
        match parse_free_text_clause(clause) {
            Ok((day, window)) => {
                if schedule.get(day).is_some() {
                    degradations.push(Degradation::DuplicateDay { day });
                } else {
                    schedule.set(day, window);
                    parsed += 1;
                }
            }
            Err(issue) => degradations.push(Degradation::SkippedClause {
                clause: clause.to_owned(),
                reason: issue.as_str(),
            }),
        }
    }

    if parsed == 0 {
        degradations.push(Degradation::NoUsableClauses);
        return Normalized {
            hours: CanonicalHours::Unspecified,
            degradations,
        };
    }

    Normalized {
        hours: CanonicalHours::PerDay(schedule),
        degradations,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
