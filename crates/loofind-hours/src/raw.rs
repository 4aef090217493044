//! The raw, untrusted hours shapes found in stored entries.
//!
//! Stored hours come in five structurally distinct shapes. [`RawHours::from_json`]
//! classifies a JSON value into exactly one of them (or `None` when it matches
//! none), so the normalizer can handle every shape in a single match.

use serde_json::{Map, Value};

use crate::model::{weekday_key, WEEKDAYS};

const FLAG_24_7: &str = "is24_7";
const FLAG_UNSURE: &str = "isUnsure";
const SCHEDULE_KEY: &str = "schedule";

/// One day's entry as it appears in a structured or legacy schedule.
///
/// Every field is optional because the source is untrusted; missing or
/// malformed fields are resolved during normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDay {
    pub open: Option<String>,
    pub close: Option<String>,
    pub is_closed: Option<bool>,
}

impl RawDay {
    #[must_use]
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: Some(open.to_owned()),
            close: Some(close.to_owned()),
            is_closed: None,
        }
    }

    #[must_use]
    pub fn closed() -> Self {
        Self {
            open: None,
            close: None,
            is_closed: Some(true),
        }
    }

    fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_owned);
        Self {
            open: text("open"),
            close: text("close"),
            is_closed: value.get("isClosed").and_then(Value::as_bool),
        }
    }
}

/// `{is24_7?, isUnsure?, schedule?: {<weekday>: {open, close}}}`.
///
/// Schedule keys are kept verbatim; unknown keys are reported, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredHours {
    pub is_24_7: bool,
    pub is_unsure: bool,
    pub schedule: Option<Vec<(String, RawDay)>>,
}

/// Seven lowercase weekday keys each holding `{open, close, isClosed}`, plus
/// optional top-level flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyWeeklyHours {
    pub is_24_7: bool,
    pub is_unsure: bool,
    pub days: Vec<(String, RawDay)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawHours {
    /// The `"24/7"` sentinel string.
    Always24x7,
    /// The `"UNK"` sentinel string.
    Unknown,
    /// `"Monday: 6 AM to 10 PM, Tuesday: ..."`.
    FreeText(String),
    Structured(StructuredHours),
    LegacyWeekly(LegacyWeeklyHours),
}

impl RawHours {
    /// Classifies a stored JSON value. Returns `None` for null, empty strings,
    /// numbers, arrays, and objects that match no known shape.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Self::from_text(text),
            Value::Object(map) => Self::from_object(map),
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) => None,
        }
    }

    #[must_use]
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim() {
            "" => None,
            "24/7" => Some(RawHours::Always24x7),
            "UNK" => Some(RawHours::Unknown),
            other => Some(RawHours::FreeText(other.to_owned())),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Option<Self> {
        let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
        let is_24_7 = flag(FLAG_24_7);
        let is_unsure = flag(FLAG_UNSURE);

        if let Some(schedule) = map.get(SCHEDULE_KEY).and_then(Value::as_object) {
            let days = schedule
                .iter()
                .map(|(key, day)| (key.clone(), RawDay::from_json(day)))
                .collect();
            return Some(RawHours::Structured(StructuredHours {
                is_24_7,
                is_unsure,
                schedule: Some(days),
            }));
        }

        let days: Vec<(String, RawDay)> = WEEKDAYS
            .iter()
            .filter_map(|&day| {
                let key = weekday_key(day);
                map.get(key)
                    .map(|value| (key.to_owned(), RawDay::from_json(value)))
            })
            .collect();
        if !days.is_empty() {
            return Some(RawHours::LegacyWeekly(LegacyWeeklyHours {
                is_24_7,
                is_unsure,
                days,
            }));
        }

        if map.contains_key(FLAG_24_7) || map.contains_key(FLAG_UNSURE) {
            return Some(RawHours::Structured(StructuredHours {
                is_24_7,
                is_unsure,
                schedule: None,
            }));
        }

        None
    }
}
