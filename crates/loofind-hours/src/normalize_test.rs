use super::*;
use serde_json::json;

fn per_day(normalized: &Normalized) -> WeeklySchedule {
    match normalized.hours {
        CanonicalHours::PerDay(schedule) => schedule,
        other => panic!("expected PerDay, got {other:?}"),
    }
}

// -----------------------------------------------------------------------
// Shape priority
// -----------------------------------------------------------------------

#[test]
fn always_flag_beats_unsure_and_schedule() {
    let normalized = normalize_json(&json!({
        "is24_7": true,
        "isUnsure": true,
        "schedule": {"monday": {"open": "09:00", "close": "17:00"}}
    }));
    assert_eq!(normalized.hours, CanonicalHours::Always24x7);
    assert!(normalized.degradations.is_empty());
}

#[test]
fn unsure_flag_beats_schedule() {
    let normalized = normalize_json(&json!({
        "isUnsure": true,
        "schedule": {"monday": {"open": "09:00", "close": "17:00"}}
    }));
    assert_eq!(normalized.hours, CanonicalHours::Unspecified);
}

#[test]
fn legacy_flags_take_priority_over_days() {
    let value = json!({
        "is24_7": true,
        "monday": {"open": "09:00", "close": "17:00", "isClosed": false}
    });
    assert_eq!(normalize_json(&value).hours, CanonicalHours::Always24x7);

    let value = json!({
        "isUnsure": true,
        "monday": {"open": "09:00", "close": "17:00", "isClosed": false}
    });
    assert_eq!(normalize_json(&value).hours, CanonicalHours::Unspecified);
}

#[test]
fn sentinel_strings() {
    assert_eq!(normalize(&RawHours::Always24x7), CanonicalHours::Always24x7);
    assert_eq!(normalize(&RawHours::Unknown), CanonicalHours::Unspecified);
    assert_eq!(
        normalize_json(&json!("24/7")).hours,
        CanonicalHours::Always24x7
    );
    assert_eq!(normalize_json(&json!("UNK")).hours, CanonicalHours::Unspecified);
}

#[test]
fn unrecognized_values_degrade_to_unspecified() {
    for value in [json!(null), json!(""), json!(7), json!({"open": "9"})] {
        let normalized = normalize_json(&value);
        assert_eq!(normalized.hours, CanonicalHours::Unspecified, "{value}");
        assert_eq!(normalized.degradations, vec![Degradation::UnrecognizedShape]);
    }
}

#[test]
fn flags_false_without_schedule_is_unspecified() {
    let normalized = normalize_json(&json!({"is24_7": false, "isUnsure": false}));
    assert_eq!(normalized.hours, CanonicalHours::Unspecified);
    assert_eq!(normalized.degradations, vec![Degradation::NoSchedule]);
}

// -----------------------------------------------------------------------
// Structured schedule
// -----------------------------------------------------------------------

#[test]
fn structured_schedule_parses_each_day() {
    let normalized = normalize_json(&json!({
        "schedule": {
            "monday": {"open": "09:00", "close": "17:00"},
            "friday": {"open": "22:00", "close": "02:00"}
        }
    }));
    let schedule = per_day(&normalized);
    let monday = schedule.get(Weekday::Mon).unwrap();
    assert_eq!((monday.open(), monday.close()), (540, 1020));
    let friday = schedule.get(Weekday::Fri).unwrap();
    assert!(friday.is_overnight());
    assert!(schedule.get(Weekday::Tue).is_none(), "absent day stays absent");
    assert!(normalized.degradations.is_empty());
}

#[test]
fn invalid_day_degrades_only_that_day() {
    let normalized = normalize_json(&json!({
        "schedule": {
            "monday": {"open": "9am-ish", "close": "17:00"},
            "tuesday": {"open": "09:00", "close": "17:00"}
        }
    }));
    let schedule = per_day(&normalized);
    assert!(schedule.get(Weekday::Mon).unwrap().is_closed());
    assert!(!schedule.get(Weekday::Tue).unwrap().is_closed());
    assert_eq!(
        normalized.degradations,
        vec![Degradation::InvalidDay {
            day: Weekday::Mon,
            reason: "invalid opening time"
        }]
    );
}

#[test]
fn day_missing_close_degrades() {
    let normalized = normalize_json(&json!({"schedule": {"sunday": {"open": "10:00"}}}));
    assert!(per_day(&normalized).get(Weekday::Sun).unwrap().is_closed());
}

#[test]
fn unknown_schedule_keys_are_reported_and_ignored() {
    let normalized = normalize_json(&json!({
        "schedule": {
            "holiday": {"open": "10:00", "close": "12:00"},
            "Monday": {"open": "10:00", "close": "12:00"}
        }
    }));
    let schedule = per_day(&normalized);
    assert_eq!(schedule.open_days(), 1);
    assert!(normalized.degradations.contains(&Degradation::UnknownDayKey {
        key: "holiday".to_owned()
    }));
}

#[test]
fn structured_accepts_twelve_hour_times() {
    let normalized = normalize_json(&json!({
        "schedule": {"monday": {"open": "8:30 AM", "close": "11:30 PM"}}
    }));
    let monday = per_day(&normalized).get(Weekday::Mon).unwrap();
    assert_eq!((monday.open(), monday.close()), (510, 1410));
}

// -----------------------------------------------------------------------
// Legacy weekly object
// -----------------------------------------------------------------------

#[test]
fn legacy_honors_is_closed() {
    let normalized = normalize_json(&json!({
        "monday": {"open": "08:00", "close": "20:00", "isClosed": false},
        "tuesday": {"open": "08:00", "close": "20:00", "isClosed": true},
        "wednesday": {"open": "", "close": "", "isClosed": true},
        "thursday": {"open": "08:00", "close": "20:00", "isClosed": false},
        "friday": {"open": "08:00", "close": "20:00", "isClosed": false},
        "saturday": {"open": "10:00", "close": "16:00", "isClosed": false},
        "sunday": {"open": "bogus", "close": "16:00", "isClosed": false}
    }));
    let schedule = per_day(&normalized);
    assert_eq!(schedule.open_days(), 4);
    assert!(schedule.get(Weekday::Tue).unwrap().is_closed());
    assert!(schedule.get(Weekday::Wed).unwrap().is_closed());
    assert!(schedule.get(Weekday::Sun).unwrap().is_closed());
    assert_eq!(normalized.degradations.len(), 1, "only sunday degraded");
}

// -----------------------------------------------------------------------
// Free text
// -----------------------------------------------------------------------

#[test]
fn free_text_single_clause() {
    let normalized = normalize_json(&json!("Monday: 6 AM to 10 PM"));
    let monday = per_day(&normalized).get(Weekday::Mon).unwrap();
    assert_eq!((monday.open(), monday.close()), (360, 1320));
}

#[test]
fn free_text_missing_meridiem_does_not_panic() {
    let normalized = normalize_json(&json!("Monday: 6 to 10"));
    assert_eq!(normalized.hours, CanonicalHours::Unspecified);
    assert!(normalized
        .degradations
        .contains(&Degradation::NoUsableClauses));
}

#[test]
fn free_text_bad_clause_leaves_its_day_closed() {
    let normalized = normalize_json(&json!(
        "Monday: 6 to 10, Tuesday: 9 AM to 5 PM, Wednesday: 12 PM to 12 AM"
    ));
    let schedule = per_day(&normalized);
    assert!(schedule.get(Weekday::Mon).is_none());
    let tuesday = schedule.get(Weekday::Tue).unwrap();
    assert_eq!((tuesday.open(), tuesday.close()), (540, 1020));
    let wednesday = schedule.get(Weekday::Wed).unwrap();
    assert_eq!((wednesday.open(), wednesday.close()), (720, 0));
    assert!(matches!(
        normalized.degradations.as_slice(),
        [Degradation::SkippedClause { clause, .. }] if clause == "Monday: 6 to 10"
    ));
}

#[test]
fn free_text_full_week() {
    let text = "Saturday: 4 AM to 11:30 PM, Sunday: 4 AM to 11:30 PM, \
                Monday: 4 AM to 11:30 PM, Tuesday: 4 AM to 11:30 PM, \
                Wednesday: 4 AM to 11:30 PM, Thursday: 4 AM to 11:30 PM, \
                Friday: 4 AM to 11:30 PM";
    let normalized = normalize_json(&json!(text));
    assert_eq!(per_day(&normalized).open_days(), 7);
    assert!(normalized.degradations.is_empty());
}

#[test]
fn free_text_slash_alternates_are_unsupported() {
    let normalized = normalize_json(&json!("Friday: 7 AM to 7/9 PM, Saturday: 8 AM to 6 PM"));
    let schedule = per_day(&normalized);
    assert!(schedule.get(Weekday::Fri).is_none());
    assert!(schedule.get(Weekday::Sat).is_some());
}

#[test]
fn free_text_duplicate_day_keeps_first() {
    let normalized = normalize_json(&json!("Monday: 6 AM to 10 AM, Monday: 1 PM to 5 PM"));
    let monday = per_day(&normalized).get(Weekday::Mon).unwrap();
    assert_eq!(monday.open(), 360);
    assert_eq!(
        normalized.degradations,
        vec![Degradation::DuplicateDay { day: Weekday::Mon }]
    );
}

#[test]
fn degradation_messages_are_readable() {
    let d = Degradation::InvalidDay {
        day: Weekday::Sun,
        reason: "invalid closing time",
    };
    assert_eq!(d.to_string(), "sunday treated as closed: invalid closing time");
}

#[test]
fn normalize_logged_returns_hours() {
    assert_eq!(
        normalize_logged("4251", &json!("Monday: 6 to 10")),
        CanonicalHours::Unspecified
    );
}
