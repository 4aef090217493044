use super::*;

// -----------------------------------------------------------------------
// parse_clock_12h
// -----------------------------------------------------------------------

#[test]
fn twelve_hour_midnight_and_noon() {
    assert_eq!(parse_clock_12h("12 AM"), Some(0));
    assert_eq!(parse_clock_12h("12 PM"), Some(720));
    assert_eq!(parse_clock_12h("12:30 AM"), Some(30));
    assert_eq!(parse_clock_12h("12:30 PM"), Some(750));
}

#[test]
fn twelve_hour_pm_adds_twelve_hours() {
    assert_eq!(parse_clock_12h("6 AM"), Some(360));
    assert_eq!(parse_clock_12h("10 PM"), Some(1320));
    assert_eq!(parse_clock_12h("11:30 PM"), Some(1410));
}

#[test]
fn twelve_hour_is_case_insensitive_and_spacing_tolerant() {
    assert_eq!(parse_clock_12h("7pm"), Some(1140));
    assert_eq!(parse_clock_12h("  7:15 Am "), Some(435));
}

#[test]
fn twelve_hour_requires_meridiem() {
    assert_eq!(parse_clock_12h("6"), None);
    assert_eq!(parse_clock_12h("10"), None);
    assert_eq!(parse_clock_12h("18:00"), None);
}

#[test]
fn twelve_hour_rejects_out_of_range_values() {
    assert_eq!(parse_clock_12h("0 AM"), None);
    assert_eq!(parse_clock_12h("13 PM"), None);
    assert_eq!(parse_clock_12h("9:75 AM"), None);
    assert_eq!(parse_clock_12h("9:5 AM"), None);
}

#[test]
fn twelve_hour_rejects_slash_alternatives() {
    assert_eq!(parse_clock_12h("7/9 PM"), None);
}

// -----------------------------------------------------------------------
// parse_clock_24h / parse_clock
// -----------------------------------------------------------------------

#[test]
fn twenty_four_hour_basic() {
    assert_eq!(parse_clock_24h("09:00"), Some(540));
    assert_eq!(parse_clock_24h("9:00"), Some(540));
    assert_eq!(parse_clock_24h("23:59"), Some(1439));
    assert_eq!(parse_clock_24h("00:00"), Some(0));
}

#[test]
fn twenty_four_hour_rejects_garbage() {
    assert_eq!(parse_clock_24h("24:00"), None);
    assert_eq!(parse_clock_24h("12:60"), None);
    assert_eq!(parse_clock_24h("noon"), None);
    assert_eq!(parse_clock_24h("9"), None);
    assert_eq!(parse_clock_24h("9:0"), None);
    assert_eq!(parse_clock_24h("-1:00"), None);
    assert_eq!(parse_clock_24h(""), None);
}

#[test]
fn parse_clock_falls_back_to_twelve_hour() {
    assert_eq!(parse_clock("17:30"), Some(1050));
    assert_eq!(parse_clock("5:30 PM"), Some(1050));
    assert_eq!(parse_clock("half past five"), None);
}

// -----------------------------------------------------------------------
// parse_weekday / parse_free_text_clause
// -----------------------------------------------------------------------

#[test]
fn weekday_names_are_case_insensitive() {
    assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
    assert_eq!(parse_weekday("SUNDAY"), Some(Weekday::Sun));
    assert_eq!(parse_weekday(" wednesday "), Some(Weekday::Wed));
    assert_eq!(parse_weekday("Mon"), None);
    assert_eq!(parse_weekday("Funday"), None);
}

#[test]
fn clause_parses_into_window() {
    let (day, window) = parse_free_text_clause("Saturday: 4 AM to 11:30 PM").unwrap();
    assert_eq!(day, Weekday::Sat);
    assert_eq!(window.open(), 240);
    assert_eq!(window.close(), 1410);
}

#[test]
fn clause_reports_first_failing_step() {
    assert_eq!(
        parse_free_text_clause("Monday 6 AM to 10 PM"),
        Err(ClauseIssue::MissingDaySeparator)
    );
    assert_eq!(
        parse_free_text_clause("Someday: 6 AM to 10 PM"),
        Err(ClauseIssue::UnknownWeekday)
    );
    assert_eq!(
        parse_free_text_clause("Monday: 6 AM - 10 PM"),
        Err(ClauseIssue::MissingRangeSeparator)
    );
    assert_eq!(
        parse_free_text_clause("Monday: 6 to 10"),
        Err(ClauseIssue::InvalidOpenTime)
    );
    assert_eq!(
        parse_free_text_clause("Monday: 6 AM to 10"),
        Err(ClauseIssue::InvalidCloseTime)
    );
}
