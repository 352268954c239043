use chrono::{Local, NaiveDate, TimeZone};
use taskreport::dates::*;

#[test]
fn test_display_string() {
    assert_eq!(to_display_string("2024-01-15").unwrap(), "Monday, January 15, 2024");
    assert_eq!(to_display_string("2024-02-29").unwrap(), "Thursday, February 29, 2024");
}

#[test]
fn test_display_string_rejects_invalid_key() {
    assert!(to_display_string("2024-02-30").is_err());
}

#[test]
fn test_range_length_and_order() {
    let cases = [
        ("2024-01-15", "2024-01-15", 1),
        ("2023-12-30", "2024-01-02", 4),
        ("2024-01-01", "2024-12-31", 366),
    ];
    for (start, end, expected) in cases {
        let keys: Vec<String> = enumerate_range_keys(start, end).unwrap().keys().collect();
        assert_eq!(keys.len(), expected);
        assert_eq!(keys.first().map(String::as_str), Some(start));
        assert_eq!(keys.last().map(String::as_str), Some(end));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_range_is_single_pass() {
    let mut range = enumerate_range_keys("2024-01-01", "2024-01-03").unwrap();
    assert_eq!(range.by_ref().count(), 3);
    assert_eq!(range.next(), None);
}

#[test]
fn test_date_from_millis_uses_local_calendar() {
    let ms = Local.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).single().unwrap().timestamp_millis();
    assert_eq!(date_from_millis(ms), NaiveDate::from_ymd_opt(2024, 1, 15));
    assert_eq!(to_date_key(date_from_millis(ms).unwrap()), "2024-01-15");
}
