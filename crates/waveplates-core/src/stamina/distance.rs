//! Approximate, human-readable distances between two instants.
//!
//! The wording follows the familiar "about 2 hours" / "3 days" /
//! "over 1 year" scale used by web date libraries, without suffixes
//! ("in ..." / "... ago"). Direction is ignored.

use chrono::{DateTime, Datelike, Timelike, Utc};

const MINUTES_IN_DAY: i64 = 1_440;
const MINUTES_IN_ALMOST_TWO_DAYS: i64 = 2_520;
const MINUTES_IN_MONTH: i64 = 43_200;
const MINUTES_IN_TWO_MONTHS: i64 = 86_400;

/// Integer division rounding halves up. Both operands must be non-negative.
fn round_div(n: i64, d: i64) -> i64 {
    (2 * n + d) / (2 * d)
}

fn plural(n: i64, one: &str, many: &str) -> String {
    if n == 1 {
        one.to_string()
    } else {
        many.replace("{}", &n.to_string())
    }
}

/// Whole calendar months between `earlier` and `later`, not counting a
/// trailing month that has not fully elapsed.
fn difference_in_months(later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    let later_key = (later.day(), later.num_seconds_from_midnight(), later.nanosecond());
    let earlier_key = (earlier.day(), earlier.num_seconds_from_midnight(), earlier.nanosecond());
    if months > 0 && later_key < earlier_key {
        months -= 1;
    }
    months
}

/// Distance between `date` and `base` in words.
pub fn format_distance(date: DateTime<Utc>, base: DateTime<Utc>) -> String {
    let (earlier, later) = if date <= base { (date, base) } else { (base, date) };
    let seconds = (later - earlier).num_seconds();
    let minutes = round_div(seconds, 60);

    if minutes < 1 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes, "1 minute", "{} minutes")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < MINUTES_IN_DAY {
        plural(round_div(minutes, 60), "about 1 hour", "about {} hours")
    } else if minutes < MINUTES_IN_ALMOST_TWO_DAYS {
        "1 day".to_string()
    } else if minutes < MINUTES_IN_MONTH {
        plural(round_div(minutes, MINUTES_IN_DAY), "1 day", "{} days")
    } else if minutes < MINUTES_IN_TWO_MONTHS {
        plural(
            round_div(minutes, MINUTES_IN_MONTH),
            "about 1 month",
            "about {} months",
        )
    } else {
        let months = difference_in_months(later, earlier);
        if months < 12 {
            plural(round_div(minutes, MINUTES_IN_MONTH), "1 month", "{} months")
        } else {
            let months_since_start_of_year = months % 12;
            let years = months / 12;
            if months_since_start_of_year < 3 {
                plural(years, "about 1 year", "about {} years")
            } else if months_since_start_of_year < 9 {
                plural(years, "over 1 year", "over {} years")
            } else {
                plural(years + 1, "almost 1 year", "almost {} years")
            }
        }
    }
}
