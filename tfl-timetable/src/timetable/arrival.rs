//! Wall-clock arrival times from a departure and a minute offset.
//!
//! TfL sends departure hours and minutes as strings and stop offsets as
//! fractional minutes. Parsing is lenient: a field that does not start
//! with a number counts as 0 rather than failing the whole timetable.

use chrono::NaiveTime;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse the leading integer of `s`, or 0 if there is none.
///
/// Leading whitespace and a single sign are accepted; parsing stops at the
/// first non-digit, so `"10abc"` is 10 and `"bad"` is 0. Values too large
/// for an `i64` are also 0.
///
/// # Examples
///
/// ```
/// use tfl_timetable::timetable::lenient_int;
///
/// assert_eq!(lenient_int("09"), 9);
/// assert_eq!(lenient_int(" 7"), 7);
/// assert_eq!(lenient_int("10abc"), 10);
/// assert_eq!(lenient_int("-3"), -3);
/// assert_eq!(lenient_int("bad"), 0);
/// assert_eq!(lenient_int(""), 0);
/// ```
pub fn lenient_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    rest[..digits_end]
        .parse::<i64>()
        .map(|n| sign * n)
        .unwrap_or(0)
}

/// Arrival time of a journey at a stop `offset_minutes` after departure.
///
/// The offset is truncated toward zero before it is added. The result
/// wraps at midnight, so a 23:50 departure plus 20 minutes is 00:10.
pub fn arrival(hour: &str, minute: &str, offset_minutes: f64) -> NaiveTime {
    // `as` saturates (and maps NaN to 0), so wild offsets cannot panic.
    let offset = offset_minutes.trunc() as i64;

    let total = lenient_int(hour)
        .saturating_mul(60)
        .saturating_add(lenient_int(minute))
        .saturating_add(offset);

    let minute_of_day = total.rem_euclid(MINUTES_PER_DAY) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(minute_of_day * 60, 0).unwrap_or(NaiveTime::MIN)
}

/// [`arrival`] formatted as `HH:MM`.
///
/// # Examples
///
/// ```
/// use tfl_timetable::timetable::arrival_time;
///
/// assert_eq!(arrival_time("23", "50", 20.0), "00:10");
/// assert_eq!(arrival_time("09", "05", 0.0), "09:05");
/// assert_eq!(arrival_time("bad", "30", 5.0), "00:35");
/// ```
pub fn arrival_time(hour: &str, minute: &str, offset_minutes: f64) -> String {
    arrival(hour, minute, offset_minutes)
        .format("%H:%M")
        .to_string()
}
