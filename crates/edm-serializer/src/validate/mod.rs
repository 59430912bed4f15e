//! Calendar, clock and decimal grammar validation.
//!
//! Value constructors call into these checks before building anything, so a
//! `TypedValue` that exists always satisfies them.

use crate::error::ValueError;
use crate::limits::{MAX_FRACTIONAL_SECOND, MAX_TZ_HOUR, MAX_TZ_MINUTE, MAX_YEAR, MIN_YEAR};

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    if year % 400 == 0 {
        true
    } else if year % 100 == 0 {
        false
    } else {
        year % 4 == 0
    }
}

/// Number of days in `month` of `year`, or `None` for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u8) -> Option<u8> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// Validates a calendar date over the proleptic range -9999..=9999.
pub fn validate_date(year: i32, month: u8, day: u8) -> Result<(), ValueError> {
    let in_range = (i32::from(MIN_YEAR)..=i32::from(MAX_YEAR)).contains(&year);
    let valid_day = days_in_month(year, month).is_some_and(|max| day >= 1 && day <= max);
    if in_range && valid_day {
        Ok(())
    } else {
        Err(ValueError::InvalidDate { year, month, day })
    }
}

/// Validates a wall-clock time.
pub fn validate_time(hour: u8, minute: u8, second: u8) -> Result<(), ValueError> {
    if hour > 23 || minute > 59 || second > 59 {
        return Err(ValueError::InvalidTime { hour, minute, second });
    }
    Ok(())
}

pub fn validate_fractional_second(value: u64) -> Result<(), ValueError> {
    if value > MAX_FRACTIONAL_SECOND {
        return Err(ValueError::FractionalSecondOutOfRange {
            value,
            max: MAX_FRACTIONAL_SECOND,
        });
    }
    Ok(())
}

pub fn validate_time_zone(hour: i8, minute: u8) -> Result<(), ValueError> {
    if !(-MAX_TZ_HOUR..=MAX_TZ_HOUR).contains(&hour) || minute > MAX_TZ_MINUTE {
        return Err(ValueError::TimeZoneOutOfRange { hour, minute });
    }
    Ok(())
}

/// Checks `[sign] 1*DIGIT ["." 1*DIGIT]` over the whole input.
pub fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos += 1;
    }

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == int_start {
        return false;
    }

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        let frac_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos == frac_start {
            return false;
        }
    }

    pos == bytes.len()
}

pub fn validate_decimal(text: &str) -> Result<(), ValueError> {
    if !is_decimal_literal(text) {
        return Err(ValueError::InvalidDecimal { text: text.to_string() });
    }
    Ok(())
}
