//! Calendar primitives: dates without a time component, year/month pairs and
//! weekdays.
//!
//! All arithmetic goes through a proleptic Gregorian day count, so dates far
//! outside the common range still behave.
use std::{
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::error::DateError;

const SECONDS_PER_DAY: i64 = 86_400;

/// Days of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Returns the zero-based position of this day in a Monday-first week.
    pub fn index_from_monday(self) -> i32 {
        match self {
            Weekday::Monday => 0,
            Weekday::Tuesday => 1,
            Weekday::Wednesday => 2,
            Weekday::Thursday => 3,
            Weekday::Friday => 4,
            Weekday::Saturday => 5,
            Weekday::Sunday => 6,
        }
    }

    /// Returns the weekday at `index` in a Monday-first week, wrapping.
    pub fn from_monday_index(index: i32) -> Self {
        match index.rem_euclid(7) {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            _ => Weekday::Sunday,
        }
    }

    /// Three-letter English label.
    pub fn short_label(self) -> &'static str {
        match self {
            Weekday::Monday => "Mon",
            Weekday::Tuesday => "Tue",
            Weekday::Wednesday => "Wed",
            Weekday::Thursday => "Thu",
            Weekday::Friday => "Fri",
            Weekday::Saturday => "Sat",
            Weekday::Sunday => "Sun",
        }
    }
}

impl FromStr for Weekday {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Monday),
            "tue" | "tuesday" => Ok(Weekday::Tuesday),
            "wed" | "wednesday" => Ok(Weekday::Wednesday),
            "thu" | "thursday" => Ok(Weekday::Thursday),
            "fri" | "friday" => Ok(Weekday::Friday),
            "sat" | "saturday" => Ok(Weekday::Saturday),
            "sun" | "sunday" => Ok(Weekday::Sunday),
            _ => Err(DateError::UnknownWeekday(s.to_string())),
        }
    }
}

/// A calendar date expressed as year, month, and day.
///
/// Ordering and equality compare (year, month, day) only; there is no time
/// component to drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// Creates a calendar date, validating month and day.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth { month });
        }
        let max_day = days_in_month(year, month);
        if day == 0 || day > max_day {
            return Err(DateError::InvalidDay {
                year,
                month,
                day,
                max_day,
            });
        }
        Ok(Self { year, month, day })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Returns the day of the month (1-31).
    pub fn day(&self) -> u8 {
        self.day
    }

    /// Returns the current date in UTC.
    pub fn today() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        Self::from_unix_seconds(secs)
    }

    /// Truncates a unix timestamp to the UTC date it falls on.
    pub fn from_unix_seconds(secs: i64) -> Self {
        Self::from_days_since_epoch(secs.div_euclid(SECONDS_PER_DAY))
    }

    /// Builds a date from a day count relative to 1970-01-01.
    pub fn from_days_since_epoch(days: i64) -> Self {
        let (year, month, day) = civil_from_days(days);
        Self { year, month, day }
    }

    /// Day count relative to 1970-01-01.
    pub fn days_since_epoch(&self) -> i64 {
        days_from_civil(self.year, self.month, self.day)
    }

    /// Returns the date `delta` days away.
    pub fn add_days(&self, delta: i64) -> Self {
        Self::from_days_since_epoch(self.days_since_epoch() + delta)
    }

    /// The following day.
    pub fn succ(&self) -> Self {
        self.add_days(1)
    }

    /// The previous day.
    pub fn pred(&self) -> Self {
        self.add_days(-1)
    }

    /// Returns the weekday this date falls on.
    pub fn weekday(&self) -> Weekday {
        // 1970-01-01 was a Thursday.
        Weekday::from_monday_index((self.days_since_epoch() + 3).rem_euclid(7) as i32)
    }

    /// Returns the month this date belongs to.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year,
            month: self.month,
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Parses ISO `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || DateError::Parse(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let year = parts
            .next()
            .and_then(|p| p.parse::<i32>().ok())
            .ok_or_else(parse_err)?;
        let month = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(parse_err)?;
        let day = parts
            .next()
            .and_then(|p| p.parse::<u8>().ok())
            .ok_or_else(parse_err)?;
        CalendarDate::new(year, month, day)
    }
}

/// A year and month pair used for month iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Creates a year/month pair if the month is valid.
    pub fn new(year: i32, month: u8) -> Result<Self, DateError> {
        if !(1..=12).contains(&month) {
            return Err(DateError::InvalidMonth { month });
        }
        Ok(Self { year, month })
    }

    /// Returns the year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Months elapsed since year 0, January. Strictly increasing with time.
    pub fn linear_index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    /// Adds or subtracts months, adjusting the year as needed.
    ///
    /// The year saturates at the `i32` limits.
    pub fn add_months(&self, delta: i32) -> Self {
        let total = self.linear_index() + delta as i64;
        let year = i32::try_from(total.div_euclid(12))
            .unwrap_or(if total < 0 { i32::MIN } else { i32::MAX });
        let month = (total.rem_euclid(12) + 1) as u8;
        Self { year, month }
    }

    /// First day of this month.
    pub fn first_day(&self) -> CalendarDate {
        CalendarDate {
            year: self.year,
            month: self.month,
            day: 1,
        }
    }

    /// Number of days in this month.
    pub fn len_days(&self) -> u8 {
        days_in_month(self.year, self.month)
    }

    /// Returns true when `date` falls in this month.
    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year == self.year && date.month == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", month_name(self.month), self.year)
    }
}

/// English month name for `month` (1-12).
pub fn month_name(month: u8) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 30,
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

fn days_from_civil(year: i32, month: u8, day: u8) -> i64 {
    let mut y = year as i64;
    let m = month as i64;
    let d = day as i64;
    y -= if m <= 2 { 1 } else { 0 };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = m + if m > 2 { -3 } else { 9 };
    let doy = (153 * mp + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = mp + if mp < 10 { 3 } else { -9 };
    let year = y + if month <= 2 { 1 } else { 0 };
    (year as i32, month as u8, day as u8)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn date(y: i32, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_components() {
        assert!(matches!(
            CalendarDate::new(2024, 13, 1),
            Err(DateError::InvalidMonth { month: 13 })
        ));
        assert!(matches!(
            CalendarDate::new(2023, 2, 29),
            Err(DateError::InvalidDay { max_day: 28, .. })
        ));
        assert!(CalendarDate::new(2024, 2, 29).is_ok());
        assert!(CalendarDate::new(2024, 1, 0).is_err());
    }

    #[rstest(
        input,
        expected,
        case("2024-01-05", (2024, 1, 5)),
        case(" 1999-12-31 ", (1999, 12, 31)),
        case("2000-2-29", (2000, 2, 29))
    )]
    fn test_parse_iso(input: &str, expected: (i32, u8, u8)) {
        let parsed: CalendarDate = input.parse().unwrap();
        assert_eq!(parsed, date(expected.0, expected.1, expected.2));
    }

    #[rstest(input, case(""), case("2024-01"), case("2024/01/05"), case("2023-02-29"))]
    fn test_parse_rejects(input: &str) {
        assert!(input.parse::<CalendarDate>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let d = date(987, 3, 4);
        assert_eq!(d.to_string(), "0987-03-04");
        assert_eq!(d.to_string().parse::<CalendarDate>().unwrap(), d);
    }

    #[test]
    fn test_day_arithmetic_crosses_boundaries() {
        assert_eq!(date(2024, 2, 28).succ(), date(2024, 2, 29));
        assert_eq!(date(2024, 2, 29).succ(), date(2024, 3, 1));
        assert_eq!(date(2024, 1, 1).pred(), date(2023, 12, 31));
        assert_eq!(date(2024, 3, 1).add_days(-366), date(2023, 3, 1));
    }

    #[test]
    fn test_epoch_conversions() {
        assert_eq!(date(1970, 1, 1).days_since_epoch(), 0);
        assert_eq!(CalendarDate::from_days_since_epoch(-1), date(1969, 12, 31));
        // 2024-01-05T23:59:59Z
        assert_eq!(
            CalendarDate::from_unix_seconds(1_704_499_199),
            date(2024, 1, 5)
        );
        assert_eq!(CalendarDate::from_unix_seconds(-1), date(1969, 12, 31));
    }

    #[rstest(
        y,
        m,
        d,
        expected,
        case(1970, 1, 1, Weekday::Thursday),
        case(2024, 1, 1, Weekday::Monday),
        case(2024, 2, 29, Weekday::Thursday),
        case(2000, 1, 1, Weekday::Saturday)
    )]
    fn test_weekday(y: i32, m: u8, d: u8, expected: Weekday) {
        assert_eq!(date(y, m, d).weekday(), expected);
    }

    #[test]
    fn test_weekday_index_wraps() {
        assert_eq!(Weekday::from_monday_index(-1), Weekday::Sunday);
        assert_eq!(Weekday::from_monday_index(7), Weekday::Monday);
        assert_eq!(Weekday::Sunday.index_from_monday(), 6);
        assert_eq!("Sun".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("funday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_year_month_navigation() {
        let dec = YearMonth::new(2023, 12).unwrap();
        assert_eq!(dec.add_months(1), YearMonth::new(2024, 1).unwrap());
        assert_eq!(dec.add_months(-12), YearMonth::new(2022, 12).unwrap());
        assert_eq!(
            dec.add_months(1).linear_index() - dec.linear_index(),
            1
        );
        assert_eq!(YearMonth::new(2024, 2).unwrap().len_days(), 29);
        assert_eq!(YearMonth::new(2024, 2).unwrap().to_string(), "February 2024");
        assert!(YearMonth::new(2024, 0).is_err());
    }

    #[test]
    fn test_add_months_near_type_limits() {
        let far = YearMonth::new(200_000_000, 12).unwrap();
        assert_eq!(far.add_months(1), YearMonth::new(200_000_001, 1).unwrap());
        let top = YearMonth::new(i32::MAX, 12).unwrap();
        assert_eq!(top.add_months(-1), YearMonth::new(i32::MAX, 11).unwrap());
        assert_eq!(top.add_months(1).year(), i32::MAX);
        let bottom = YearMonth::new(i32::MIN, 1).unwrap();
        assert_eq!(bottom.add_months(-1).year(), i32::MIN);
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2023));
    }
}
