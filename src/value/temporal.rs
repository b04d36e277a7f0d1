use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use chrono::{DateTime as ChronoDateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};

use crate::error::{Error, Result};
use crate::tz::{self, TimeZone};
use crate::value::Value;
use crate::zinc::ZincReader;

/// Calendar date. Components are range-checked, not calendar-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    // field order gives the derived year, month, day ordering
    year: i32,
    month: u32,
    day: u32,
}

impl Date {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if year < 1900 {
            return Err(Error::invalid_value(format!("Invalid year: {year}")));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_value(format!("Invalid month: {month}")));
        }
        if !(1..=31).contains(&day) {
            return Err(Error::invalid_value(format!("Invalid day: {day}")));
        }
        Ok(Date { year, month, day })
    }

    pub fn parse(s: &str) -> Result<Self> {
        match ZincReader::new(s).read_scalar()? {
            Some(Value::Date(d)) => Ok(d),
            _ => Err(Error::invalid_value(format!("Invalid date: {s:?}"))),
        }
    }

    pub fn today() -> Self {
        *DateTime::now().date()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Time of day with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Time {
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
}

impl Time {
    pub const MIDNIGHT: Time = Time { hour: 0, minute: 0, second: 0, millis: 0 };

    pub fn new(hour: u32, minute: u32, second: u32, millis: u32) -> Result<Self> {
        if hour > 23 {
            return Err(Error::invalid_value(format!("Invalid hour: {hour}")));
        }
        if minute > 59 {
            return Err(Error::invalid_value(format!("Invalid min: {minute}")));
        }
        if second > 59 {
            return Err(Error::invalid_value(format!("Invalid sec: {second}")));
        }
        if millis > 999 {
            return Err(Error::invalid_value(format!("Invalid ms: {millis}")));
        }
        Ok(Time { hour, minute, second, millis })
    }

    pub fn hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        Self::new(hour, minute, second, 0)
    }

    pub fn parse(s: &str) -> Result<Self> {
        match ZincReader::new(s).read_scalar()? {
            Some(Value::Time(t)) => Ok(t),
            _ => Err(Error::invalid_value(format!("Invalid time: {s:?}"))),
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    pub fn millis(&self) -> u32 {
        self.millis
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.millis != 0 {
            let ms = format!("{:03}", self.millis);
            write!(f, ".{}", ms.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

/// Date and time in a named zone with an explicit UTC offset.
///
/// Structural equality compares date, time, zone and offset; ordering
/// compares the absolute instant, so two values in different zones can be
/// unequal yet order as equal.
#[derive(Debug, Clone)]
pub struct DateTime {
    date: Date,
    time: Time,
    tz: TimeZone,
    offset: i32,
    epoch_millis: OnceLock<i64>,
}

impl DateTime {
    /// Build from explicit parts. The offset is not checked against the
    /// zone's rules, but must be a whole number of minutes since only
    /// hours and minutes are written out.
    pub fn new(date: Date, time: Time, tz: TimeZone, offset_secs: i32) -> Result<Self> {
        if offset_secs % 60 != 0 {
            return Err(Error::invalid_value(format!("Invalid tz offset: {offset_secs}")));
        }
        Ok(Self::from_parts(date, time, tz, offset_secs))
    }

    fn from_parts(date: Date, time: Time, tz: TimeZone, offset_secs: i32) -> Self {
        DateTime {
            date,
            time,
            tz,
            offset: offset_secs,
            epoch_millis: OnceLock::new(),
        }
    }

    /// Build from a wall-clock time, computing the offset from the zone.
    pub fn in_zone(date: Date, time: Time, tz: TimeZone) -> Self {
        let offset = naive(&date, &time)
            .map(|local| tz.offset_at_local(local))
            .unwrap_or_else(|| tz.std_offset());
        Self::from_parts(date, time, tz, whole_minutes(offset))
    }

    /// Build from epoch milliseconds, rendered in `tz`.
    pub fn from_millis(epoch_millis: i64, tz: TimeZone) -> Result<Self> {
        let offset = whole_minutes(tz.offset_at_utc(epoch_millis));
        let local = ChronoDateTime::<Utc>::from_timestamp_millis(
            epoch_millis + i64::from(offset) * 1000,
        )
        .ok_or_else(|| Error::invalid_value(format!("Invalid epoch millis: {epoch_millis}")))?
        .naive_utc();
        let date = Date::new(local.year(), local.month(), local.day())?;
        let time = Time::new(
            local.hour(),
            local.minute(),
            local.second(),
            local.nanosecond() / 1_000_000 % 1000,
        )?;
        let dt = Self::from_parts(date, time, tz, offset);
        let _ = dt.epoch_millis.set(epoch_millis);
        Ok(dt)
    }

    /// Current instant in the process default zone.
    pub fn now() -> Self {
        Self::now_in(tz::default_zone().clone())
    }

    pub fn now_in(tz: TimeZone) -> Self {
        let millis = Utc::now().timestamp_millis();
        Self::from_millis(millis, tz.clone())
            .unwrap_or_else(|_| Self::from_parts(Date::unix_epoch(), Time::MIDNIGHT, tz, 0))
    }

    pub fn parse(s: &str) -> Result<Self> {
        match ZincReader::new(s).read_scalar()? {
            Some(Value::DateTime(dt)) => Ok(dt),
            _ => Err(Error::invalid_value(format!("Invalid date time: {s:?}"))),
        }
    }

    pub fn date(&self) -> &Date {
        &self.date
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn tz(&self) -> &TimeZone {
        &self.tz
    }

    /// Offset from UTC in seconds.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Milliseconds since the Unix epoch, computed on first use.
    pub fn epoch_millis(&self) -> i64 {
        *self.epoch_millis.get_or_init(|| {
            let local = naive(&self.date, &self.time)
                .map(|dt| dt.and_utc().timestamp_millis())
                .unwrap_or_default();
            local - i64::from(self.offset) * 1000
        })
    }
}

impl Date {
    fn unix_epoch() -> Self {
        Date { year: 1970, month: 1, day: 1 }
    }
}

// Day 31 of a 30-day month is a valid Date but not a valid chrono date;
// such values roll over into the next month.
fn naive(date: &Date, time: &Time) -> Option<NaiveDateTime> {
    let first = NaiveDate::from_ymd_opt(date.year, date.month, 1)?;
    let day = first.checked_add_days(chrono::Days::new(u64::from(date.day - 1)))?;
    day.and_hms_milli_opt(time.hour, time.minute, time.second, time.millis)
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
            && self.time == other.time
            && self.tz.name() == other.tz.name()
            && self.offset == other.offset
    }
}

impl Eq for DateTime {}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
        self.time.hash(state);
        self.tz.name().hash(state);
        self.offset.hash(state);
    }
}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.epoch_millis().cmp(&other.epoch_millis()))
    }
}

// Local mean time offsets before standardisation carry seconds.
fn whole_minutes(offset_secs: i32) -> i32 {
    offset_secs / 60 * 60
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        if self.offset == 0 {
            f.write_str("Z")?;
        } else {
            let sign = if self.offset < 0 { '-' } else { '+' };
            let abs = self.offset.unsigned_abs();
            write!(f, "{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60)?;
        }
        write!(f, " {}", self.tz)
    }
}
