use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ValueError;

const SECONDS_PER_DAY: i64 = 86_400;

/// A textual timestamp layout accepted by time flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLayout {
    /// `2006-01-02T15:04:05Z07:00`, fractional seconds allowed.
    Rfc3339,
    /// `2006-01-02T15:04:05.999999999Z07:00`.
    Rfc3339Nano,
    /// `2006-01-02 15:04:05`, in UTC.
    DateTime,
    /// `2006-01-02`, midnight UTC.
    DateOnly,
}

impl TimeLayout {
    /// The reference rendering of this layout.
    pub fn pattern(&self) -> &'static str {
        match self {
            TimeLayout::Rfc3339 => "2006-01-02T15:04:05Z07:00",
            TimeLayout::Rfc3339Nano => "2006-01-02T15:04:05.999999999Z07:00",
            TimeLayout::DateTime => "2006-01-02 15:04:05",
            TimeLayout::DateOnly => "2006-01-02",
        }
    }

    fn parse(&self, text: &str) -> Option<Timestamp> {
        let mut cursor = Cursor::new(text);
        let (year, month, day) = cursor.date()?;
        let mut seconds = days_from_civil(year, month, day) * SECONDS_PER_DAY;
        let mut nanos = 0;

        match self {
            TimeLayout::DateOnly => {}
            TimeLayout::DateTime => {
                cursor.expect(b' ')?;
                seconds += cursor.clock()?;
            }
            TimeLayout::Rfc3339 | TimeLayout::Rfc3339Nano => {
                cursor.expect(b'T')?;
                seconds += cursor.clock()?;
                nanos = cursor.fraction()?;
                seconds -= cursor.offset()?;
            }
        }

        cursor.finished()?;
        Some(Timestamp { seconds, nanos })
    }
}

impl fmt::Display for TimeLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern())
    }
}

/// Try each layout in order.
pub(crate) fn parse_time(raw: &str, layouts: &[TimeLayout]) -> Result<SystemTime, ValueError> {
    let trimmed = raw.trim();

    for layout in layouts {
        if let Some(timestamp) = layout.parse(trimmed) {
            return timestamp.to_system_time().ok_or_else(|| {
                ValueError::Message(format!("time '{trimmed}' is out of range"))
            });
        }
    }

    let patterns = layouts
        .iter()
        .map(|layout| layout.pattern())
        .collect::<Vec<&str>>()
        .join("', '");
    Err(ValueError::Message(format!(
        "invalid time format '{trimmed}' must be one of: '{patterns}'"
    )))
}

/// Render as RFC 3339 in UTC, with trailing zeros of the fraction removed.
pub(crate) fn format_time(time: &SystemTime) -> String {
    let Timestamp { seconds, nanos } = Timestamp::from_system_time(time);
    let (year, month, day) = civil_from_days(seconds.div_euclid(SECONDS_PER_DAY));
    let clock = seconds.rem_euclid(SECONDS_PER_DAY);
    let mut out = format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}",
        clock / 3_600,
        (clock / 60) % 60,
        clock % 60
    );

    if nanos > 0 {
        let digits = format!("{nanos:09}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }

    out.push('Z');
    out
}

// Seconds relative to the unix epoch, with the nanoseconds always counting forward.
#[derive(Debug, PartialEq)]
struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    fn from_system_time(time: &SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self {
                seconds: after.as_secs() as i64,
                nanos: after.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();

                if before.subsec_nanos() == 0 {
                    Self {
                        seconds: -(before.as_secs() as i64),
                        nanos: 0,
                    }
                } else {
                    Self {
                        seconds: -(before.as_secs() as i64) - 1,
                        nanos: 1_000_000_000 - before.subsec_nanos(),
                    }
                }
            }
        }
    }

    fn to_system_time(&self) -> Option<SystemTime> {
        let fraction = Duration::from_nanos(u64::from(self.nanos));

        if self.seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::from_secs(self.seconds as u64) + fraction)
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))
                .and_then(|time| time.checked_add(fraction))
        }
    }
}

struct Cursor<'a> {
    text: &'a [u8],
    at: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text: text.as_bytes(),
            at: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.text.get(self.at).copied()
    }

    fn expect(&mut self, byte: u8) -> Option<()> {
        if self.peek()? == byte {
            self.at += 1;
            Some(())
        } else {
            None
        }
    }

    fn number(&mut self, width: usize) -> Option<i64> {
        let end = self.at + width;
        let digits = self.text.get(self.at..end)?;

        if !digits.iter().all(u8::is_ascii_digit) {
            return None;
        }

        self.at = end;
        Some(
            digits
                .iter()
                .fold(0, |total, digit| total * 10 + i64::from(digit - b'0')),
        )
    }

    fn date(&mut self) -> Option<(i64, i64, i64)> {
        let year = self.number(4)?;
        self.expect(b'-')?;
        let month = self.number(2)?;
        self.expect(b'-')?;
        let day = self.number(2)?;

        if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
            return None;
        }

        Some((year, month, day))
    }

    fn clock(&mut self) -> Option<i64> {
        let hour = self.number(2)?;
        self.expect(b':')?;
        let minute = self.number(2)?;
        self.expect(b':')?;
        let second = self.number(2)?;

        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }

        Some(hour * 3_600 + minute * 60 + second)
    }

    fn fraction(&mut self) -> Option<u32> {
        if self.peek() != Some(b'.') {
            return Some(0);
        }

        self.at += 1;
        let start = self.at;

        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.at += 1;
        }

        let digits = &self.text[start..self.at];

        if digits.is_empty() || digits.len() > 9 {
            return None;
        }

        let value = digits
            .iter()
            .fold(0u32, |total, digit| total * 10 + u32::from(digit - b'0'));
        Some(value * 10u32.pow(9 - digits.len() as u32))
    }

    fn offset(&mut self) -> Option<i64> {
        let sign = match self.peek()? {
            b'Z' => {
                self.at += 1;
                return Some(0);
            }
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        self.at += 1;
        let hours = self.number(2)?;
        self.expect(b':')?;
        let minutes = self.number(2)?;

        if hours > 23 || minutes > 59 {
            return None;
        }

        Some(sign * (hours * 3_600 + minutes * 60))
    }

    fn finished(&self) -> Option<()> {
        if self.at == self.text.len() {
            Some(())
        } else {
            None
        }
    }
}

fn is_leap(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

// Days since 1970-01-01 of a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let year_of_era = year - era * 400;
    let month_index = (month + 9) % 12;
    let day_of_year = (153 * month_index + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
    era * 146_097 + day_of_era - 719_468
}

fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let days = days + 719_468;
    let era = days.div_euclid(146_097);
    let day_of_era = days - era * 146_097;
    let year_of_era =
        (day_of_era - day_of_era / 1_460 + day_of_era / 36_524 - day_of_era / 146_096) / 365;
    let day_of_year = day_of_era - (365 * year_of_era + year_of_era / 4 - year_of_era / 100);
    let month_index = (5 * day_of_year + 2) / 153;
    let day = day_of_year - (153 * month_index + 2) / 5 + 1;
    let month = if month_index < 10 {
        month_index + 3
    } else {
        month_index - 9
    };
    let year = year_of_era + era * 400;

    if month <= 2 {
        (year + 1, month, day)
    } else {
        (year, month, day)
    }
}
