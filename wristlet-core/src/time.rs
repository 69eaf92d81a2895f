//! Wall-clock time and strftime-style formatting
//!
//! The host clock reports local broken-down time; no timezone or locale
//! handling happens here. [`format_time`] supports the conversion
//! specifiers watch faces use:
//!
//! | code | output |
//! |---|---|
//! | `%H` `%I` `%M` `%S` | hour (24h), hour (12h), minute, second, zero-padded |
//! | `%p` | `AM` / `PM` |
//! | `%T` `%R` `%r` | `%H:%M:%S`, `%H:%M`, `%I:%M:%S %p` |
//! | `%Y` `%y` `%m` `%d` `%e` `%j` | year, 2-digit year, month, day, space-padded day, day of year |
//! | `%D` `%F` | `%m/%d/%y`, `%Y-%m-%d` |
//! | `%a` `%A` `%b` `%B` | short/long weekday and month names |
//! | `%%` | literal `%` |
//!
//! Unknown specifiers are copied through unchanged. Output that does not fit
//! the buffer is truncated.

use core::fmt::Write;
use heapless::String;

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Seconds in a day
const DAY_S: u64 = 86_400;

const MIN_YEAR: u16 = 1970;
const MAX_YEAR: u16 = 9999;

/// Broken-down local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallTime {
    pub year: u16,
    /// 1–12
    pub month: u8,
    /// 1–31
    pub day: u8,
    /// 0–23
    pub hour: u8,
    /// 0–59
    pub minute: u8,
    /// 0–59
    pub second: u8,
}

impl WallTime {
    /// Latest representable time; epoch conversions saturate here
    pub const MAX: WallTime = WallTime {
        year: MAX_YEAR,
        month: 12,
        day: 31,
        hour: 23,
        minute: 59,
        second: 59,
    };

    /// Build a validated time; returns `None` for impossible dates
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Option<Self> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year)
            || !(1..=12).contains(&month)
            || day == 0
            || day > days_in_month(year, month)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return None;
        }
        Some(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Convert seconds since 1970-01-01 00:00:00 (local)
    ///
    /// Times past [`WallTime::MAX`] saturate to it.
    pub fn from_epoch_seconds(secs: u64) -> Self {
        let rem = secs % DAY_S;
        let Some((year, month, day)) = civil_from_days(secs / DAY_S) else {
            return Self::MAX;
        };
        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Seconds since 1970-01-01 00:00:00 (local)
    pub fn to_epoch_seconds(&self) -> u64 {
        days_from_civil(self.year, self.month, self.day) * DAY_S
            + self.hour as u64 * 3600
            + self.minute as u64 * 60
            + self.second as u64
    }

    /// This time advanced by `secs` seconds
    pub fn plus_seconds(&self, secs: u64) -> Self {
        Self::from_epoch_seconds(self.to_epoch_seconds().saturating_add(secs))
    }

    /// 0 = Sunday
    pub fn weekday(&self) -> u8 {
        // 1970-01-01 was a Thursday
        ((days_from_civil(self.year, self.month, self.day) + 4) % 7) as u8
    }

    /// 1–366
    pub fn day_of_year(&self) -> u16 {
        let mut yday = self.day as u16;
        for m in 1..self.month {
            yday += days_in_month(self.year, m) as u16;
        }
        yday
    }

    /// Hour on a 12-hour clock, 1–12
    pub fn hour12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    pub fn is_pm(&self) -> bool {
        self.hour >= 12
    }
}

fn is_leap(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian date
fn days_from_civil(year: u16, month: u8, day: u8) -> u64 {
    let mut days = 0u64;
    for y in 1970..year {
        days += if is_leap(y) { 366 } else { 365 };
    }
    for m in 1..month {
        days += days_in_month(year, m) as u64;
    }
    (days + day as u64).saturating_sub(1)
}

/// Calendar date for a day count, or `None` past the last supported year
fn civil_from_days(mut days: u64) -> Option<(u16, u8, u8)> {
    let mut year = MIN_YEAR;
    loop {
        let len = if is_leap(year) { 366 } else { 365 };
        if days < len {
            break;
        }
        if year == MAX_YEAR {
            return None;
        }
        days -= len;
        year += 1;
    }
    let mut month = 1u8;
    loop {
        let len = days_in_month(year, month) as u64;
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    Some((year, month, days as u8 + 1))
}

/// Writer that silently drops whatever does not fit
struct Truncating<'a, const N: usize> {
    out: &'a mut String<N>,
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for c in s.chars() {
            if self.out.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Format `time` according to `format` into a fixed-capacity string
pub fn format_time<const N: usize>(format: &str, time: &WallTime) -> String<N> {
    let mut out = String::new();
    let mut w = Truncating { out: &mut out };
    write_time(&mut w, format, time);
    out
}

/// `None` for a month outside 1–12
fn month_name(t: &WallTime) -> Option<&'static str> {
    MONTHS.get(usize::from(t.month).checked_sub(1)?).copied()
}

fn write_time<W: Write>(w: &mut W, format: &str, t: &WallTime) {
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            let _ = w.write_char(c);
            continue;
        }
        let Some(code) = chars.next() else {
            let _ = w.write_char('%');
            break;
        };
        let _ = match code {
            'H' => write!(w, "{:02}", t.hour),
            'I' => write!(w, "{:02}", t.hour12()),
            'M' => write!(w, "{:02}", t.minute),
            'S' => write!(w, "{:02}", t.second),
            'p' => w.write_str(if t.is_pm() { "PM" } else { "AM" }),
            'T' => write!(w, "{:02}:{:02}:{:02}", t.hour, t.minute, t.second),
            'R' => write!(w, "{:02}:{:02}", t.hour, t.minute),
            'r' => write!(
                w,
                "{:02}:{:02}:{:02} {}",
                t.hour12(),
                t.minute,
                t.second,
                if t.is_pm() { "PM" } else { "AM" }
            ),
            'Y' => write!(w, "{}", t.year),
            'y' => write!(w, "{:02}", t.year % 100),
            'm' => write!(w, "{:02}", t.month),
            'd' => write!(w, "{:02}", t.day),
            'e' => write!(w, "{:>2}", t.day),
            'j' => write!(w, "{:03}", t.day_of_year()),
            'D' => write!(w, "{:02}/{:02}/{:02}", t.month, t.day, t.year % 100),
            'F' => write!(w, "{}-{:02}-{:02}", t.year, t.month, t.day),
            'a' => w.write_str(&WEEKDAYS[t.weekday() as usize][..3]),
            'A' => w.write_str(WEEKDAYS[t.weekday() as usize]),
            'b' => month_name(t).map_or(Ok(()), |name| w.write_str(&name[..3])),
            'B' => month_name(t).map_or(Ok(()), |name| w.write_str(name)),
            '%' => w.write_char('%'),
            other => w.write_char('%').and_then(|_| w.write_char(other)),
        };
    }
}
