use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{macros::format_description, Date, Duration, OffsetDateTime, UtcOffset};

/// One local calendar day. Every timestamp that falls inside the same local
/// day (for a given UTC offset) maps to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(Date);

impl DayKey {
    pub fn new(date: Date) -> Self {
        Self(date)
    }

    /// Truncates `at` to its calendar day as seen from `offset`.
    pub fn from_timestamp(at: OffsetDateTime, offset: UtcOffset) -> Self {
        Self(at.to_offset(offset).date())
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn days_before(self, days: i64) -> Option<Self> {
        self.0.checked_sub(Duration::days(days)).map(Self)
    }

    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    /// First instant of this day in `offset`.
    pub fn start_at(self, offset: UtcOffset) -> OffsetDateTime {
        self.0.midnight().assume_offset(offset)
    }

    /// Half-open `[start, end)` instant range covering this day in `offset`.
    /// `None` for the last representable day, whose end has no instant.
    pub fn bounds(self, offset: UtcOffset) -> Option<(OffsetDateTime, OffsetDateTime)> {
        let start = self.start_at(offset);
        let end = start.checked_add(Duration::days(1))?;
        Some((start, end))
    }

    /// Short English weekday label, e.g. `Mon`.
    pub fn weekday_label(self) -> &'static str {
        use time::Weekday::*;
        match self.0.weekday() {
            Monday => "Mon",
            Tuesday => "Tue",
            Wednesday => "Wed",
            Thursday => "Thu",
            Friday => "Fri",
            Saturday => "Sat",
            Sunday => "Sun",
        }
    }
}

impl From<Date> for DayKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for DayKey {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Date::parse(s.trim(), format_description!("[year]-[month]-[day]")).map(Self)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn same_local_day_maps_to_same_key() {
        let tokyo = offset!(+9);
        let morning = datetime!(2024-03-09 23:30 UTC); // 08:30 on the 10th in Tokyo
        let evening = datetime!(2024-03-10 12:00 UTC); // 21:00 on the 10th in Tokyo
        assert_eq!(
            DayKey::from_timestamp(morning, tokyo),
            DayKey::from_timestamp(evening, tokyo)
        );
        assert_eq!(DayKey::from_timestamp(morning, tokyo).date(), date!(2024 - 03 - 10));
    }

    #[test]
    fn offset_changes_the_day() {
        let at = datetime!(2024-03-09 23:30 UTC);
        assert_eq!(DayKey::from_timestamp(at, UtcOffset::UTC).to_string(), "2024-03-09");
        assert_eq!(DayKey::from_timestamp(at, offset!(+9)).to_string(), "2024-03-10");
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let key: DayKey = "2024-02-29".parse().unwrap();
        assert_eq!(key.date(), date!(2024 - 02 - 29));
        assert_eq!(key.to_string(), "2024-02-29");
        assert!("2024-13-01".parse::<DayKey>().is_err());
        assert!("yesterday".parse::<DayKey>().is_err());
    }

    #[test]
    fn serde_uses_iso_string() {
        let key = DayKey::new(date!(2024 - 03 - 04));
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2024-03-04\"");
        let back: DayKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn bounds_cover_one_local_day() {
        let key = DayKey::new(date!(2024 - 03 - 10));
        let (start, end) = key.bounds(offset!(+9)).unwrap();
        assert_eq!(start, datetime!(2024-03-09 15:00 UTC));
        assert_eq!(end, datetime!(2024-03-10 15:00 UTC));
    }

    #[test]
    fn ordering_follows_the_calendar() {
        let a = DayKey::new(date!(2023 - 12 - 31));
        let b = DayKey::new(date!(2024 - 01 - 01));
        assert!(a < b);
        assert_eq!(b.days_before(1), Some(a));
        assert_eq!(a.next(), Some(b));
        assert_eq!(b.weekday_label(), "Mon");
    }

    #[test]
    fn last_representable_day_has_no_bounds() {
        let last: DayKey = "9999-12-31".parse().unwrap();
        assert_eq!(last.bounds(UtcOffset::UTC), None);
        assert_eq!(last.bounds(offset!(-5)), None);
        assert_eq!(last.next(), None);

        let (_, end) = last.days_before(1).unwrap().bounds(UtcOffset::UTC).unwrap();
        assert_eq!(end, datetime!(9999-12-31 00:00 UTC));
    }
}
