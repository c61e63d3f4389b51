use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::{macros::format_description, Time};

/// Wall-clock reminder time, written `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReminderTime(Time);

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        Time::from_hms(hour, minute, 0).ok().map(Self)
    }

    pub fn time(self) -> Time {
        self.0
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for ReminderTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Time::parse(s.trim(), format_description!("[hour]:[minute]"))
            .map(Self)
            .map_err(|_| format!("reminder time {s:?} is not HH:MM"))
    }
}

impl Serialize for ReminderTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReminderTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-user notification preferences, stored as JSON on the user row.
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub meal_reminders: bool,
    pub meal_reminder_times: Vec<ReminderTime>,
    pub goal_achievement_notifications: bool,
    pub weekly_reports: bool,
    pub low_calorie_warnings: bool,
    pub high_calorie_warnings: bool,
}

pub const MAX_REMINDERS: usize = 12;

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            meal_reminders: false,
            meal_reminder_times: [(8, 0), (12, 0), (18, 0)]
                .into_iter()
                .filter_map(|(h, m)| ReminderTime::new(h, m))
                .collect(),
            goal_achievement_notifications: true,
            weekly_reports: false,
            low_calorie_warnings: true,
            high_calorie_warnings: true,
        }
    }
}

impl NotificationSettings {
    /// Sorts and dedups reminder times; rejects oversized lists.
    pub fn normalized(mut self) -> Result<Self, String> {
        self.meal_reminder_times.sort();
        self.meal_reminder_times.dedup();
        if self.meal_reminder_times.len() > MAX_REMINDERS {
            return Err(format!("at most {MAX_REMINDERS} reminder times"));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let s: NotificationSettings = serde_json::from_str(r#"{"meal_reminders":true}"#).unwrap();
        assert!(s.meal_reminders);
        assert!(s.goal_achievement_notifications);
        assert!(!s.weekly_reports);
        let times: Vec<String> = s.meal_reminder_times.iter().map(ToString::to_string).collect();
        assert_eq!(times, ["08:00", "12:00", "18:00"]);
    }

    #[test]
    fn malformed_times_are_rejected() {
        for bad in ["25:00", "7am", "12:60", ""] {
            let json = format!(r#"{{"meal_reminder_times":["{bad}"]}}"#);
            assert!(
                serde_json::from_str::<NotificationSettings>(&json).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn normalized_sorts_and_dedups() {
        let s: NotificationSettings =
            serde_json::from_str(r#"{"meal_reminder_times":["19:30","07:05","19:30"]}"#).unwrap();
        let s = s.normalized().unwrap();
        assert_eq!(
            serde_json::to_value(&s.meal_reminder_times).unwrap(),
            serde_json::json!(["07:05", "19:30"])
        );
    }

    #[test]
    fn too_many_reminders_are_rejected() {
        let s = NotificationSettings {
            meal_reminder_times: (0..=MAX_REMINDERS as u8)
                .filter_map(|h| ReminderTime::new(h, 0))
                .collect(),
            ..NotificationSettings::default()
        };
        assert!(s.normalized().is_err());
    }
}
