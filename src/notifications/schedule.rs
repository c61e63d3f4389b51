//! Which reminders and calorie alerts are due. Pure functions of the settings,
//! the clock reading and today's evaluation.

use serde::Serialize;
use time::{Duration, OffsetDateTime, UtcOffset};

use super::settings::{NotificationSettings, ReminderTime};
use crate::nutrition::{Band, DayKey, Evaluation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledReminder {
    pub time: ReminderTime,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    GoalAchieved,
    HighCalories,
    LowCalories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieAlert {
    pub kind: AlertKind,
    pub calories: i64,
    pub goal: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pending {
    pub day: DayKey,
    pub reminders: Vec<ScheduledReminder>,
    pub alerts: Vec<CalorieAlert>,
}

/// Next occurrence of each reminder strictly after `now`, earliest first.
pub fn next_reminders(
    settings: &NotificationSettings,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Vec<ScheduledReminder> {
    if !settings.meal_reminders {
        return Vec::new();
    }
    let local = now.to_offset(offset);
    let mut out: Vec<_> = settings
        .meal_reminder_times
        .iter()
        .map(|&time| {
            let today = local.replace_time(time.time());
            let at = if today > local {
                today
            } else {
                today + Duration::days(1)
            };
            ScheduledReminder { time, at }
        })
        .collect();
    out.sort_by_key(|r| r.at);
    out
}

/// Alerts for today's intake. A day without records raises nothing.
pub fn calorie_alerts(
    settings: &NotificationSettings,
    calories: f64,
    goal: u32,
    evaluation: &Evaluation,
) -> Vec<CalorieAlert> {
    let alert = |kind| CalorieAlert {
        kind,
        calories: calories.round() as i64,
        goal,
        percentage: evaluation.percentage,
    };

    let mut out = Vec::new();
    if settings.goal_achievement_notifications && evaluation.achieved {
        out.push(alert(AlertKind::GoalAchieved));
    }
    match evaluation.band {
        Band::Excess if settings.high_calorie_warnings => out.push(alert(AlertKind::HighCalories)),
        Band::Deficit if settings.low_calorie_warnings => out.push(alert(AlertKind::LowCalories)),
        _ => {}
    }
    out
}

pub fn pending(
    settings: &NotificationSettings,
    now: OffsetDateTime,
    offset: UtcOffset,
    calories: f64,
    goal: u32,
    evaluation: &Evaluation,
) -> Pending {
    Pending {
        day: DayKey::from_timestamp(now, offset),
        reminders: next_reminders(settings, now, offset),
        alerts: calorie_alerts(settings, calories, goal, evaluation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::{evaluate, GoalThresholds, GoalType};
    use time::macros::{datetime, offset};

    fn reminders_on() -> NotificationSettings {
        NotificationSettings {
            meal_reminders: true,
            ..NotificationSettings::default()
        }
    }

    #[test]
    fn reminders_roll_over_to_tomorrow_once_passed() {
        // 12:00 sharp local: noon is not strictly ahead any more.
        let now = datetime!(2024-03-10 03:00 UTC);
        let got = next_reminders(&reminders_on(), now, offset!(+9));
        let at: Vec<_> = got.iter().map(|r| r.at).collect();
        assert_eq!(
            at,
            [
                datetime!(2024-03-10 18:00 +9),
                datetime!(2024-03-11 08:00 +9),
                datetime!(2024-03-11 12:00 +9),
            ]
        );
        assert!(got.iter().all(|r| r.at > now));
    }

    #[test]
    fn reminders_off_schedules_nothing() {
        let got = next_reminders(&NotificationSettings::default(), datetime!(2024-03-10 00:00 UTC), UtcOffset::UTC);
        assert!(got.is_empty());
    }

    #[test]
    fn alerts_follow_the_band() {
        let t = GoalThresholds::default();
        let settings = NotificationSettings::default();

        let on = evaluate(&t, 1900.0, 2000.0, GoalType::Maintain).unwrap();
        let kinds: Vec<_> = calorie_alerts(&settings, 1900.0, 2000, &on).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [AlertKind::GoalAchieved]);

        let over = evaluate(&t, 1850.0, 2000.0, GoalType::WeightLoss).unwrap();
        let kinds: Vec<_> = calorie_alerts(&settings, 1850.0, 2000, &over).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [AlertKind::HighCalories]);

        let under = evaluate(&t, 1000.0, 2000.0, GoalType::WeightGain).unwrap();
        let kinds: Vec<_> = calorie_alerts(&settings, 1000.0, 2000, &under).iter().map(|a| a.kind).collect();
        assert_eq!(kinds, [AlertKind::LowCalories]);
    }

    #[test]
    fn disabled_alerts_and_empty_days_stay_quiet() {
        let t = GoalThresholds::default();
        let quiet = NotificationSettings {
            high_calorie_warnings: false,
            ..NotificationSettings::default()
        };
        let over = evaluate(&t, 3000.0, 2000.0, GoalType::Maintain).unwrap();
        assert!(calorie_alerts(&quiet, 3000.0, 2000, &over).is_empty());

        let nothing = evaluate(&t, 0.0, 2000.0, GoalType::WeightGain).unwrap();
        assert!(calorie_alerts(&NotificationSettings::default(), 0.0, 2000, &nothing).is_empty());
    }

    #[test]
    fn pending_uses_the_local_day() {
        let t = GoalThresholds::default();
        let eval = evaluate(&t, 0.0, 2000.0, GoalType::Maintain).unwrap();
        let p = pending(
            &reminders_on(),
            datetime!(2024-03-10 23:30 UTC),
            offset!(+9),
            0.0,
            2000,
            &eval,
        );
        assert_eq!(p.day.to_string(), "2024-03-11");
        assert_eq!(p.reminders[0].at, datetime!(2024-03-11 12:00 +9));
    }
}
