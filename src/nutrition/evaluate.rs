//! Calorie goal evaluation.
//!
//! A day's intake is expressed as a percentage of the daily calorie goal and
//! classified into a [`Band`]. Which percentages count as good depends on the
//! user's [`GoalType`]; the boundaries live in [`GoalThresholds`] so they can be
//! tuned through configuration.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::NutritionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    Maintain,
    WeightLoss,
    WeightGain,
}

impl GoalType {
    pub fn as_str(self) -> &'static str {
        match self {
            GoalType::Maintain => "maintain",
            GoalType::WeightLoss => "weight_loss",
            GoalType::WeightGain => "weight_gain",
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalType {
    type Err = NutritionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "maintain" => Ok(GoalType::Maintain),
            "weight_loss" => Ok(GoalType::WeightLoss),
            "weight_gain" => Ok(GoalType::WeightGain),
            other => Err(NutritionError::InvalidGoalConfig(format!(
                "unknown goal type {other:?}"
            ))),
        }
    }
}

/// How a day's intake relates to the goal. Labels and colours are chosen by
/// the presentation layer per goal type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    OnTarget,
    NearTarget,
    Excess,
    Deficit,
    HasData,
    NoData,
}

/// Inclusive percentage interval; `max: None` is unbounded above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
}

impl PercentRange {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, pct: f64) -> bool {
        pct >= self.min && self.max.map_or(true, |max| pct <= max)
    }
}

/// Band boundaries for one goal type.
///
/// Checked in order: on target, excess (`pct > excess_above`), deficit
/// (`pct < deficit_below`), near target. Anything left over with a positive
/// percentage is `HasData`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPolicy {
    pub on_target: PercentRange,
    #[serde(default)]
    pub near_target: Vec<PercentRange>,
    #[serde(default)]
    pub excess_above: Option<f64>,
    #[serde(default)]
    pub deficit_below: Option<f64>,
}

impl BandPolicy {
    pub fn classify(&self, pct: f64) -> Band {
        if pct <= 0.0 {
            return Band::NoData;
        }
        if self.on_target.contains(pct) {
            return Band::OnTarget;
        }
        if self.excess_above.is_some_and(|limit| pct > limit) {
            return Band::Excess;
        }
        if self.deficit_below.is_some_and(|limit| pct < limit) {
            return Band::Deficit;
        }
        if self.near_target.iter().any(|r| r.contains(pct)) {
            return Band::NearTarget;
        }
        Band::HasData
    }

    pub fn achieved(&self, pct: f64) -> bool {
        pct > 0.0 && self.on_target.contains(pct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalThresholds {
    pub maintain: BandPolicy,
    pub weight_loss: BandPolicy,
    pub weight_gain: BandPolicy,
}

impl Default for GoalThresholds {
    fn default() -> Self {
        Self {
            maintain: BandPolicy {
                on_target: PercentRange::between(90.0, 110.0),
                near_target: vec![
                    PercentRange::between(80.0, 90.0),
                    PercentRange::between(110.0, 120.0),
                ],
                excess_above: Some(120.0),
                deficit_below: None,
            },
            weight_loss: BandPolicy {
                on_target: PercentRange::between(70.0, 90.0),
                near_target: vec![PercentRange::between(60.0, 70.0)],
                excess_above: Some(90.0),
                deficit_below: None,
            },
            weight_gain: BandPolicy {
                on_target: PercentRange::at_least(110.0),
                near_target: vec![PercentRange::between(90.0, 110.0)],
                excess_above: None,
                deficit_below: Some(70.0),
            },
        }
    }
}

impl GoalThresholds {
    pub fn policy(&self, goal_type: GoalType) -> &BandPolicy {
        match goal_type {
            GoalType::Maintain => &self.maintain,
            GoalType::WeightLoss => &self.weight_loss,
            GoalType::WeightGain => &self.weight_gain,
        }
    }

    /// Rejects policies whose bounds are not finite, ordered percentages.
    pub fn validate(&self) -> Result<(), NutritionError> {
        for goal_type in [GoalType::Maintain, GoalType::WeightLoss, GoalType::WeightGain] {
            let policy = self.policy(goal_type);
            let ranges = std::iter::once(&policy.on_target).chain(policy.near_target.iter());
            for range in ranges {
                let ordered = range.max.map_or(true, |max| max >= range.min);
                let finite = range.min.is_finite() && range.max.map_or(true, f64::is_finite);
                if !ordered || !finite || range.min < 0.0 {
                    return Err(NutritionError::InvalidGoalConfig(format!(
                        "{goal_type}: bad percentage range {range:?}"
                    )));
                }
            }
            for limit in [policy.excess_above, policy.deficit_below].into_iter().flatten() {
                if !limit.is_finite() || limit < 0.0 {
                    return Err(NutritionError::InvalidGoalConfig(format!(
                        "{goal_type}: bad limit {limit}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A validated daily calorie goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailyGoal(f64);

impl DailyGoal {
    pub fn new(kcal: f64) -> Result<Self, NutritionError> {
        if !kcal.is_finite() || kcal <= 0.0 {
            return Err(NutritionError::InvalidGoalConfig(format!(
                "daily calorie goal must be positive, got {kcal}"
            )));
        }
        Ok(Self(kcal))
    }

    pub fn percentage_of(self, calories: f64) -> f64 {
        calories * 100.0 / self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub percentage: f64,
    pub band: Band,
    pub achieved: bool,
}

/// Intake as a percentage of the goal, after checking both inputs.
fn checked_percentage(calories_consumed: f64, daily_goal: f64) -> Result<f64, NutritionError> {
    let goal = DailyGoal::new(daily_goal)?;
    if !calories_consumed.is_finite() || calories_consumed < 0.0 {
        return Err(NutritionError::InvalidRecord(format!(
            "calories consumed must be a non-negative number, got {calories_consumed}"
        )));
    }
    Ok(goal.percentage_of(calories_consumed))
}

/// Classifies `calories_consumed` against `daily_goal` for `goal_type`.
pub fn classify(
    thresholds: &GoalThresholds,
    calories_consumed: f64,
    daily_goal: f64,
    goal_type: GoalType,
) -> Result<Band, NutritionError> {
    let pct = checked_percentage(calories_consumed, daily_goal)?;
    Ok(thresholds.policy(goal_type).classify(pct))
}

/// Whether the day earns the achievement marker.
pub fn is_achieved(
    thresholds: &GoalThresholds,
    calories_consumed: f64,
    daily_goal: f64,
    goal_type: GoalType,
) -> Result<bool, NutritionError> {
    let pct = checked_percentage(calories_consumed, daily_goal)?;
    Ok(thresholds.policy(goal_type).achieved(pct))
}

pub fn evaluate(
    thresholds: &GoalThresholds,
    calories_consumed: f64,
    daily_goal: f64,
    goal_type: GoalType,
) -> Result<Evaluation, NutritionError> {
    Ok(Evaluation {
        percentage: checked_percentage(calories_consumed, daily_goal)?,
        band: classify(thresholds, calories_consumed, daily_goal, goal_type)?,
        achieved: is_achieved(thresholds, calories_consumed, daily_goal, goal_type)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(calories: f64, goal_type: GoalType) -> Band {
        classify(&GoalThresholds::default(), calories, 2000.0, goal_type).unwrap()
    }

    #[test]
    fn maintain_at_95_percent_is_on_target_and_achieved() {
        let eval = evaluate(&GoalThresholds::default(), 1900.0, 2000.0, GoalType::Maintain).unwrap();
        assert_eq!(eval.percentage, 95.0);
        assert_eq!(eval.band, Band::OnTarget);
        assert!(eval.achieved);
    }

    #[test]
    fn weight_loss_above_ceiling_is_excess() {
        let eval =
            evaluate(&GoalThresholds::default(), 1850.0, 2000.0, GoalType::WeightLoss).unwrap();
        assert_eq!(eval.percentage, 92.5);
        assert_eq!(eval.band, Band::Excess);
        assert!(!eval.achieved);
    }

    #[test]
    fn zero_intake_is_no_data_for_every_goal_type() {
        for goal_type in [GoalType::Maintain, GoalType::WeightLoss, GoalType::WeightGain] {
            assert_eq!(band(0.0, goal_type), Band::NoData);
            assert!(!is_achieved(&GoalThresholds::default(), 0.0, 2000.0, goal_type).unwrap());
        }
    }

    #[test]
    fn maintain_bands() {
        use GoalType::Maintain;
        assert_eq!(band(1000.0, Maintain), Band::HasData); // 50%
        assert_eq!(band(1600.0, Maintain), Band::NearTarget); // 80%
        assert_eq!(band(1700.0, Maintain), Band::NearTarget); // 85%
        assert_eq!(band(1800.0, Maintain), Band::OnTarget); // 90%
        assert_eq!(band(2200.0, Maintain), Band::OnTarget); // 110%
        assert_eq!(band(2300.0, Maintain), Band::NearTarget); // 115%
        assert_eq!(band(2400.0, Maintain), Band::NearTarget); // 120%
        assert_eq!(band(2500.0, Maintain), Band::Excess); // 125%
    }

    #[test]
    fn weight_loss_bands() {
        use GoalType::WeightLoss;
        assert_eq!(band(600.0, WeightLoss), Band::HasData); // 30%
        assert_eq!(band(1300.0, WeightLoss), Band::NearTarget); // 65%
        assert_eq!(band(1400.0, WeightLoss), Band::OnTarget); // 70%
        assert_eq!(band(1800.0, WeightLoss), Band::OnTarget); // 90%
        assert_eq!(band(1900.0, WeightLoss), Band::Excess); // 95%
    }

    #[test]
    fn weight_gain_bands() {
        use GoalType::WeightGain;
        assert_eq!(band(1000.0, WeightGain), Band::Deficit); // 50%
        assert_eq!(band(1500.0, WeightGain), Band::HasData); // 75%
        assert_eq!(band(2000.0, WeightGain), Band::NearTarget); // 100%
        assert_eq!(band(2200.0, WeightGain), Band::OnTarget); // 110%
        assert_eq!(band(6000.0, WeightGain), Band::OnTarget); // 300%
        assert!(is_achieved(&GoalThresholds::default(), 2200.0, 2000.0, WeightGain).unwrap());
        assert!(!is_achieved(&GoalThresholds::default(), 2100.0, 2000.0, WeightGain).unwrap());
    }

    #[test]
    fn maintain_sweep_is_monotone() {
        let thresholds = GoalThresholds::default();
        let mut seen = Vec::new();
        for kcal in 0..=4000 {
            let eval = evaluate(&thresholds, kcal as f64, 2000.0, GoalType::Maintain).unwrap();
            if (90.0..=110.0).contains(&eval.percentage) {
                assert_eq!(eval.band, Band::OnTarget, "{kcal} kcal");
            } else {
                assert_ne!(eval.band, Band::OnTarget, "{kcal} kcal");
            }
            if seen.last() != Some(&eval.band) {
                seen.push(eval.band);
            }
        }
        assert_eq!(
            seen,
            vec![
                Band::NoData,
                Band::HasData,
                Band::NearTarget,
                Band::OnTarget,
                Band::NearTarget,
                Band::Excess
            ]
        );
    }

    #[test]
    fn non_positive_goal_is_a_config_error() {
        for goal in [0.0, -100.0, f64::NAN, f64::INFINITY] {
            let err = classify(&GoalThresholds::default(), 500.0, goal, GoalType::Maintain)
                .unwrap_err();
            assert!(matches!(err, NutritionError::InvalidGoalConfig(_)), "{goal}");
        }
    }

    #[test]
    fn bad_intake_is_a_record_error() {
        let err = classify(&GoalThresholds::default(), -1.0, 2000.0, GoalType::Maintain)
            .unwrap_err();
        assert!(matches!(err, NutritionError::InvalidRecord(_)));
    }

    #[test]
    fn goal_type_parses_wire_names() {
        assert_eq!("weight_loss".parse::<GoalType>().unwrap(), GoalType::WeightLoss);
        assert_eq!(GoalType::WeightGain.to_string(), "weight_gain");
        assert!("bulk".parse::<GoalType>().is_err());
        assert_eq!(serde_json::to_string(&Band::OnTarget).unwrap(), "\"on_target\"");
    }

    #[test]
    fn thresholds_can_be_overridden_from_json() {
        let json = r#"{
            "maintain": {"on_target": {"min": 95, "max": 105}, "excess_above": 115},
            "weight_loss": {"on_target": {"min": 75, "max": 95}},
            "weight_gain": {"on_target": {"min": 105}, "deficit_below": 60}
        }"#;
        let thresholds: GoalThresholds = serde_json::from_str(json).unwrap();
        thresholds.validate().unwrap();
        assert_eq!(
            classify(&thresholds, 1850.0, 2000.0, GoalType::Maintain).unwrap(),
            Band::HasData
        );
        assert_eq!(
            classify(&thresholds, 2320.0, 2000.0, GoalType::Maintain).unwrap(),
            Band::Excess
        );
    }

    #[test]
    fn validate_rejects_inverted_ranges() {
        let mut thresholds = GoalThresholds::default();
        thresholds.weight_loss.on_target = PercentRange::between(90.0, 70.0);
        assert!(thresholds.validate().is_err());
        assert!(GoalThresholds::default().validate().is_ok());
    }

    #[test]
    fn evaluate_matches_the_single_answers() {
        let t = GoalThresholds::default();
        for goal_type in [GoalType::Maintain, GoalType::WeightLoss, GoalType::WeightGain] {
            for kcal in [0.0, 1100.0, 1500.0, 1850.0, 2000.0, 2300.0, 2700.0] {
                let eval = evaluate(&t, kcal, 2000.0, goal_type).unwrap();
                assert_eq!(eval.band, classify(&t, kcal, 2000.0, goal_type).unwrap());
                assert_eq!(eval.achieved, is_achieved(&t, kcal, 2000.0, goal_type).unwrap());
            }
        }
    }
}
