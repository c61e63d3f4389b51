use std::collections::BTreeMap;

use serde::Serialize;
use time::UtcOffset;

use super::{DayKey, FoodRecord};

/// Per-day totals. Derived on every pass, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: DayKey,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub record_count: usize,
}

impl DailySummary {
    fn empty(date: DayKey) -> Self {
        Self {
            date,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            record_count: 0,
        }
    }

    fn add(&mut self, record: &FoodRecord) {
        self.calories += record.totals.calories();
        self.protein += record.totals.protein();
        self.carbs += record.totals.carbs();
        self.fat += record.totals.fat();
        self.record_count += 1;
    }
}

/// Groups records by local calendar day and sums their macros.
///
/// Days without records get no entry. Within a day records are summed in
/// `(recorded_at, id)` order, so any permutation of the same input produces
/// bit-identical totals.
pub fn aggregate<'a, I>(records: I, offset: UtcOffset) -> BTreeMap<DayKey, DailySummary>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut by_day: BTreeMap<DayKey, Vec<&FoodRecord>> = BTreeMap::new();
    for record in records {
        by_day
            .entry(DayKey::from_timestamp(record.recorded_at, offset))
            .or_default()
            .push(record);
    }

    by_day
        .into_iter()
        .map(|(day, mut day_records)| {
            day_records.sort_by_key(|r| (r.recorded_at, r.id));
            let mut summary = DailySummary::empty(day);
            for record in day_records {
                summary.add(record);
            }
            (day, summary)
        })
        .collect()
}

/// The records whose local day is `day`, oldest first.
pub fn records_on_day<'a, I>(records: I, day: DayKey, offset: UtcOffset) -> Vec<&'a FoodRecord>
where
    I: IntoIterator<Item = &'a FoodRecord>,
{
    let mut hits: Vec<&FoodRecord> = records
        .into_iter()
        .filter(|r| DayKey::from_timestamp(r.recorded_at, offset) == day)
        .collect();
    hits.sort_by_key(|r| (r.recorded_at, r.id));
    hits
}
