use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, instrument};

use super::{
    dto::{CalendarQuery, DayDetail, DayQuery},
    view::{self, CalendarView, DEFAULT_SPAN_DAYS, MAX_SPAN_DAYS},
};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    nutrition::{aggregate, records_on_day, DayKey, WEEK_LEN},
    profile::load_goal_profile,
    records::{
        self,
        handlers::{instant_range, with_photo_urls},
        StoredFoodRecord,
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calendar", get(calendar))
        .route("/calendar/days/:date", get(day_detail))
}

/// The requested range and reference day, with defaults resolved against `today`.
fn resolve_window(q: &CalendarQuery, today: DayKey) -> Result<(DayKey, DayKey, DayKey)> {
    let reference_day = q.reference_day.unwrap_or(today);
    let end = q.end.unwrap_or(reference_day);
    let start = match q.start {
        Some(start) => start,
        None => end
            .days_before(DEFAULT_SPAN_DAYS - 1)
            .ok_or_else(|| AppError::BadRequest("end is out of range".into()))?,
    };
    if start > end {
        return Err(AppError::BadRequest("start is after end".into()));
    }
    if (end.date() - start.date()).whole_days() >= MAX_SPAN_DAYS {
        return Err(AppError::BadRequest(format!(
            "calendar range is limited to {MAX_SPAN_DAYS} days"
        )));
    }
    Ok((start, end, reference_day))
}

#[instrument(skip(state))]
pub async fn calendar(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<CalendarQuery>,
) -> Result<Json<CalendarView>> {
    let offset = state.viewer_offset(q.utc_offset_minutes)?;
    let today = DayKey::from_timestamp(OffsetDateTime::now_utc(), offset);
    let (start, end, reference_day) = resolve_window(&q, today)?;

    // Fetch once for both the tiles and the trailing week.
    let week_start = reference_day
        .days_before(WEEK_LEN as i64 - 1)
        .ok_or_else(|| AppError::BadRequest("reference_day is out of range".into()))?;
    let (from, until) = instant_range(start.min(week_start), end.max(reference_day), offset)?;
    let profile = load_goal_profile(&state, user_id).await?;

    let stored = records::repo::list_between(&state.db, user_id, from, until).await?;
    let summaries = aggregate(stored.iter().map(|s| &s.record), offset);
    debug!(%user_id, records = stored.len(), days = summaries.len(), "calendar aggregated");

    let view = view::build(
        &state.config.thresholds,
        &profile,
        &summaries,
        start,
        end,
        reference_day,
    )?;
    Ok(Json(view))
}

#[instrument(skip(state))]
pub async fn day_detail(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(date): Path<DayKey>,
    Query(q): Query<DayQuery>,
) -> Result<Json<DayDetail>> {
    let offset = state.viewer_offset(q.utc_offset_minutes)?;
    let (from, until) = instant_range(date, date, offset)?;
    let profile = load_goal_profile(&state, user_id).await?;

    let stored = records::repo::list_between(&state.db, user_id, from, until).await?;
    let summary = aggregate(stored.iter().map(|s| &s.record), offset)
        .get(&date)
        .copied();
    let tile = view::tile(&state.config.thresholds, &profile, date, summary)?;

    let ordered: Vec<StoredFoodRecord> = records_on_day(stored.iter().map(|s| &s.record), date, offset)
        .into_iter()
        .filter_map(|r| stored.iter().find(|s| s.record.id == r.id).cloned())
        .collect();

    Ok(Json(DayDetail {
        date,
        goal: profile.daily_calorie_goal,
        goal_type: profile.goal_type,
        summary: tile.summary,
        evaluation: tile.evaluation,
        records: with_photo_urls(&state, ordered).await,
    }))
}
