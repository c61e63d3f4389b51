use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use time::{OffsetDateTime, UtcOffset};
use tracing::{instrument, warn};

use super::{
    dto::{FoodRecordView, ListQuery, MAX_LIMIT},
    repo::{self, StoredFoodRecord},
};
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    nutrition::DayKey,
    state::AppState,
    storage::PHOTO_URL_TTL_SECS,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/food-records", get(list_food_records))
}

#[instrument(skip(state))]
pub async fn list_food_records(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<FoodRecordView>>> {
    if q.limit < 1 || q.offset < 0 {
        return Err(AppError::BadRequest("limit must be positive, offset non-negative".into()));
    }
    let offset = state.viewer_offset(q.utc_offset_minutes)?;
    let range = match (q.start, q.end) {
        (Some(start), Some(end)) if start <= end => Some(instant_range(start, end, offset)?),
        (Some(_), Some(_)) => return Err(AppError::BadRequest("start is after end".into())),
        (None, None) => None,
        _ => return Err(AppError::BadRequest("start and end must be given together".into())),
    };

    let records =
        repo::list_by_user(&state.db, user_id, range, q.limit.min(MAX_LIMIT), q.offset).await?;
    Ok(Json(with_photo_urls(&state, records).await))
}

/// `[start of first, end of last)` in `offset`.
pub(crate) fn instant_range(
    first: DayKey,
    last: DayKey,
    offset: UtcOffset,
) -> Result<(OffsetDateTime, OffsetDateTime)> {
    let out_of_range = |day: DayKey| AppError::BadRequest(format!("{day} is out of range"));
    let (from, _) = first.bounds(offset).ok_or_else(|| out_of_range(first))?;
    let (_, until) = last.bounds(offset).ok_or_else(|| out_of_range(last))?;
    Ok((from, until))
}

/// Presigns photo URLs; a failed presign only drops that record's URL.
pub(crate) async fn with_photo_urls(
    state: &AppState,
    records: Vec<StoredFoodRecord>,
) -> Vec<FoodRecordView> {
    let mut out = Vec::with_capacity(records.len());
    for stored in records {
        let url = match stored.image_key.as_deref() {
            Some(key) => match state.photos.presign_get(key, PHOTO_URL_TTL_SECS).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(error = %e, key, "presign failed");
                    None
                }
            },
            None => None,
        };
        out.push(FoodRecordView::new(stored, url));
    }
    out
}
