use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::NutritionAnalysis;
use crate::{
    auth::AuthUser,
    error::{AppError, Result},
    nutrition::NewFoodRecord,
    records::repo,
    state::AppState,
    storage::photo_key,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze-food", post(analyze_food))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

struct Upload {
    body: Bytes,
    content_type: String,
}

async fn read_image(mut mp: Multipart) -> Result<Upload> {
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "image/jpeg".into());
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.is_empty() {
            return Err(AppError::BadRequest("image is empty".into()));
        }
        return Ok(Upload { body, content_type });
    }
    Err(AppError::BadRequest("no image file provided".into()))
}

/// POST /analyze-food (multipart, field `image`)
///
/// Signed-in callers get the result stored as a food record; anonymous
/// callers only get the analysis.
#[instrument(skip(state, mp))]
pub async fn analyze_food(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    mp: Multipart,
) -> Result<Json<NutritionAnalysis>> {
    let upload = read_image(mp).await?;
    let foods = state
        .vision
        .analyze(&upload.body, &upload.content_type)
        .await?;
    let mut record = NewFoodRecord::from_items(foods)?;

    let record_id = match user {
        Some(AuthUser(user_id)) => save_record(&state, user_id, &mut record, upload).await,
        None => None,
    };

    Ok(Json(NutritionAnalysis::from_record(&record, record_id)))
}

/// Stores the photo and the record. Failures are logged and leave the
/// analysis response intact.
async fn save_record(
    state: &AppState,
    user_id: Uuid,
    record: &mut NewFoodRecord,
    upload: Upload,
) -> Option<Uuid> {
    let record_id = Uuid::new_v4();
    let key = photo_key(user_id, record_id, &upload.content_type);
    match state
        .photos
        .put_photo(&key, upload.body, &upload.content_type)
        .await
    {
        Ok(()) => record.image_key = Some(key),
        Err(e) => error!(error = %e, %user_id, "photo upload failed; saving record without it"),
    }

    match repo::insert(&state.db, user_id, record_id, record).await {
        Ok(recorded_at) => {
            info!(%user_id, %record_id, %recorded_at, kcal = record.totals.calories(), "food record saved");
            Some(record_id)
        }
        Err(e) => {
            error!(error = %e, %user_id, "saving food record failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::{header, Request, StatusCode}};
    use tower::ServiceExt;

    use crate::{app::build_app, state::AppState};

    const BOUNDARY: &str = "XyZbOuNdArY";

    fn multipart(field: &str, bytes: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"meal.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyze-food")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn anonymous_analysis_returns_totals_without_saving() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(multipart("image", b"\xff\xd8\xffjpeg")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let json = json_body(res).await;
        assert_eq!(json["total_calories"], 600.0);
        assert_eq!(json["total_protein"], 38.5);
        assert_eq!(json["foods"].as_array().unwrap().len(), 2);
        assert!(json.get("record_id").is_none());
    }

    #[tokio::test]
    async fn missing_image_field_is_bad_request() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(multipart("photo", b"\xff\xd8\xff")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["error"], "bad_request");
    }

    #[tokio::test]
    async fn empty_image_is_bad_request() {
        let app = build_app(AppState::fake());
        let res = app.oneshot(multipart("image", b"")).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
