use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use super::{MAX_UPLOAD_BYTES, read_image_field};
use crate::AppState;
use crate::error::AppError;

pub fn nutrition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/identify_and_get_nutrition",
            post(identify_and_get_nutrition),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

async fn identify_and_get_nutrition(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let image = read_image_field(&mut multipart).await?;
    let records = state.pipeline.run(image).await?;

    if records.is_empty() {
        let message = json!({ "message": "No nutritional information found." });
        return Ok((StatusCode::NOT_FOUND, Json(message)).into_response());
    }

    Ok(Json(records).into_response())
}
