/*
 * Responsibility
 * - POST /upload (multipart, field "image")
 * - user 毎に一意なファイル名で upload dir へ保存
 * - metadata は永続化しない (filename を返すだけ)
 */
use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use uuid::Uuid;

use crate::api::dto::uploads::UploadResponse;
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::state::AppState;

pub async fn upload(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart =
        multipart.map_err(|err| AppError::bad_request(format!("File upload error: {}", err)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::bad_request(format!("File upload error: {}", err)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        // Keep the client's extension, nothing else of its filename.
        let ext = field
            .file_name()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|err| AppError::bad_request(format!("File upload error: {}", err)))?;

        let filename = format!("user_{}_{}{}", ctx.user_id, Uuid::new_v4().simple(), ext);
        let path = state.upload_dir.join(&filename);

        tokio::fs::write(&path, &data).await.map_err(|err| {
            tracing::error!(error = %err, path = %path.display(), "failed to write upload");
            AppError::Internal("Error saving file")
        })?;

        tracing::info!(user_id = ctx.user_id, filename = %filename, "image uploaded");

        return Ok(Json(UploadResponse {
            message: "Image uploaded successfully",
            filename,
        }));
    }

    Err(AppError::bad_request(
        "Error retrieving file from form: no \"image\" field",
    ))
}
