use axum::extract::Multipart;

use crate::error::AppError;

pub mod form;
pub mod nutrition;

// Uploaded photos routinely exceed axum's 2 MiB default body limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Pulls the uploaded image bytes out of the `file` multipart field.
pub async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadUpload(err.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| AppError::BadUpload(err.to_string()))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(AppError::MissingUpload)
}
