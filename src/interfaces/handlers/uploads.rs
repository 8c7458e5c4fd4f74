use std::io;
use std::path::Path;

use actix_web::http::header;
use actix_web::{get, web, HttpResponse};
use tokio::fs;

use crate::errors::AppError;
use crate::AppState;

/// Serves stored images from the uploads root. Path components are checked
/// before touching the filesystem, so traversal attempts fall out as 404.
#[get("/uploads/{project_id}/{filename}")]
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (project_id, filename) = path.into_inner();

    let file_path = state
        .image_store
        .resolve(&project_id, &filename)
        .ok_or_else(|| AppError::NotFound("File".to_string()))?;

    let bytes = match fs::read(&file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AppError::NotFound("File".to_string()));
        }
        Err(e) => return Err(AppError::from(e)),
    };

    Ok(HttpResponse::Ok()
        .content_type(content_type_for(&filename))
        .insert_header((header::CACHE_CONTROL, "public, max-age=86400"))
        .body(bytes))
}

fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
