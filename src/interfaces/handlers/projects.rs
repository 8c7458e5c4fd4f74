use actix_multipart::form::MultipartForm;
use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::constants::MAX_GALLERY_FILES;
use crate::entities::image::ImageType;
use crate::entities::project::{NewProject, ProjectUpload};
use crate::errors::AppError;
use crate::use_cases::extractors::AuthSession;
use crate::AppState;

#[get("")]
pub async fn list_projects(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let projects = state.project_service.list().await?;
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/{id}")]
pub async fn get_project(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let project = state.project_service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(project))
}

#[post("")]
pub async fn create_project(
    _session: AuthSession,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let (id, fields, files) = form.split();
    check_gallery_count(&files)?;

    let id = id.filter(|id| !id.trim().is_empty()).ok_or_else(|| {
        AppError::Validation("Project ID, title, and description are required".to_string())
    })?;

    let created = state
        .project_service
        .create(NewProject { id, fields }, files)
        .await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Project created successfully",
        "project": created,
    })))
}

#[put("/{id}")]
pub async fn update_project(
    _session: AuthSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<ProjectUpload>,
) -> Result<HttpResponse, AppError> {
    let (_, fields, files) = form.split();
    check_gallery_count(&files)?;

    state
        .project_service
        .update(&path.into_inner(), fields, files)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Project updated successfully" })))
}

#[delete("/{id}")]
pub async fn delete_project(
    _session: AuthSession,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.project_service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Project deleted successfully" })))
}

#[delete("/{id}/images/{image_id}")]
pub async fn delete_project_image(
    _session: AuthSession,
    state: web::Data<AppState>,
    path: web::Path<(String, i64)>,
) -> Result<HttpResponse, AppError> {
    let (project_id, image_id) = path.into_inner();
    state
        .project_service
        .delete_image(&project_id, image_id)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Image deleted successfully" })))
}

fn check_gallery_count(
    files: &[(ImageType, actix_multipart::form::tempfile::TempFile)],
) -> Result<(), AppError> {
    let gallery = files
        .iter()
        .filter(|(kind, _)| *kind == ImageType::Gallery)
        .count();
    if gallery > MAX_GALLERY_FILES {
        return Err(AppError::Validation(format!(
            "At most {} gallery images are allowed per request",
            MAX_GALLERY_FILES
        )));
    }
    Ok(())
}
