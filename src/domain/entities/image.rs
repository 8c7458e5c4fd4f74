use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of an uploaded image within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ImageType {
    Card,
    Desktop,
    Mobile,
    Gallery,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectImage {
    pub id: i64,
    pub project_id: String,
    pub image_type: ImageType,
    pub filename: String,
    pub original_filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Output of a successful image-store save.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub original_filename: String,
}

/// Shaped image entry as returned by the project endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<ProjectImage> for ImageView {
    fn from(img: ProjectImage) -> Self {
        let url = format!("/uploads/{}/{}", img.project_id, img.filename);
        ImageView {
            id: img.id,
            filename: img.filename,
            original_filename: img.original_filename,
            url,
            uploaded_at: img.uploaded_at,
        }
    }
}

/// Groups image rows by type, preserving the given order within each type.
/// Callers pass rows ordered most-recent-first, so index 0 is the canonical
/// image for the single-slot types (card, desktop, mobile).
pub fn group_images(images: Vec<ProjectImage>) -> BTreeMap<ImageType, Vec<ImageView>> {
    let mut grouped: BTreeMap<ImageType, Vec<ImageView>> = BTreeMap::new();
    for image in images {
        grouped
            .entry(image.image_type)
            .or_default()
            .push(ImageView::from(image));
    }
    grouped
}
