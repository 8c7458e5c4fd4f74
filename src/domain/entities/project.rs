use std::collections::BTreeMap;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::image::{group_images, ImageType, ImageView, ProjectImage};

/// The project id doubles as the upload directory name, so it is restricted
/// to a slug-shaped charset.
pub static PROJECT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid project id regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Live,
    #[default]
    InProgress,
}

impl ProjectStatus {
    /// Lenient parse: anything unrecognized falls back to the default,
    /// matching the store's column default.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "live" => ProjectStatus::Live,
            "in-progress" => ProjectStatus::InProgress,
            other => {
                if !other.trim().is_empty() {
                    tracing::warn!("Unknown project status {:?}, defaulting to in-progress", other);
                }
                ProjectStatus::InProgress
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    #[serde(default)]
    pub author: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default)]
    pub text: String,
}

/// A project row as stored. List-valued columns are JSON-encoded text.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub problem: String,
    pub solution: String,
    pub link: String,
    pub tech: String,
    pub features: String,
    pub results: String,
    pub testimonial: String,
    pub gallery_sections: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shaped project as returned by the API, with image rows grouped by type.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub problem: String,
    pub solution: String,
    pub link: String,
    pub tech: Vec<String>,
    pub features: Vec<String>,
    pub results: Vec<String>,
    pub testimonial: Option<Testimonial>,
    pub gallery_sections: serde_json::Value,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: BTreeMap<ImageType, Vec<ImageView>>,
}

impl ProjectResponse {
    pub fn shape(row: ProjectRow, images: Vec<ProjectImage>) -> Self {
        ProjectResponse {
            tech: parse_json_list(&row.tech, "tech", &row.id),
            features: parse_json_list(&row.features, "features", &row.id),
            results: parse_json_list(&row.results, "results", &row.id),
            testimonial: parse_testimonial(&row.testimonial, &row.id),
            gallery_sections: parse_json_value(&row.gallery_sections),
            id: row.id,
            title: row.title,
            tagline: row.tagline,
            description: row.description,
            problem: row.problem,
            solution: row.solution,
            link: row.link,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            images: group_images(images),
        }
    }
}

/// All non-id project fields, as accepted on create and update. Updates
/// replace every field; optional text fields default to the empty string.
#[derive(Debug, Clone, Validate)]
pub struct ProjectFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub tagline: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub problem: String,
    pub solution: String,
    pub link: String,
    pub tech: Vec<String>,
    pub features: Vec<String>,
    pub results: Vec<String>,
    pub testimonial: Option<Testimonial>,
    pub gallery_sections: serde_json::Value,
    pub status: ProjectStatus,
}

impl ProjectFields {
    pub fn tech_json(&self) -> String {
        encode_json(&self.tech)
    }

    pub fn features_json(&self) -> String {
        encode_json(&self.features)
    }

    pub fn results_json(&self) -> String {
        encode_json(&self.results)
    }

    pub fn testimonial_json(&self) -> String {
        serde_json::to_string(&self.testimonial).unwrap_or_else(|_| "null".to_string())
    }

    pub fn gallery_sections_json(&self) -> String {
        self.gallery_sections.to_string()
    }
}

fn encode_json(list: &[String]) -> String {
    serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string())
}

#[derive(Debug, Validate)]
pub struct NewProject {
    #[validate(
        length(min = 1, max = 64, message = "Project ID is required"),
        regex(
            path = *PROJECT_ID_RE,
            message = "Project ID may only contain letters, digits, hyphens and underscores"
        )
    )]
    pub id: String,

    #[validate(nested)]
    pub fields: ProjectFields,
}

#[derive(Debug, Serialize)]
pub struct CreatedProject {
    pub id: String,
    pub title: String,
    pub description: String,
}

/// Multipart payload accepted by `POST /api/projects` and
/// `PUT /api/projects/{id}`. List-valued text fields carry JSON arrays;
/// malformed JSON degrades to an empty list with a warning rather than
/// failing the request.
#[derive(Debug, MultipartForm)]
pub struct ProjectUpload {
    pub id: Option<Text<String>>,
    pub title: Option<Text<String>>,
    pub tagline: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub problem: Option<Text<String>>,
    pub solution: Option<Text<String>>,
    pub tech: Option<Text<String>>,
    pub features: Option<Text<String>>,
    pub results: Option<Text<String>>,
    pub testimonial: Option<Text<String>>,
    pub link: Option<Text<String>>,
    pub status: Option<Text<String>>,

    #[multipart(rename = "gallerySections")]
    pub gallery_sections: Option<Text<String>>,

    #[multipart(rename = "cardImage")]
    pub card_image: Option<TempFile>,

    #[multipart(rename = "desktopScreenshot")]
    pub desktop_screenshot: Option<TempFile>,

    #[multipart(rename = "mobileScreenshot")]
    pub mobile_screenshot: Option<TempFile>,

    #[multipart(rename = "galleryImages")]
    pub gallery_images: Vec<TempFile>,
}

impl ProjectUpload {
    /// Splits the form into its optional id, the replacement field set and
    /// the uploaded files tagged with their image type.
    pub fn split(self) -> (Option<String>, ProjectFields, Vec<(ImageType, TempFile)>) {
        let id = self.id.map(|t| t.into_inner());

        let fields = ProjectFields {
            title: text_or_empty(self.title),
            tagline: text_or_empty(self.tagline),
            description: text_or_empty(self.description),
            problem: text_or_empty(self.problem),
            solution: text_or_empty(self.solution),
            link: text_or_empty(self.link),
            tech: parse_json_list(&text_or_empty(self.tech), "tech", "request"),
            features: parse_json_list(&text_or_empty(self.features), "features", "request"),
            results: parse_json_list(&text_or_empty(self.results), "results", "request"),
            testimonial: parse_testimonial(&text_or_empty(self.testimonial), "request"),
            gallery_sections: parse_json_value(&text_or_empty(self.gallery_sections)),
            status: ProjectStatus::parse_or_default(&text_or_empty(self.status)),
        };

        let mut files = Vec::new();
        if let Some(file) = self.card_image {
            files.push((ImageType::Card, file));
        }
        if let Some(file) = self.desktop_screenshot {
            files.push((ImageType::Desktop, file));
        }
        if let Some(file) = self.mobile_screenshot {
            files.push((ImageType::Mobile, file));
        }
        for file in self.gallery_images {
            files.push((ImageType::Gallery, file));
        }

        (id, fields, files)
    }
}

fn text_or_empty(value: Option<Text<String>>) -> String {
    value.map(|t| t.into_inner()).unwrap_or_default()
}

fn parse_json_list(raw: &str, field: &str, context: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Malformed JSON in {} for {}: {}", field, context, e);
        Vec::new()
    })
}

fn parse_testimonial(raw: &str, context: &str) -> Option<Testimonial> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!("Malformed testimonial JSON for {}: {}", context, e);
        None
    })
}

fn parse_json_value(raw: &str) -> serde_json::Value {
    if raw.trim().is_empty() {
        return serde_json::Value::Array(Vec::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}
