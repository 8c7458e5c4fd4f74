use async_trait::async_trait;
use chrono::Utc;

use crate::{
    entities::{
        image::{ImageType, ProjectImage, StoredImage},
        project::{NewProject, ProjectFields, ProjectRow},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest created first.
    async fn list(&self) -> Result<Vec<ProjectRow>, AppError>;
    async fn get(&self, id: &str) -> Result<Option<ProjectRow>, AppError>;
    async fn exists(&self, id: &str) -> Result<bool, AppError>;
    async fn create(&self, project: &NewProject) -> Result<(), AppError>;
    /// Replaces every non-id field and refreshes `updated_at`. Returns the
    /// number of affected rows (0 when the project does not exist).
    async fn update(&self, id: &str, fields: &ProjectFields) -> Result<u64, AppError>;
    /// Deletes the row; the FK cascade removes associated image rows.
    async fn delete(&self, id: &str) -> Result<u64, AppError>;

    /// Image rows for one project, most recent first.
    async fn images_for(&self, project_id: &str) -> Result<Vec<ProjectImage>, AppError>;
    /// Image rows across all projects, most recent first within a project.
    async fn images_for_all(&self) -> Result<Vec<ProjectImage>, AppError>;
    async fn add_image(
        &self,
        project_id: &str,
        image_type: ImageType,
        stored: &StoredImage,
    ) -> Result<i64, AppError>;
    async fn get_image(
        &self,
        project_id: &str,
        image_id: i64,
    ) -> Result<Option<ProjectImage>, AppError>;
    async fn delete_image(&self, project_id: &str, image_id: i64) -> Result<u64, AppError>;
    async fn image_filenames(&self, project_id: &str) -> Result<Vec<String>, AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxProjectRepo { pool }
    }
}

const PROJECT_COLUMNS: &str = "id, title, tagline, description, problem, solution, link, \
     tech, features, results, testimonial, gallery_sections, status, created_at, updated_at";

const IMAGE_COLUMNS: &str =
    "id, project_id, image_type, filename, original_filename, uploaded_at";

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list(&self) -> Result<Vec<ProjectRow>, AppError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get(&self, id: &str) -> Result<Option<ProjectRow>, AppError> {
        sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM projects WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists != 0)
    }

    async fn create(&self, project: &NewProject) -> Result<(), AppError> {
        let now = Utc::now();
        let fields = &project.fields;

        sqlx::query(
            r#"
            INSERT INTO projects
                (id, title, tagline, description, problem, solution, link,
                 tech, features, results, testimonial, gallery_sections, status,
                 created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(&project.id)
        .bind(&fields.title)
        .bind(&fields.tagline)
        .bind(&fields.description)
        .bind(&fields.problem)
        .bind(&fields.solution)
        .bind(&fields.link)
        .bind(fields.tech_json())
        .bind(fields.features_json())
        .bind(fields.results_json())
        .bind(fields.testimonial_json())
        .bind(fields.gallery_sections_json())
        .bind(fields.status)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: &str, fields: &ProjectFields) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE projects SET
                title = ?1, tagline = ?2, description = ?3, problem = ?4,
                solution = ?5, link = ?6, tech = ?7, features = ?8, results = ?9,
                testimonial = ?10, gallery_sections = ?11, status = ?12, updated_at = ?13
            WHERE id = ?14
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.tagline)
        .bind(&fields.description)
        .bind(&fields.problem)
        .bind(&fields.solution)
        .bind(&fields.link)
        .bind(fields.tech_json())
        .bind(fields.features_json())
        .bind(fields.results_json())
        .bind(fields.testimonial_json())
        .bind(fields.gallery_sections_json())
        .bind(fields.status)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn images_for(&self, project_id: &str) -> Result<Vec<ProjectImage>, AppError> {
        sqlx::query_as::<_, ProjectImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM project_images WHERE project_id = ?1 \
             ORDER BY uploaded_at DESC, id DESC"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn images_for_all(&self) -> Result<Vec<ProjectImage>, AppError> {
        sqlx::query_as::<_, ProjectImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM project_images \
             ORDER BY project_id, uploaded_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn add_image(
        &self,
        project_id: &str,
        image_type: ImageType,
        stored: &StoredImage,
    ) -> Result<i64, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_images
                (project_id, image_type, filename, original_filename, uploaded_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(project_id)
        .bind(image_type)
        .bind(&stored.filename)
        .bind(&stored.original_filename)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn get_image(
        &self,
        project_id: &str,
        image_id: i64,
    ) -> Result<Option<ProjectImage>, AppError> {
        sqlx::query_as::<_, ProjectImage>(&format!(
            "SELECT {IMAGE_COLUMNS} FROM project_images WHERE id = ?1 AND project_id = ?2"
        ))
        .bind(image_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_image(&self, project_id: &str, image_id: i64) -> Result<u64, AppError> {
        let result =
            sqlx::query("DELETE FROM project_images WHERE id = ?1 AND project_id = ?2")
                .bind(image_id)
                .bind(project_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }

    async fn image_filenames(&self, project_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar("SELECT filename FROM project_images WHERE project_id = ?1")
            .bind(project_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
