use std::collections::HashMap;

use actix_multipart::form::tempfile::TempFile;
use validator::Validate;

use crate::entities::image::{ImageType, ProjectImage};
use crate::entities::project::{
    CreatedProject, NewProject, ProjectFields, ProjectResponse,
};
use crate::errors::AppError;
use crate::interfaces::repositories::project::ProjectRepository;
use crate::storage::image_store::ImageStore;

/// Orchestrates project CRUD across the repository and the image store.
pub struct ProjectService<R>
where
    R: ProjectRepository,
{
    pub repo: R,
    pub images: ImageStore,
}

impl<R> ProjectService<R>
where
    R: ProjectRepository,
{
    pub fn new(repo: R, images: ImageStore) -> Self {
        ProjectService { repo, images }
    }

    pub async fn list(&self) -> Result<Vec<ProjectResponse>, AppError> {
        let rows = self.repo.list().await?;

        let mut by_project: HashMap<String, Vec<ProjectImage>> = HashMap::new();
        for image in self.repo.images_for_all().await? {
            by_project
                .entry(image.project_id.clone())
                .or_default()
                .push(image);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let images = by_project.remove(&row.id).unwrap_or_default();
                ProjectResponse::shape(row, images)
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<ProjectResponse, AppError> {
        let row = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project".to_string()))?;
        let images = self.repo.images_for(id).await?;
        Ok(ProjectResponse::shape(row, images))
    }

    /// Creates a project and registers its uploads. Files are validated up
    /// front so a bad upload never leaves a half-registered project; after
    /// the row exists, each file is saved and registered independently and
    /// individual failures only log.
    pub async fn create(
        &self,
        project: NewProject,
        files: Vec<(ImageType, TempFile)>,
    ) -> Result<CreatedProject, AppError> {
        project.validate()?;

        for (_, file) in &files {
            self.images.validate(file).await?;
        }

        if self.repo.exists(&project.id).await? {
            return Err(AppError::DuplicateId);
        }
        self.repo.create(&project).await?;

        self.register_images(&project.id, files).await;

        Ok(CreatedProject {
            id: project.id,
            title: project.fields.title,
            description: project.fields.description,
        })
    }

    /// Full replacement of all non-id fields; new uploads are appended.
    pub async fn update(
        &self,
        id: &str,
        fields: ProjectFields,
        files: Vec<(ImageType, TempFile)>,
    ) -> Result<(), AppError> {
        fields.validate()?;

        for (_, file) in &files {
            self.images.validate(file).await?;
        }

        let updated = self.repo.update(id, &fields).await?;
        if updated == 0 {
            return Err(AppError::NotFound("Project".to_string()));
        }

        self.register_images(id, files).await;
        Ok(())
    }

    /// Removes the row (the cascade takes the image rows with it), then
    /// cleans up files and the per-project directory best-effort.
    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let filenames = self.repo.image_filenames(id).await?;

        let deleted = self.repo.delete(id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound("Project".to_string()));
        }

        for filename in filenames {
            if let Err(e) = self.images.delete(id, &filename).await {
                tracing::warn!("Failed to delete image file {}/{}: {}", id, filename, e);
            }
        }
        if let Err(e) = self.images.remove_project_dir(id).await {
            tracing::warn!("Failed to remove upload directory for {}: {}", id, e);
        }

        Ok(())
    }

    pub async fn delete_image(&self, project_id: &str, image_id: i64) -> Result<(), AppError> {
        let image = self
            .repo
            .get_image(project_id, image_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Image".to_string()))?;

        self.repo.delete_image(project_id, image_id).await?;

        if let Err(e) = self.images.delete(project_id, &image.filename).await {
            tracing::warn!(
                "Failed to delete image file {}/{}: {}",
                project_id,
                image.filename,
                e
            );
        }

        Ok(())
    }

    async fn register_images(&self, project_id: &str, files: Vec<(ImageType, TempFile)>) {
        for (image_type, file) in files {
            let stored = match self.images.save(project_id, &file).await {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!("Failed to store {:?} image for {}: {}", image_type, project_id, e);
                    continue;
                }
            };

            if let Err(e) = self.repo.add_image(project_id, image_type, &stored).await {
                tracing::warn!(
                    "Failed to register {:?} image {} for {}: {}",
                    image_type,
                    stored.filename,
                    project_id,
                    e
                );
            }
        }
    }
}
