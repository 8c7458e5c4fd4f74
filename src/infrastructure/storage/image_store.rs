use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;
use rand::Rng;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::constants::{ALLOWED_IMAGE_EXTENSIONS, ALLOWED_IMAGE_MIMES, MAX_IMAGE_BYTES};
use crate::entities::image::StoredImage;
use crate::errors::AppError;

/// Filesystem-backed store for uploaded images. Files live under a
/// per-project subdirectory of the uploads root, under generated names;
/// the user-supplied filename is never used for storage paths.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks an upload against the image allow-list: size cap, filename
    /// extension, declared content type, and magic-byte sniff.
    pub async fn validate(&self, file: &TempFile) -> Result<(), AppError> {
        if file.size > MAX_IMAGE_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "file exceeds {} bytes",
                MAX_IMAGE_BYTES
            )));
        }

        let name = file.file_name.as_deref().unwrap_or("");
        let ext = extension_of(name)
            .ok_or_else(|| AppError::UnsupportedMediaType("missing file extension".to_string()))?;
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::UnsupportedMediaType(format!("extension .{ext}")));
        }

        match file.content_type.as_ref() {
            Some(ct) if ALLOWED_IMAGE_MIMES.contains(&ct.essence_str()) => {}
            Some(ct) => {
                return Err(AppError::UnsupportedMediaType(format!("content type {ct}")));
            }
            None => {
                return Err(AppError::UnsupportedMediaType(
                    "missing content type".to_string(),
                ));
            }
        }

        // A declared type can lie; sniff the leading bytes as well. An
        // unrecognized signature is left to the checks above.
        let mut head = [0u8; 64];
        let mut reader = fs::File::open(file.file.path()).await?;
        let n = reader.read(&mut head).await?;
        if let Some(kind) = infer::get(&head[..n]) {
            if !ALLOWED_IMAGE_MIMES.contains(&kind.mime_type()) {
                return Err(AppError::UnsupportedMediaType(format!(
                    "detected type {}",
                    kind.mime_type()
                )));
            }
        }

        Ok(())
    }

    /// Copies a validated upload into the project's directory under a
    /// generated collision-free name.
    pub async fn save(&self, project_id: &str, file: &TempFile) -> Result<StoredImage, AppError> {
        let original = file
            .file_name
            .clone()
            .unwrap_or_else(|| "unnamed".to_string());
        let ext = extension_of(&original)
            .ok_or_else(|| AppError::UnsupportedMediaType("missing file extension".to_string()))?;

        let dir = self.root.join(project_id);
        fs::create_dir_all(&dir).await?;

        let filename = generate_filename(&ext);
        fs::copy(file.file.path(), dir.join(&filename)).await?;

        Ok(StoredImage {
            filename,
            original_filename: original,
        })
    }

    /// Removes a stored file. Missing files are not an error.
    pub async fn delete(&self, project_id: &str, filename: &str) -> Result<(), AppError> {
        let Some(path) = self.resolve(project_id, filename) else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Removes the project's entire upload directory, best-effort.
    pub async fn remove_project_dir(&self, project_id: &str) -> Result<(), AppError> {
        if !is_safe_component(project_id) {
            return Ok(());
        }
        match fs::remove_dir_all(self.root.join(project_id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Maps a (project, filename) pair to its on-disk path, refusing any
    /// component that could escape the uploads root.
    pub fn resolve(&self, project_id: &str, filename: &str) -> Option<PathBuf> {
        (is_safe_component(project_id) && is_safe_component(filename))
            .then(|| self.root.join(project_id).join(filename))
    }
}

fn generate_filename(ext: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}.{}", Utc::now().timestamp_millis(), suffix, ext)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

fn is_safe_component(component: &str) -> bool {
    !component.is_empty()
        && component != "."
        && component != ".."
        && !component.contains('/')
        && !component.contains('\\')
        && !component.contains('\0')
}
