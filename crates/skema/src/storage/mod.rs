//! File storage for import artifacts.
//!
//! Each import owns two artifacts under the data directory: the uploaded
//! source PDF (`uploads/{id}.pdf`) and a cached preview image
//! (`previews/{id}.png`). Deleting an import removes both.

use std::path::{Path, PathBuf};

use crate::error::StorageError;

pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of an import's uploaded source PDF.
    pub fn pdf_path(&self, import_id: &str) -> PathBuf {
        self.data_dir.join("uploads").join(format!("{}.pdf", import_id))
    }

    /// Path of an import's cached preview image.
    pub fn preview_path(&self, import_id: &str) -> PathBuf {
        self.data_dir
            .join("previews")
            .join(format!("{}.png", import_id))
    }

    /// Stores the uploaded PDF for an import, creating directories as needed.
    pub fn store_pdf(&self, import_id: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.pdf_path(import_id);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Stores the cached preview image for an import.
    pub fn write_preview(&self, import_id: &str, content: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.preview_path(import_id);
        write_file(&path, content)?;
        Ok(path)
    }

    /// Reads an import's stored source PDF.
    pub fn read_pdf(&self, import_id: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.pdf_path(import_id);
        std::fs::read(&path).map_err(|e| StorageError::ReadFile { path, source: e })
    }

    /// Removes both artifacts of an import. Missing files are not an error,
    /// so removal is idempotent and safe for failed uploads.
    pub fn remove_artifacts(&self, import_id: &str) -> Result<(), StorageError> {
        for path in [self.pdf_path(import_id), self.preview_path(import_id)] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StorageError::RemoveFile { path, source: e });
                }
            }
        }
        Ok(())
    }
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, content).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
