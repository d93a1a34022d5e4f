//! Upload endpoint: replace the staging directory and rebuild the index

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::path::Path;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::MessageResponse;

/// Multipart field carrying the uploaded files
pub const FILES_FIELD: &str = "files";
pub const NO_FILES: &str = "No files provided";
pub const UPLOAD_OK: &str = "Files uploaded and indexed successfully";

/// A file received in the request, not yet written to disk
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Final path component of the client-supplied name
    pub filename: String,
    pub data: Vec<u8>,
}

/// POST /upload - Stage files and rebuild the index from them
pub async fn upload_files(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>> {
    let multipart = multipart.map_err(|_| Error::bad_request(NO_FILES))?;
    let files = collect_files(multipart).await?;
    if files.is_empty() {
        return Err(Error::bad_request(NO_FILES));
    }

    let _guard = state.lock_uploads().await;
    let storage = &state.config().storage;

    stage_files(&storage.upload_dir, &files).await?;
    tracing::info!(
        "Staged {} files ({} bytes) in {}",
        files.len(),
        files.iter().map(|f| f.data.len()).sum::<usize>(),
        storage.upload_dir.display()
    );

    let index = state.index_builder().build(&storage.upload_dir).await?;

    let index_dir = storage.index_dir.clone();
    let index = tokio::task::spawn_blocking(move || index.persist(&index_dir).map(|_| index))
        .await
        .map_err(|e| Error::internal(format!("Task join error: {}", e)))??;

    state.replace_index(index);

    Ok(Json(MessageResponse::new(UPLOAD_OK)))
}

/// Read every `files` part into memory before touching the filesystem
async fn collect_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let Some(filename) = field.file_name().and_then(sanitize_filename) else {
            tracing::debug!("Skipping part without a usable file name");
            continue;
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file '{}': {}", filename, e)))?;

        files.push(UploadedFile {
            filename,
            data: data.to_vec(),
        });
    }

    Ok(files)
}

/// Reduce a client-supplied name to its final component
pub fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.rsplit(['/', '\\']).next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Clear the files directly inside `dir` (creating it if needed), then write
/// `files` into it. Subdirectories are left alone. A repeated name keeps the
/// last file.
pub async fn stage_files(dir: &Path, files: &[UploadedFile]) -> Result<()> {
    if tokio::fs::try_exists(dir).await? {
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            tokio::fs::remove_file(entry.path()).await?;
        }
    } else {
        tokio::fs::create_dir_all(dir).await?;
    }

    for file in files {
        tokio::fs::write(dir.join(&file.filename), &file.data).await?;
    }

    Ok(())
}
