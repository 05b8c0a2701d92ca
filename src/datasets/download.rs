//! Dataset downloads with atomic replacement.
//!
//! A download never exposes a partial file: the payload is fetched in full,
//! written to a temporary file next to the target and renamed over it.

use std::io::Write;
use std::path::Path;

use crate::config::{DATASET_DOWNLOAD_TIMEOUT, MAX_DATASET_DOWNLOAD_SIZE};
use crate::error_handling::DatasetError;

/// Downloads `url` with size limit enforcement.
pub(crate) async fn fetch_bytes(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<u8>, DatasetError> {
    let request_error = |source| DatasetError::Request {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .timeout(DATASET_DOWNLOAD_TIMEOUT)
        .send()
        .await
        .map_err(request_error)?;

    if !response.status().is_success() {
        return Err(DatasetError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    // Check content-length header if available
    if let Some(content_length) = response.content_length() {
        if content_length > MAX_DATASET_DOWNLOAD_SIZE as u64 {
            return Err(DatasetError::TooLarge {
                url: url.to_string(),
                size: content_length as usize,
                max: MAX_DATASET_DOWNLOAD_SIZE,
            });
        }
    }

    let bytes = response.bytes().await.map_err(request_error)?.to_vec();

    // Double-check size after download (in case content-length was missing or wrong)
    if bytes.len() > MAX_DATASET_DOWNLOAD_SIZE {
        return Err(DatasetError::TooLarge {
            url: url.to_string(),
            size: bytes.len(),
            max: MAX_DATASET_DOWNLOAD_SIZE,
        });
    }

    Ok(bytes)
}

/// Writes `bytes` to a temporary file in the target's directory, then renames
/// it over `target`.
pub(crate) fn write_atomically(target: &Path, bytes: &[u8]) -> Result<(), DatasetError> {
    let io_error = |source| DatasetError::Io {
        path: target.to_path_buf(),
        source,
    };

    let dir = target.parent().ok_or_else(|| {
        io_error(std::io::Error::other("dataset path has no parent directory"))
    })?;
    std::fs::create_dir_all(dir).map_err(io_error)?;

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(bytes).map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(target).map_err(|err| io_error(err.error))?;

    Ok(())
}
