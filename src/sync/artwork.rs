//! Artwork download for library entries.
//!
//! One poster image per item directory, fetched once: an existing file
//! is never re-downloaded, keeping repeated syncs cheap.

use std::path::Path;

use super::SyncError;

/// Download `url` to `path` unless the file already exists.
/// Returns `true` when a download actually happened.
pub async fn download_if_missing(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<bool, SyncError> {
    if path.exists() {
        return Ok(false);
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SyncError::Artwork(url.to_string(), e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SyncError::Artwork(
            url.to_string(),
            format!("HTTP {status}"),
        ));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| SyncError::Artwork(url.to_string(), e.to_string()))?;

    std::fs::write(path, &bytes)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn existing_file_short_circuits_without_network() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("poster.jpg");
        std::fs::write(&path, b"already here").unwrap();

        // Unroutable URL: reaching the network would fail the test.
        let client = reqwest::Client::new();
        let downloaded = download_if_missing(&client, "http://invalid.localdomain/p.jpg", &path)
            .await
            .unwrap();

        assert!(!downloaded);
        assert_eq!(std::fs::read(&path).unwrap(), b"already here");
    }
}
