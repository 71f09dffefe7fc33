//! Snapshot catalog source
//!
//! Downloads a pre-built gzip snapshot of the whole catalog plus its
//! companion checksum artifact, verifies the SHA-256 digest before
//! trusting a single byte, then decompresses and parses the records.
//! Any integrity mismatch aborts the ingestion pass outright.

use async_trait::async_trait;
use flate2::read::GzDecoder;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::io::Read;

use super::{FetchProgress, ProgressFn, RawRecord, SourceAdapter, SourceError};

/// Integrity-checked snapshot source.
pub struct SnapshotSource {
    http_client: reqwest::Client,
    blob_url: String,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(alias = "films")]
    items: Vec<RawRecord>,
}

impl SnapshotSource {
    pub fn new(blob_url: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            blob_url: blob_url.into(),
        }
    }

    /// URL of the companion checksum artifact published next to the blob.
    fn checksum_url(&self) -> String {
        format!("{}.sha256", self.blob_url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Api(format!("HTTP {status} for {url}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SourceAdapter for SnapshotSource {
    async fn fetch(&self, mut progress: ProgressFn<'_>) -> Result<Vec<RawRecord>, SourceError> {
        tracing::info!("Downloading catalog snapshot from {}", self.blob_url);
        let blob = self.download(&self.blob_url).await?;

        let checksum = self.download(&self.checksum_url()).await?;
        let expected = parse_checksum(&checksum)?;

        let records = verify_and_decode(&blob, &expected)?;
        tracing::info!("Snapshot verified: {} records", records.len());

        progress(FetchProgress {
            current_items: records.len(),
            current_country: 0,
            total_countries: 0,
            country: String::new(),
        });
        Ok(records)
    }
}

/// Extract the hex digest from the checksum artifact. The artifact uses
/// the `sha256sum` layout: digest, whitespace, filename.
fn parse_checksum(artifact: &[u8]) -> Result<String, SourceError> {
    let text = std::str::from_utf8(artifact)
        .map_err(|e| SourceError::Parse(format!("checksum artifact is not UTF-8: {e}")))?;
    text.split_whitespace()
        .next()
        .map(|digest| digest.to_ascii_lowercase())
        .ok_or_else(|| SourceError::Parse("checksum artifact is empty".to_string()))
}

/// Verify the blob's SHA-256 digest against `expected`, then decompress
/// and parse it. Verification happens on the compressed bytes exactly as
/// downloaded.
fn verify_and_decode(blob: &[u8], expected: &str) -> Result<Vec<RawRecord>, SourceError> {
    let actual = sha256_hex(blob);
    if actual != expected {
        return Err(SourceError::IntegrityMismatch {
            expected: expected.to_string(),
            actual,
        });
    }

    let mut decoder = GzDecoder::new(blob);
    let mut json = String::new();
    decoder
        .read_to_string(&mut json)
        .map_err(|e| SourceError::Decompress(e.to_string()))?;

    let file: SnapshotFile =
        serde_json::from_str(&json).map_err(|e| SourceError::Parse(e.to_string()))?;
    Ok(file.items)
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(json: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(json.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    const SNAPSHOT_JSON: &str = r#"{
        "items": [
            {"id": 1, "title": "One", "available_countries": {
                "DE": {"available_at": "2024-01-01T00:00:00Z"}
            }},
            {"id": 2, "title": "Two"}
        ]
    }"#;

    #[test]
    fn valid_blob_decodes() {
        let blob = gzip(SNAPSHOT_JSON);
        let digest = sha256_hex(&blob);

        let records = verify_and_decode(&blob, &digest).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert!(records[0].availability.contains_key("DE"));
    }

    #[test]
    fn digest_mismatch_is_fatal() {
        let blob = gzip(SNAPSHOT_JSON);
        let wrong = "0".repeat(64);

        let err = verify_and_decode(&blob, &wrong).unwrap_err();
        match err {
            SourceError::IntegrityMismatch { expected, actual } => {
                assert_eq!(expected, wrong);
                assert_eq!(actual, sha256_hex(&blob));
            }
            other => panic!("expected integrity mismatch, got {other:?}"),
        }
    }

    #[test]
    fn garbage_with_matching_digest_fails_decompression() {
        let blob = b"not gzip at all".to_vec();
        let digest = sha256_hex(&blob);
        assert!(matches!(
            verify_and_decode(&blob, &digest),
            Err(SourceError::Decompress(_))
        ));
    }

    #[test]
    fn checksum_artifact_first_token_wins() {
        let artifact = b"abc123  catalog.json.gz\n";
        assert_eq!(parse_checksum(artifact).unwrap(), "abc123");
    }

    #[test]
    fn uppercase_digests_are_normalized() {
        let artifact = b"ABC123";
        assert_eq!(parse_checksum(artifact).unwrap(), "abc123");
    }

    #[test]
    fn empty_checksum_artifact_is_an_error() {
        assert!(matches!(
            parse_checksum(b"  \n"),
            Err(SourceError::Parse(_))
        ));
    }
}
