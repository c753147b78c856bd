//! Article sources
//!
//! A source hands the pipeline a reproducible sample of article rows.
//! The production implementation downloads a JSONL object from Cloud
//! Storage; sampling itself is pure so it can be tested without a bucket.

use async_trait::async_trait;
use google_cloud_auth::credentials::CredentialsFile;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::ArticleRow;

/// Supplier of sampled article rows for ingestion.
///
/// Implementations:
/// - [`GcsArticleSource`]: JSONL object in a Cloud Storage bucket
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Return `n` rows drawn without replacement from the filtered pool.
    ///
    /// The same `seed` over the same object yields the same rows in the
    /// same order. Fails with [`Error::SamplePoolTooSmall`] when the
    /// filtered pool cannot cover the request.
    async fn sample(&self, n: usize, max_words: Option<usize>, seed: u64)
        -> Result<Vec<ArticleRow>>;

    /// Identifier used in logs.
    fn name(&self) -> &str;
}

/// Reads article rows from a JSONL object in Cloud Storage.
pub struct GcsArticleSource {
    client: Client,
    bucket: String,
    object: String,
}

impl GcsArticleSource {
    /// Connect with the service-account key used by the rest of the stack.
    pub async fn connect(key_path: &Path, bucket: &str, object: &str) -> Result<Self> {
        let credentials = CredentialsFile::new_from_file(key_path.display().to_string())
            .await
            .map_err(|e| Error::config(format!("Could not load storage credentials: {e}")))?;
        let config = ClientConfig::default()
            .with_credentials(credentials)
            .await
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            client: Client::new(config),
            bucket: bucket.to_string(),
            object: object.to_string(),
        })
    }

    /// `gs://bucket/object` provenance string stored on every record.
    pub fn gcs_uri(&self) -> String {
        format!("gs://{}/{}", self.bucket, self.object)
    }

    async fn download_rows(&self) -> Result<Vec<ArticleRow>> {
        let request = GetObjectRequest {
            bucket: self.bucket.clone(),
            object: self.object.clone(),
            ..Default::default()
        };
        let bytes = self
            .client
            .download_object(&request, &Range::default())
            .await
            .map_err(|e| {
                Error::sampling(format!("Could not download {}: {e}", self.gcs_uri()))
            })?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::sampling(format!("Source object is not UTF-8: {e}")))?;

        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ArticleRow>(line) {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(line = line_no + 1, error = %e, "skipping malformed source line");
                }
            }
        }
        info!(rows = rows.len(), uri = %self.gcs_uri(), "downloaded article rows");
        Ok(rows)
    }
}

#[async_trait]
impl ArticleSource for GcsArticleSource {
    async fn sample(
        &self,
        n: usize,
        max_words: Option<usize>,
        seed: u64,
    ) -> Result<Vec<ArticleRow>> {
        let rows = self.download_rows().await?;
        let pool = filter_by_word_count(rows, max_words);
        info!(pool = pool.len(), requested = n, "sampling filtered pool");
        sample_rows(pool, n, seed)
    }

    fn name(&self) -> &str {
        "gcs-jsonl"
    }
}

/// Keep rows strictly under the word limit; `None` keeps everything.
pub fn filter_by_word_count(rows: Vec<ArticleRow>, max_words: Option<usize>) -> Vec<ArticleRow> {
    match max_words {
        Some(limit) => rows.into_iter().filter(|r| r.word_count() < limit).collect(),
        None => rows,
    }
}

/// Draw `n` rows without replacement, in selection order.
pub fn sample_rows(pool: Vec<ArticleRow>, n: usize, seed: u64) -> Result<Vec<ArticleRow>> {
    if pool.len() < n {
        return Err(Error::SamplePoolTooSmall {
            available: pool.len(),
            requested: n,
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let indices = rand::seq::index::sample(&mut rng, pool.len(), n);
    let mut slots: Vec<Option<ArticleRow>> = pool.into_iter().map(Some).collect();

    let mut picked = Vec::with_capacity(n);
    for i in indices {
        if let Some(row) = slots[i].take() {
            picked.push(row);
        }
    }
    Ok(picked)
}
