//! Document store trait for keyed article-record persistence

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ArticleRecord;

/// Trait for keyed storage of enriched article records
///
/// Implementations:
/// - `FirestoreStore`: Google Cloud Firestore
///
/// Writes are full overwrites; there is no partial merge. A clean miss on
/// `get` is `Ok(None)`, distinct from transport or API failures.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the record stored under `id`, if any
    async fn get(&self, id: &str) -> Result<Option<ArticleRecord>>;

    /// Insert or overwrite the record stored under `id`
    async fn set(&self, id: &str, record: &ArticleRecord) -> Result<()>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
