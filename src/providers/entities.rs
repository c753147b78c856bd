//! Entity analysis trait for API-based named-entity extraction

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ApiEntity;

/// Trait for API-backed entity analysis
///
/// Implementations:
/// - `LanguageApiAnalyzer`: Google Cloud Natural Language API
#[async_trait]
pub trait EntityAnalyzer: Send + Sync {
    /// Extract named entities from plain text, in salience order
    async fn analyze_entities(&self, text: &str) -> Result<Vec<ApiEntity>>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
