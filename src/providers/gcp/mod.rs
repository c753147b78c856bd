//! Google Cloud provider implementations
//!
//! All clients share one `GcpAuth` (cloned, common token cache) and talk
//! REST directly: Vertex AI for embeddings, generation, and vector search,
//! Firestore for records, the Natural Language API for entity analysis.

pub mod auth;
pub mod embedder;
pub mod firestore;
pub mod gemini;
pub mod language;
pub mod vector_search;

pub use auth::GcpAuth;
pub use embedder::VertexEmbedder;
pub use firestore::FirestoreStore;
pub use gemini::GeminiModel;
pub use language::LanguageApiAnalyzer;
pub use vector_search::VertexVectorSearch;
