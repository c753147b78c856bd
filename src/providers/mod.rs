//! Provider abstractions for embeddings, generation, vector search, and storage
//!
//! Every external collaborator sits behind one of these traits so the
//! pipelines can be wired against Google Cloud in production and against
//! in-memory fakes in tests.

pub mod document_store;
pub mod embedding;
pub mod entities;
pub mod gcp;
pub mod generative;
pub mod vector_index;

pub use document_store::DocumentStore;
pub use embedding::EmbeddingProvider;
pub use entities::EntityAnalyzer;
pub use generative::GenerativeModel;
pub use vector_index::{Neighbor, VectorIndex};
