use crate::domain::error::{BackendError, UnloadError};
use crate::domain::model::{ChatRequest, UnloadOutcome};
use async_trait::async_trait;

/// Trait for chat inference backends
///
/// The Ollama HTTP client implements this; tests swap in an in-memory one.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one chat request and return the raw assistant text
    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError>;
}

/// Trait for evicting a model from the backend's memory
#[async_trait]
pub trait ModelControl: Send + Sync {
    /// Stop (unload) the named model
    async fn stop(&self, model: &str) -> Result<UnloadOutcome, UnloadError>;
}
