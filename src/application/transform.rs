use crate::domain::cleaning::clean_model_output;
use crate::domain::error::{BackendError, ERROR_PREFIX};
use crate::domain::model::ChatRequest;
use crate::domain::traits::ChatBackend;
use tracing::info;

/// Send `text` with `system_prompt` to the backend and clean the reply.
pub async fn transform_text(
    backend: &dyn ChatBackend,
    text: &str,
    system_prompt: &str,
    model: &str,
) -> Result<String, BackendError> {
    info!("Loading model '{}' and transforming text...", model);

    let request = ChatRequest::new(model, system_prompt, text);
    let content = backend.chat(&request).await?;
    Ok(clean_model_output(&content))
}

/// Whether a transform result should be treated as a failure.
pub fn is_failure(output: &str) -> bool {
    output.is_empty() || output.starts_with(ERROR_PREFIX)
}
