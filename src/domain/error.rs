use std::path::PathBuf;
use thiserror::Error;

/// Prefix shared by every user-facing failure message.
pub const ERROR_PREFIX: &str = "Error:";

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("Prompt file not found: {}", .0.display())]
    PromptNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failures reported by the chat backend.
///
/// Each kind renders its own message, all starting with [`ERROR_PREFIX`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Error: Model '{model}' not found. Pull it with `ollama pull {model}`.")]
    ModelNotFound { model: String },

    #[error("Error: Ollama API error: {0}")]
    Api(String),

    #[error("Error: Could not connect to Ollama. Is the server running?\nDetails: {0}")]
    Connection(String),
}

/// Failures of the model unload step. These are only ever logged.
#[derive(Error, Debug)]
pub enum UnloadError {
    #[error("'{0}' command not found. Is Ollama installed and in your PATH?")]
    CommandNotFound(String),

    #[error("Error unloading model: {0}")]
    Failed(String),

    #[error("Error unloading model: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_share_prefix() {
        let errors = [
            BackendError::ModelNotFound {
                model: "gemma3:4b".to_string(),
            },
            BackendError::Api("boom".to_string()),
            BackendError::Connection("connection refused".to_string()),
        ];

        for err in errors {
            assert!(err.to_string().starts_with(ERROR_PREFIX), "{err}");
        }
    }

    #[test]
    fn test_model_not_found_mentions_pull() {
        let err = BackendError::ModelNotFound {
            model: "qwen2.5:3b".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error: Model 'qwen2.5:3b' not found. Pull it with `ollama pull qwen2.5:3b`."
        );
    }

    #[test]
    fn test_connection_message_has_details() {
        let err = BackendError::Connection("tcp connect error".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Is the server running?"));
        assert!(msg.ends_with("Details: tcp connect error"));
    }

    #[test]
    fn test_prompt_not_found_shows_path() {
        let err = TranslateError::PromptNotFound(PathBuf::from("/tmp/prompts/missing.txt"));
        assert_eq!(
            err.to_string(),
            "Prompt file not found: /tmp/prompts/missing.txt"
        );
    }
}
