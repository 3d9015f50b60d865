use serde::Serialize;

// 采样参数固定，不开放配置
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;
pub const REPEAT_PENALTY: f32 = 1.1;
pub const NUM_PREDICT: u32 = 100;

/// A named system instruction loaded from the prompts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Decoding options sent with every chat request.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub num_predict: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            repeat_penalty: REPEAT_PENALTY,
            num_predict: NUM_PREDICT,
        }
    }
}

/// One chat completion request: system prompt plus user text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: SamplingOptions,
}

impl ChatRequest {
    pub fn new(model: &str, system_prompt: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(system_prompt), ChatMessage::user(text)],
            options: SamplingOptions::default(),
        }
    }
}

/// Result of a successful `ollama stop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnloadOutcome {
    Unloaded,
    NotRunning,
}

/// Result of listing the prompts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptListing {
    MissingDirectory,
    Empty,
    Found(Vec<String>),
}
