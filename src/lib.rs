//! Transform text with a local Ollama model using named prompt files.
//!
//! Prompts live in `~/.config/translate/prompts/<name>.txt`. Each run sends one
//! chat request, cleans the reply and always asks Ollama to unload the model.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
