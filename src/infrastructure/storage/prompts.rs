// Prompt templates stored as <name>.txt files
use crate::domain::error::TranslateError;
use crate::domain::model::{Prompt, PromptListing};
use std::fs;
use std::path::{Path, PathBuf};

const PROMPT_EXTENSION: &str = "txt";

/// Read-only view over the prompts directory.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, PROMPT_EXTENSION))
    }

    /// Load a prompt by name, returning its trimmed content.
    ///
    /// A file that exists but cannot be read is reported as not found too.
    pub fn load(&self, name: &str) -> Result<Prompt, TranslateError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(TranslateError::PromptNotFound(path));
        }

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Prompt {
                name: name.to_string(),
                content: content.trim().to_string(),
            }),
            Err(e) => {
                tracing::debug!("Failed to read prompt {}: {}", path.display(), e);
                Err(TranslateError::PromptNotFound(path))
            }
        }
    }

    /// Names of all `*.txt` files, sorted.
    pub fn list(&self) -> Result<PromptListing, TranslateError> {
        if !self.dir.is_dir() {
            return Ok(PromptListing::MissingDirectory);
        }

        let mut names: Vec<String> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(PROMPT_EXTENSION)
            })
            .filter_map(|path| {
                path.file_stem()
                    .and_then(|stem| stem.to_str())
                    .map(str::to_string)
            })
            .collect();

        if names.is_empty() {
            return Ok(PromptListing::Empty);
        }

        names.sort();
        Ok(PromptListing::Found(names))
    }
}
