// Model unloading through the `ollama` command line tool
use crate::domain::error::UnloadError;
use crate::domain::model::UnloadOutcome;
use crate::domain::traits::ModelControl;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::{Command, Output};

/// Runs `<command> stop <model>`
pub struct OllamaCli {
    command: String,
}

impl OllamaCli {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl ModelControl for OllamaCli {
    async fn stop(&self, model: &str) -> Result<UnloadOutcome, UnloadError> {
        let command = self.command.clone();
        let model = model.to_string();

        // Run the process in a blocking task
        let output = tokio::task::spawn_blocking(move || {
            Command::new(&command).arg("stop").arg(&model).output()
        })
        .await
        .map_err(|e| UnloadError::Failed(e.to_string()))?;

        match output {
            Ok(output) => interpret_output(&output),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(UnloadError::CommandNotFound(self.command.clone()))
            }
            Err(e) => Err(UnloadError::Io(e)),
        }
    }
}

fn interpret_output(output: &Output) -> Result<UnloadOutcome, UnloadError> {
    if output.status.success() {
        return Ok(UnloadOutcome::Unloaded);
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if stderr.contains("no such model") {
        Ok(UnloadOutcome::NotRunning)
    } else {
        Err(UnloadError::Failed(stderr.trim().to_string()))
    }
}
