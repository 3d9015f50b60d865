use crate::domain::error::UnloadError;
use crate::domain::model::UnloadOutcome;
use crate::domain::traits::ModelControl;
use tracing::{info, warn};

/// Ask the backend to unload `model`. Never fails; problems are only logged.
pub async fn unload_model(control: &dyn ModelControl, model: &str) {
    info!("Unloading model '{}'...", model);

    match control.stop(model).await {
        Ok(UnloadOutcome::Unloaded) => info!("Model '{}' unloaded successfully.", model),
        Ok(UnloadOutcome::NotRunning) => info!("Info: Model '{}' was not running.", model),
        Err(e @ UnloadError::CommandNotFound(_)) => warn!("Error: {}", e),
        Err(e) => warn!("{}", e),
    }
}
