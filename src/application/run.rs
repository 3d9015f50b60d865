use crate::application::transform::{is_failure, transform_text};
use crate::application::unload::unload_model;
use crate::domain::model::Prompt;
use crate::domain::traits::{ChatBackend, ModelControl};
use crate::infrastructure::storage::prompts::PromptStore;
use futures_util::FutureExt;
use std::any::Any;
use std::cell::Cell;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::{debug, info, warn};

/// Printed on stdout whenever the transform does not produce usable text
pub const FAILURE_MESSAGE: &str = "Error: Could not transform text";

thread_local! {
    static GUARDED: Cell<bool> = const { Cell::new(false) };
}

/// Set while the transform runs under `catch_unwind` on this thread
struct GuardedRegion;

impl GuardedRegion {
    fn enter() -> Self {
        GUARDED.with(|guarded| guarded.set(true));
        GuardedRegion
    }
}

impl Drop for GuardedRegion {
    fn drop(&mut self) {
        GUARDED.with(|guarded| guarded.set(false));
    }
}

pub fn in_guarded_region() -> bool {
    GUARDED.with(Cell::get)
}

/// Route panics inside the guarded transform to the debug log, since the run
/// reports them itself. Panics anywhere else go to the previous hook.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if in_guarded_region() {
            debug!("{}", info);
        } else {
            previous(info);
        }
    }));
}

#[derive(Debug, Clone)]
pub struct TransformArgs {
    pub prompt_name: String,
    pub text: Vec<String>,
    pub model: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            RunStatus::Success => ExitCode::SUCCESS,
            RunStatus::Failure => ExitCode::from(1),
        }
    }
}

/// Resolve the prompt, transform the text and print the result.
///
/// A missing prompt fails before the backend is touched and is reported on
/// `err` regardless of the log filter. Once the prompt is
/// resolved the model is unloaded exactly once, whether the transform
/// succeeded, failed or panicked. The unload result never changes the status.
pub async fn run_transform(
    store: &PromptStore,
    backend: &dyn ChatBackend,
    control: &dyn ModelControl,
    args: &TransformArgs,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> RunStatus {
    let prompt = match store.load(&args.prompt_name) {
        Ok(prompt) => prompt,
        Err(e) => {
            writeln!(err, "Error: {}", e).ok();
            err.flush().ok();
            return RunStatus::Failure;
        }
    };

    let input_text = args.text.join(" ");
    let outcome = {
        let _region = GuardedRegion::enter();
        AssertUnwindSafe(transform_and_print(
            backend,
            &prompt,
            &input_text,
            &args.model,
            out,
        ))
        .catch_unwind()
        .await
    };

    let status = match outcome {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            warn!("An unexpected critical error occurred: {}", e);
            RunStatus::Failure
        }
        Err(payload) => {
            warn!(
                "An unexpected critical error occurred: {}",
                panic_message(&*payload)
            );
            RunStatus::Failure
        }
    };

    unload_model(control, &args.model).await;
    status
}

async fn transform_and_print(
    backend: &dyn ChatBackend,
    prompt: &Prompt,
    input_text: &str,
    model: &str,
    out: &mut dyn Write,
) -> std::io::Result<RunStatus> {
    info!("Input: {}", input_text);
    info!("Using prompt: {}", prompt.name);

    let output = match transform_text(backend, input_text, &prompt.content, model).await {
        Ok(text) => text,
        Err(e) => e.to_string(),
    };

    if is_failure(&output) {
        warn!("Model output issue: {}", output);
        writeln!(out, "{}", FAILURE_MESSAGE)?;
        out.flush()?;
        return Ok(RunStatus::Failure);
    }

    writeln!(out, "{}", output)?;
    out.flush()?;
    Ok(RunStatus::Success)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
