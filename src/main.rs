// Main entry point
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::time::Duration;
use translate::application::{self, run::TransformArgs};
use translate::infrastructure::config::{self, load_config, Logging};
use translate::infrastructure::control::OllamaCli;
use translate::infrastructure::network::{http::create_client, ollama::OllamaClient};
use translate::infrastructure::storage::prompts::PromptStore;
use translate::interfaces::cli::{Cli, Mode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let mode = match cli.mode() {
        Ok(mode) => mode,
        Err(e) => e.exit(),
    };

    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging, cli.verbose)?;
    }

    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    application::run::install_panic_hook();

    let store = PromptStore::new(config::get_prompts_dir());
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();

    match mode {
        Mode::List => {
            application::list::list_prompts(&store, &mut stdout)?;
            Ok(ExitCode::SUCCESS)
        }
        Mode::Transform { prompt_name, text } => {
            let model = cli.model.unwrap_or_else(|| config.model.clone());
            let client = create_client(config.timeout_secs.map(Duration::from_secs))?;
            let backend = OllamaClient::new(client, config.resolved_host());
            let control = OllamaCli::new(config.ollama_command.clone());

            let args = TransformArgs {
                prompt_name,
                text,
                model,
            };
            let status = application::run::run_transform(
                &store,
                &backend,
                &control,
                &args,
                &mut stdout,
                &mut stderr,
            )
            .await;
            Ok(status.exit_code())
        }
    }
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging, verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let rust_log = std::env::var("RUST_LOG").ok();
    let spec = logging.filter_spec(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&spec)
        .unwrap_or_else(|_| EnvFilter::new(logging.filter_directive(verbose)));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    Ok(())
}
