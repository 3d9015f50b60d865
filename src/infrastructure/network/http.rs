// HTTP client utilities
use crate::domain::error::TranslateError;
use reqwest::Client;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the HTTP client used to talk to the Ollama server
///
/// Loading a model can take minutes, so the total timeout is only set on request.
pub fn create_client(timeout: Option<Duration>) -> Result<Client, TranslateError> {
    let mut builder = Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .user_agent(concat!("translate/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}
