use crate::domain::error::BackendError;
use crate::domain::model::{ChatMessage, ChatRequest, SamplingOptions};
use crate::domain::traits::ChatBackend;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

// Ollama /api/chat request body
#[derive(Serialize, Debug)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: &'a SamplingOptions,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    message: Option<ResponseMessage>,
    error: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: String,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: String,
}

/// Client for a local Ollama server
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for OllamaClient {
    async fn chat(&self, request: &ChatRequest) -> Result<String, BackendError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = ChatBody {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            options: &request.options,
        };

        tracing::debug!("POST {} model={}", url, request.model);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(&request.model, status.as_u16(), &text));
        }

        let parsed = response.json::<ChatResponse>().await.map_err(|e| {
            if e.is_decode() {
                BackendError::Api(format!("invalid response body: {}", e))
            } else {
                transport_error(e)
            }
        })?;

        if let Some(error) = parsed.error {
            return Err(classify_message(&request.model, error));
        }

        parsed
            .message
            .map(|m| m.content)
            .ok_or_else(|| BackendError::Api("response did not contain a message".to_string()))
    }
}

/// Map a non-success response to a backend error kind.
pub fn classify_error(model: &str, status: u16, body: &str) -> BackendError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => format!("HTTP status {}", status),
    };
    classify_message(model, message)
}

// Only the error text decides; a bare 404 may come from a proxy or another server.
fn classify_message(model: &str, message: String) -> BackendError {
    // e.g. `model "gemma3:4b" not found, try pulling it first`
    let lower = message.to_lowercase();
    if lower.contains("model") && lower.contains("not found") {
        BackendError::ModelNotFound {
            model: model.to_string(),
        }
    } else {
        BackendError::Api(message)
    }
}

/// A timeout after the connection succeeded is reported as an API error, not as an unreachable server.
fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() && !err.is_connect() {
        BackendError::Api(format!(
            "no reply before the request timeout: {}",
            error_chain(&err)
        ))
    } else {
        BackendError::Connection(error_chain(&err))
    }
}

// reqwest hides the interesting part (e.g. "Connection refused") in the source chain
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        source = inner.source();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::network::http::create_client;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let len = headers
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + len {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Serve a single canned response and hand back the raw request.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });
        (format!("http://{}", addr), handle)
    }

    fn backend(base_url: &str) -> OllamaClient {
        OllamaClient::new(create_client(Some(Duration::from_secs(5))).unwrap(), base_url)
    }

    #[tokio::test]
    async fn test_chat_success_sends_expected_body() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"model":"gemma3:4b","message":{"role":"assistant","content":"  Bonjour  "},"done":true}"#,
        )
        .await;

        let request = ChatRequest::new("gemma3:4b", "Translate to French", "hello");
        let content = backend(&url).chat(&request).await.unwrap();
        assert_eq!(content, "  Bonjour  ");

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/chat "));
        let body = raw.split("\r\n\r\n").nth(1).unwrap();
        let json: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(json["model"], "gemma3:4b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], "Translate to French");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "hello");
        assert_eq!(json["options"]["temperature"].as_f64(), Some(0.7));
        assert_eq!(json["options"]["top_p"].as_f64(), Some(0.9));
        assert_eq!(json["options"]["repeat_penalty"].as_f64(), Some(1.1));
        assert_eq!(json["options"]["num_predict"], 100);
    }

    #[tokio::test]
    async fn test_chat_model_not_found() {
        let (url, _server) = serve_once(
            "404 Not Found",
            r#"{"error":"model \"tiny:1b\" not found, try pulling it first"}"#,
        )
        .await;

        let request = ChatRequest::new("tiny:1b", "p", "t");
        let err = backend(&url).chat(&request).await.unwrap_err();
        assert_eq!(
            err,
            BackendError::ModelNotFound {
                model: "tiny:1b".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_plain_404_is_api_error() {
        let (url, _server) = serve_once("404 Not Found", "404 page not found").await;

        let request = ChatRequest::new("gemma3:4b", "p", "t");
        let err = backend(&url).chat(&request).await.unwrap_err();
        assert_eq!(err, BackendError::Api("404 page not found".to_string()));
    }

    #[tokio::test]
    async fn test_slow_reply_is_not_connection_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            // Model still loading
            tokio::time::sleep(Duration::from_secs(5)).await;
        });

        let client = create_client(Some(Duration::from_millis(500))).unwrap();
        let request = ChatRequest::new("gemma3:4b", "p", "t");
        let err = OllamaClient::new(client, format!("http://{}", addr))
            .chat(&request)
            .await
            .unwrap_err();

        assert!(matches!(err, BackendError::Api(_)), "{:?}", err);
        assert!(!err.to_string().contains("Could not connect"));
        assert!(err.to_string().starts_with("Error:"));
    }

    #[tokio::test]
    async fn test_chat_server_error_is_api_error() {
        let (url, _server) =
            serve_once("500 Internal Server Error", r#"{"error":"out of memory"}"#).await;

        let request = ChatRequest::new("gemma3:4b", "p", "t");
        let err = backend(&url).chat(&request).await.unwrap_err();
        assert_eq!(err, BackendError::Api("out of memory".to_string()));
    }

    #[tokio::test]
    async fn test_chat_unreachable_is_connection_error() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let request = ChatRequest::new("gemma3:4b", "p", "t");
        let err = backend(&format!("http://{}", addr))
            .chat(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Connection(_)));
        assert!(err.to_string().starts_with("Error:"));
    }

    #[test]
    fn test_classify_error_fallbacks() {
        assert_eq!(
            classify_error("m", 502, ""),
            BackendError::Api("HTTP status 502".to_string())
        );
        assert_eq!(
            classify_error("m", 400, "bad request"),
            BackendError::Api("bad request".to_string())
        );
        assert_eq!(
            classify_error("m", 404, "404 page not found"),
            BackendError::Api("404 page not found".to_string())
        );
        assert_eq!(
            classify_error("m", 400, r#"{"error":"model 'm' not found"}"#),
            BackendError::ModelNotFound {
                model: "m".to_string()
            }
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = backend("http://127.0.0.1:11434/");
        assert_eq!(client.base_url(), "http://127.0.0.1:11434");
    }
}
