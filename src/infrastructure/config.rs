use crate::domain::error::TranslateError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gemma3:4b";
pub const DEFAULT_HOST: &str = "http://127.0.0.1:11434";
pub const DEFAULT_PORT: u16 = 11434;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_ollama_command")]
    pub ollama_command: String,
    /// Total request timeout. Unset means wait for the model as long as it takes.
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Logging {
    /// Filter directive for the subscriber. `--verbose` always shows status lines.
    pub fn filter_directive(&self, verbose: bool) -> &'static str {
        if verbose {
            return "info";
        }
        match self.level.to_ascii_uppercase().as_str() {
            "DEBUG" => "debug",
            "INFO" => "info",
            "WARN" => "warn",
            "ERROR" => "error",
            _ => "error",
        }
    }

    /// `RUST_LOG` wins when set; otherwise `--verbose` or the configured level.
    pub fn filter_spec(&self, verbose: bool, rust_log: Option<&str>) -> String {
        match rust_log.map(str::trim) {
            Some(spec) if !spec.is_empty() => spec.to_string(),
            _ => self.filter_directive(verbose).to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            ollama_command: default_ollama_command(),
            timeout_secs: None,
            logging: Logging::default(),
        }
    }
}

impl Config {
    /// Server base URL, with `OLLAMA_HOST` taking precedence over the file.
    pub fn resolved_host(&self) -> String {
        match std::env::var("OLLAMA_HOST") {
            Ok(host) if !host.trim().is_empty() => normalize_host(&host),
            _ => normalize_host(&self.host),
        }
    }
}

// Defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_ollama_command() -> String {
    "ollama".to_string()
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "ERROR".to_string()
}

/// Accepts `host`, `host:port` or a full URL and returns a base URL.
pub fn normalize_host(raw: &str) -> String {
    let raw = raw.trim().trim_end_matches('/');
    let (scheme, rest) = match raw.split_once("://") {
        Some((scheme, rest)) => (scheme, rest),
        None => ("http", raw),
    };

    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    // 0.0.0.0 是监听地址，客户端连本机
    let authority = match authority {
        "" => "127.0.0.1",
        "0.0.0.0" => "127.0.0.1",
        other => other,
    };

    let has_port = match authority.rfind(':') {
        // IPv6 literals carry colons inside the brackets
        Some(idx) => !authority[idx..].contains(']'),
        None => false,
    };
    if has_port {
        format!("{}://{}{}", scheme, authority, path)
    } else {
        let port = if scheme == "https" { 443 } else { DEFAULT_PORT };
        format!("{}://{}:{}{}", scheme, authority, port, path)
    }
}

/// `~/.config/translate`
pub fn get_config_root() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("translate")
}

pub fn get_config_path() -> PathBuf {
    get_config_root().join("config.toml")
}

pub fn get_prompts_dir() -> PathBuf {
    get_config_root().join("prompts")
}

pub fn load_config() -> Result<Config, TranslateError> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(path: &Path) -> Result<Config, TranslateError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host_variants() {
        assert_eq!(normalize_host("http://127.0.0.1:11434"), "http://127.0.0.1:11434");
        assert_eq!(normalize_host("localhost"), "http://localhost:11434");
        assert_eq!(normalize_host("example.com:8080"), "http://example.com:8080");
        assert_eq!(normalize_host("https://ollama.lan/"), "https://ollama.lan:443");
        assert_eq!(normalize_host("0.0.0.0"), "http://127.0.0.1:11434");
        assert_eq!(normalize_host("[::1]:9000"), "http://[::1]:9000");
        assert_eq!(normalize_host("[::1]"), "http://[::1]:11434");
    }

    #[test]
    fn test_filter_directive() {
        let mut logging = Logging::default();
        assert_eq!(logging.filter_directive(false), "error");
        assert_eq!(logging.filter_directive(true), "info");

        logging.level = "debug".to_string();
        assert_eq!(logging.filter_directive(false), "debug");

        logging.level = "nonsense".to_string();
        assert_eq!(logging.filter_directive(false), "error");
    }

    #[test]
    fn test_rust_log_takes_precedence() {
        let logging = Logging::default();
        assert_eq!(logging.filter_spec(true, Some("warn")), "warn");
        assert_eq!(logging.filter_spec(false, Some("translate=debug")), "translate=debug");
        assert_eq!(logging.filter_spec(true, None), "info");
        assert_eq!(logging.filter_spec(false, Some("  ")), "error");
    }

    #[test]
    fn test_config_paths_share_root() {
        let root = get_config_root();
        assert!(get_prompts_dir().starts_with(&root));
        assert!(get_config_path().starts_with(&root));
        assert!(root.ends_with(".config/translate"));
    }
}
