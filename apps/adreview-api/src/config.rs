//! Command-line and environment configuration

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};

/// Default upload cap (10 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default upstream budget
pub const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 9000;

/// Command-line arguments for the ad review server
#[derive(Parser, Debug)]
#[command(name = "adreview-api")]
#[command(about = "Scores an uploaded advertisement image with a vision model")]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Browser origin allowed by CORS (any origin when unset)
    #[arg(long, env = "ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Anthropic API base URL
    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = vision_client::anthropic::DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Model used for the review
    #[arg(long, env = "ANTHROPIC_MODEL", default_value = vision_client::anthropic::DEFAULT_MODEL)]
    pub model: String,

    /// Maximum tokens in the model reply
    #[arg(long, default_value_t = vision_client::anthropic::DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Upstream timeout in milliseconds (0 waits indefinitely)
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT_MS)]
    pub upstream_timeout_ms: u64,

    /// Largest accepted upload in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Directory for temporary uploads (OS temp dir when unset)
    #[arg(long, env = "UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            allowed_origin: self.allowed_origin.clone(),
            upstream_timeout: (self.upstream_timeout_ms > 0)
                .then(|| Duration::from_millis(self.upstream_timeout_ms)),
            max_upload_bytes: self.max_upload_bytes,
            upload_dir: self
                .upload_dir
                .clone()
                .unwrap_or_else(std::env::temp_dir),
        }
    }
}

/// Server settings, built once at startup and shared with handlers
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `None` allows any origin
    pub allowed_origin: Option<String>,
    /// `None` waits for the upstream indefinitely
    pub upstream_timeout: Option<Duration>,
    pub max_upload_bytes: usize,
    pub upload_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            allowed_origin: None,
            upstream_timeout: Some(Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            upload_dir: std::env::temp_dir(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]);

        Ok(match &self.allowed_origin {
            Some(origin) => cors.allow_origin(origin.parse::<HeaderValue>()?),
            None => cors.allow_origin(Any),
        })
    }
}
