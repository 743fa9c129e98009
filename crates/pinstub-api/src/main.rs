//! # pinstub — Binary Entry Point
//!
//! Parses configuration from flags and environment, opens the pin store
//! under the public root and serves the API on `0.0.0.0:<port>`.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use pinstub_api::state::{AppConfig, AppState, DEFAULT_AUTH_TOKEN, DEFAULT_MAX_UPLOAD_BYTES};
use pinstub_store::PinStore;

/// Development stand-in for a content-pinning API.
///
/// Pins JSON documents and files under their CIDv1 in `<public>/ipfs` and
/// serves the public directory as static files.
#[derive(Parser, Debug)]
#[command(name = "pinstub", version, about, long_about = None)]
struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PINSTUB_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,

    /// Public directory. Pinned objects are written to its `ipfs` subdirectory.
    #[arg(long = "public", env = "PINSTUB_PUBLIC_PATH")]
    public: PathBuf,

    /// Bearer token required by the pinning routes.
    #[arg(long, env = "PINSTUB_AUTH_TOKEN", default_value = DEFAULT_AUTH_TOKEN, hide_env_values = true)]
    auth_token: String,

    /// Largest request body accepted by the pinning routes, in bytes.
    #[arg(long, env = "PINSTUB_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    max_upload_bytes: usize,

    /// Log output format.
    #[arg(long, env = "PINSTUB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

impl Cli {
    fn into_config(self) -> AppConfig {
        AppConfig {
            port: self.port,
            public_root: self.public,
            auth_token: self.auth_token,
            max_upload_bytes: self.max_upload_bytes,
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = cli.into_config();
    tracing::debug!(?config, "configuration loaded");

    let store = PinStore::open(&config.public_root).await.with_context(|| {
        format!(
            "failed to open pin store under {}",
            config.public_root.display()
        )
    })?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let public_root = config.public_root.clone();
    let app = pinstub_api::app(AppState::new(config, store));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, public_root = %public_root.display(), "pinstub listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_port_and_public() {
        assert!(Cli::try_parse_from(["pinstub"]).is_err());
        assert!(Cli::try_parse_from(["pinstub", "--port", "8080"]).is_err());
        assert!(Cli::try_parse_from(["pinstub", "--public", "/srv"]).is_err());
    }

    #[test]
    fn defaults_applied() {
        let cli = Cli::try_parse_from(["pinstub", "--port", "3000", "--public", "/srv/public"])
            .unwrap();
        assert_eq!(cli.log_format, LogFormat::Text);
        let config = cli.into_config();
        assert_eq!(config.port, 3000);
        assert_eq!(config.public_root, PathBuf::from("/srv/public"));
        assert_eq!(config.auth_token, "development-token");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
    }

    #[test]
    fn overrides_parsed() {
        let cli = Cli::try_parse_from([
            "pinstub",
            "--port",
            "9000",
            "--public",
            "./public",
            "--auth-token",
            "other",
            "--max-upload-bytes",
            "1024",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        let config = cli.into_config();
        assert_eq!(config.auth_token, "other");
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn port_zero_rejected() {
        assert!(Cli::try_parse_from(["pinstub", "--port", "0", "--public", "/srv"]).is_err());
    }

    #[test]
    fn unknown_log_format_rejected() {
        assert!(Cli::try_parse_from([
            "pinstub",
            "--port",
            "1",
            "--public",
            "/srv",
            "--log-format",
            "xml"
        ])
        .is_err());
    }
}
