//! Waif server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the
//! SQLite store and the on-disk image store, wires the SMTP mailer if
//! configured, and serves the JSON API.

use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use waif_api::{AppState, ServerConfig};
use waif_core::{engine::ReportEngine, mail::Mailer};
use waif_mail::{NullMailer, SmtpConfig, SmtpMailer};
use waif_media::DiskImageStore;
use waif_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Waif lost-and-found server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WAIF"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Open the SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| {
      format!("failed to open store at {:?}", server_cfg.store_path)
    })?;

  // Open the on-disk image store.
  let images = DiskImageStore::open(
    &server_cfg.media_dir,
    server_cfg.media_base_url.clone(),
  )
  .await
  .with_context(|| {
    format!("failed to open media dir {:?}", server_cfg.media_dir)
  })?;

  // Wire the mailer.
  let mailer: Arc<dyn Mailer> = match &server_cfg.smtp {
    Some(smtp) => Arc::new(
      SmtpMailer::new(&SmtpConfig {
        host:     smtp.host.clone(),
        username: smtp.username.clone(),
        password: smtp.password.clone(),
        from:     smtp.from.clone(),
      })
      .context("failed to build smtp transport")?,
    ),
    None => {
      tracing::warn!(
        "no [smtp] config; claim notifications will be logged and dropped"
      );
      Arc::new(NullMailer)
    }
  };

  // Assemble the engine and serve.
  let engine = ReportEngine::new(store, Arc::new(images), mailer);
  let state = AppState {
    engine: Arc::new(engine),
    config: Arc::new(server_cfg.clone()),
  };

  let app = waif_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
