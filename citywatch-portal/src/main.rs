//! citywatch-portal - Civic complaint intake and triage portal
//!
//! Single-process web application: citizen submission/tracking portal plus
//! the admin dashboard, backed by a SQLite record store and a local image
//! store. Burst detection and priority ranking run on every dashboard read.

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use citywatch_common::auth::load_image_secret;
use citywatch_common::config;
use citywatch_common::db::init_database;
use citywatch_portal::images::ImageStore;
use citywatch_portal::{build_router, AppState};

/// CityWatch civic complaint portal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data folder (database + images); overrides CITYWATCH_DATA and config
    #[arg(long)]
    data_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5730)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting CityWatch Portal v{} built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let data_folder = config::resolve_data_folder(args.data_folder.as_deref())?;
    config::ensure_data_folder(&data_folder)?;
    info!("Data folder: {}", data_folder.display());

    let db_path = config::database_path(&data_folder);
    let pool = init_database(&db_path).await?;
    info!("✓ Record store ready");

    let image_secret = match load_image_secret(&pool).await {
        Ok(secret) => {
            info!("✓ Image URL signing secret loaded");
            secret
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to load image signing secret: {}", e));
        }
    };

    let admin_password = config::admin_password();
    if admin_password.is_none() {
        warn!(
            "{} not set - admin login is disabled",
            config::ADMIN_PASSWORD_ENV
        );
    }

    let images = ImageStore::new(&data_folder);
    let state = AppState::new(pool, images, admin_password, image_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("citywatch-portal listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
