use clap::Args;
use std::future::IntoFuture;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use utoipa_swagger_ui::SwaggerUi;

use prensa_core::plugin::PluginManager;
use prensa_core::ServerConfig;
use prensa_gateway::GatewayPlugin;
use prensa_livestream::LiveStreamPlugin;

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1:3000", env = "PRENSA_ADDRESS")]
    pub address: String,

    /// Data directory for storing configuration and runtime files
    #[arg(long, env = "PRENSA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Port of the article backend on private networks
    #[arg(long, default_value_t = prensa_core::config::DEFAULT_LOCAL_API_PORT, env = "PRENSA_LOCAL_API_PORT")]
    pub local_api_port: u16,

    /// Base URL of the article backend for public traffic
    #[arg(long, env = "PRENSA_PUBLIC_API_URL")]
    pub public_api_url: Option<String>,
}

impl ServeCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let server_config = Arc::new(ServerConfig::new(
            self.address.clone(),
            self.data_dir.clone(),
            self.local_api_port,
            self.public_api_url.clone(),
        )?);

        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(serve(server_config))
    }
}

async fn serve(config: Arc<ServerConfig>) -> anyhow::Result<()> {
    let mut plugin_manager = PluginManager::new();

    plugin_manager.register_plugin(Box::new(GatewayPlugin::new(config.clone())));
    plugin_manager.register_plugin(Box::new(LiveStreamPlugin::new(config.clone())));

    if let Err(e) = plugin_manager.initialize_plugins().await {
        tracing::error!("Plugin initialization failed: {}", e);
        return Err(anyhow::anyhow!("Plugin initialization failed: {}", e));
    }
    debug!("All plugins initialized successfully");

    let openapi = plugin_manager
        .get_unified_openapi()
        .map_err(|e| anyhow::anyhow!("Failed to build OpenAPI schema: {}", e))?;

    // CORS configuration - the front-end is served separately and calls
    // these endpoints cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = plugin_manager
        .build_application()
        .map_err(|e| anyhow::anyhow!("Failed to build application: {}", e))?
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .layer(cors);

    let listener = TcpListener::bind(&config.address).await?;
    info!("Prensa server listening on {}", config.address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future()
        .await?;

    info!("Prensa server exited");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
