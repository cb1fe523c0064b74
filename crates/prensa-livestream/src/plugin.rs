//! Live-Stream Plugin implementation for the Prensa plugin system

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use prensa_core::plugin::{
    PluginContext, PluginError, PluginRoutes, PrensaPlugin, ServiceRegistrationContext,
};
use prensa_core::ServerConfig;
use utoipa::{openapi::OpenApi, OpenApi as OpenApiTrait};

use crate::handler::{configure_routes, LiveStreamApiDoc, LiveStreamState};
use crate::service::LiveStreamService;
use crate::store::{FileStore, LiveStreamStore};

/// Live-Stream Plugin wiring the file store and service into the application
pub struct LiveStreamPlugin {
    server_config: Arc<ServerConfig>,
}

impl LiveStreamPlugin {
    pub fn new(server_config: Arc<ServerConfig>) -> Self {
        Self { server_config }
    }
}

impl PrensaPlugin for LiveStreamPlugin {
    fn name(&self) -> &'static str {
        "live-stream"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let store: Arc<dyn LiveStreamStore> =
                Arc::new(FileStore::new(self.server_config.live_stream_path()));

            let live_stream_service = Arc::new(LiveStreamService::new(store));
            context.register_service(live_stream_service);

            tracing::debug!("Live-stream plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let live_stream_service = context.require_service::<LiveStreamService>();

        let live_stream_state = Arc::new(LiveStreamState {
            live_stream_service,
        });

        let routes = configure_routes().with_state(live_stream_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(LiveStreamApiDoc::openapi())
    }
}
