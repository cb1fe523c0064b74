//! Gateway Plugin implementation for the Prensa plugin system
//!
//! Provides the backend locator and the reverse proxy routes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use prensa_core::plugin::{
    PluginContext, PluginError, PluginRoutes, PrensaPlugin, ServiceRegistrationContext,
};
use prensa_core::ServerConfig;
use utoipa::{openapi::OpenApi, OpenApi as OpenApiTrait};

use crate::handler::{configure_routes, GatewayApiDoc, GatewayState};
use crate::locator::BackendLocator;
use crate::service::ProxyService;

/// Gateway Plugin wiring the locator and proxy into the application
pub struct GatewayPlugin {
    server_config: Arc<ServerConfig>,
}

impl GatewayPlugin {
    pub fn new(server_config: Arc<ServerConfig>) -> Self {
        Self { server_config }
    }
}

impl PrensaPlugin for GatewayPlugin {
    fn name(&self) -> &'static str {
        "gateway"
    }

    fn register_services<'a>(
        &'a self,
        context: &'a ServiceRegistrationContext,
    ) -> Pin<Box<dyn Future<Output = Result<(), PluginError>> + Send + 'a>> {
        Box::pin(async move {
            let locator = BackendLocator::new(
                self.server_config.local_api_port,
                self.server_config.public_api_url.clone(),
            );

            let proxy_service = ProxyService::new(locator)
                .map_err(|e| PluginError::InitializationFailed(e.to_string()))?;
            context.register_service(Arc::new(proxy_service));

            tracing::debug!("Gateway plugin services registered successfully");
            Ok(())
        })
    }

    fn configure_routes(&self, context: &PluginContext) -> Option<PluginRoutes> {
        let proxy_service = context.require_service::<ProxyService>();

        let gateway_state = Arc::new(GatewayState { proxy_service });

        let routes = configure_routes().with_state(gateway_state);

        Some(PluginRoutes { router: routes })
    }

    fn openapi_schema(&self) -> Option<OpenApi> {
        Some(GatewayApiDoc::openapi())
    }
}
