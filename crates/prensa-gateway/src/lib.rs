//! Backend locator and reverse proxy
//!
//! Dispatches browser-originated API calls to the article backend that
//! should service them: a locally-running instance when the request comes
//! from a private network, the public gateway otherwise.

mod handler;
mod locator;
pub mod plugin;
mod service;


pub use handler::{configure_routes, GatewayApiDoc, GatewayState};
pub use locator::{BackendLocator, BackendTarget, HostClass, DEFAULT_PUBLIC_API_URL};
pub use plugin::GatewayPlugin;
pub use service::{GatewayError, ProxiedRequest, ProxyService};
