//! Live-stream banner configuration
//!
//! A single persisted record describes whether a live broadcast embed is
//! currently shown on the site and its display metadata. Readers get the
//! record (or a synthesized default) via GET; administrators replace it
//! via authenticated POST.

mod handler;
pub mod plugin;
mod service;
mod store;

#[cfg(test)]
mod tests;

pub use handler::{configure_routes, LiveStreamApiDoc, LiveStreamState, LiveStreamUpdateResponse};
pub use plugin::LiveStreamPlugin;
pub use service::{LiveStreamError, LiveStreamService, LiveStreamUpdate};
pub use store::{FileStore, LiveStreamConfig, LiveStreamStore, StoreError};
