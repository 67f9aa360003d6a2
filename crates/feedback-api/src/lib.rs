//! HTTP surface of the feedback pipeline: the widget-facing ingestion
//! endpoint, the server-to-server notification endpoint and a read-only
//! feedback listing.

pub mod config;
pub mod cors;
pub mod error;
pub mod feedback;
pub mod ingest;
pub mod middleware;
pub mod notify;
pub mod origin;
pub mod router;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use state::{AppState, AppStateInner};
