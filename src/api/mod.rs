//! HTTP API handlers for stemd
//!
//! Polling surface: submit a conversion, poll its status, download stem
//! artifacts, clean up a session. Plus `/health` for monitoring.

pub mod cleanup;
pub mod convert;
pub mod download;
pub mod health;
pub mod status;

pub use cleanup::cleanup_routes;
pub use convert::convert_routes;
pub use download::download_routes;
pub use health::health_routes;
pub use status::status_routes;
