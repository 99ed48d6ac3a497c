//! BitBrush
//!
//! Server and CLI around the `pixel-grid` editor core: AI naming and image
//! generation, remote image proxying, artwork storage and PNG export.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
