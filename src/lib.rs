//! OAuth2 resource server: bearer token → authenticated identity → per-endpoint role checks.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
