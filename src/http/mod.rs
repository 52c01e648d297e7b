//! # roster HTTP Module
//!
//! HTTP surface for the user API. Combines the user resource routes and
//! the health check into a single Axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/users/*` - User CRUD operations

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod response;
pub mod server;
pub mod user_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
