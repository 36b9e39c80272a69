//! Library crate for face-match-back, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Photo persistence.
pub mod dao;
/// Request forms, JSON payloads and HTML pages.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum routers.
pub mod routes;
/// Game logic, alerting and background tasks.
pub mod services;
/// In-memory application and session state.
pub mod state;
