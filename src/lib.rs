//! Library crate for dart-back, exposing modules for binaries and integration tests.

/// Runtime configuration.
pub mod config;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Scoring engines and the style table.
pub mod game;
/// HTTP route trees.
pub mod routes;
/// Business operations behind the routes.
pub mod services;
/// Shared registries of boards, games and viewer hubs.
pub mod state;
