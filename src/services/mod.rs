/// Board heartbeats and liveness listing.
pub mod board_service;
/// Dart routing entry point.
pub mod dart_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Game creation, lookup, player binding and lazy cleanup.
pub mod session_service;
/// Live game streams for viewers over WebSocket and SSE.
pub mod viewer_service;
/// Periodic eviction of silent boards.
pub mod watchdog;
