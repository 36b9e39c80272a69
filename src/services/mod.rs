/// OpenAPI documentation generation.
pub mod documentation;
/// Serve / check / skip / score orchestration.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Low-score alert delivery.
pub mod notifier;
/// Question and choice set selection.
pub mod selector;
/// Background eviction of idle player sessions.
pub mod session_sweeper;
