use axum::Router;

use crate::state::SharedState;

pub mod boards;
pub mod darts;
pub mod docs;
pub mod extract;
pub mod games;
pub mod health;
pub mod viewers;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = Router::new().nest(
        "/api",
        boards::router()
            .merge(games::router())
            .merge(darts::router())
            .merge(viewers::router()),
    );

    api_router
        .merge(health::router())
        .merge(docs::router())
        .with_state(state)
}
