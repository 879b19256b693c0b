use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Dart Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::boards::heartbeat,
        crate::routes::boards::list_boards,
        crate::routes::games::list_styles,
        crate::routes::games::create_game,
        crate::routes::games::list_games,
        crate::routes::games::get_game,
        crate::routes::games::add_player,
        crate::routes::darts::throw_dart,
        crate::routes::viewers::ws_handler,
        crate::routes::viewers::sse_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::board::BoardHeartbeatRequest,
            crate::dto::board::BoardSummary,
            crate::dto::board::PongResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::GameCreatedResponse,
            crate::dto::game::GameResponse,
            crate::dto::game::AddPlayerRequest,
            crate::dto::game::StyleSummary,
            crate::dto::game::StylesResponse,
            crate::dto::dart::DartRequest,
            crate::dto::dart::DartResponse,
            crate::game::GameSnapshot,
            crate::game::PlayerSnapshot,
            crate::game::GameStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "boards", description = "Board registration and heartbeats"),
        (name = "games", description = "Game styles, lifecycle and players"),
        (name = "darts", description = "Dart submission from boards"),
        (name = "viewers", description = "Live game streams over WebSocket and SSE"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_api_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/boards",
            "/api/styles",
            "/api/games",
            "/api/games/{id}",
            "/api/games/{id}/players",
            "/api/darts",
            "/api/games/{id}/ws",
            "/api/games/{id}/sse",
            "/healthcheck",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
