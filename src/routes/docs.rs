use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{services::documentation::ApiDoc, state::SharedState};

/// Path of the raw OpenAPI document served next to the Swagger UI.
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

/// Swagger UI at `/docs`, browsing the generated API document.
pub fn router() -> Router<SharedState> {
    SwaggerUi::new("/docs")
        .url(OPENAPI_JSON_PATH, ApiDoc::openapi())
        .into()
}
