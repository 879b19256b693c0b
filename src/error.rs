use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{game::DomainError, state::SessionId};

/// Errors that can occur in service layer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Referenced session does not exist.
    #[error("game `{0}` not found")]
    NotFound(SessionId),
    /// Style code matches no known style.
    #[error("game style `{0}` is not supported")]
    InvalidStyle(String),
    /// Board has no recent heartbeat.
    #[error("board `{0}` is not alive")]
    BoardNotAlive(String),
    /// Board is already bound to another live game.
    #[error("board `{board}` is already busy with game `{session}`")]
    BoardBusy {
        /// Board that was requested.
        board: String,
        /// Game the board is bound to.
        session: SessionId,
    },
    /// No live game is waiting for a dart from this board.
    #[error("no active game for board `{0}`")]
    NoActiveSession(String),
    /// The game engine rejected the action.
    #[error(transparent)]
    Domain(DomainError),
    /// The game engine rejected a routed dart.
    #[error("dart rejected: {0}")]
    Routing(#[source] DomainError),
}

impl ServiceError {
    /// Stable outcome code exposed to clients.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::InvalidStyle(_) => "invalid_style",
            ServiceError::BoardNotAlive(_) => "board_not_alive",
            ServiceError::BoardBusy { .. } => "board_busy",
            ServiceError::NoActiveSession(_) => "no_active_session",
            ServiceError::Domain(_) => "domain_error",
            ServiceError::Routing(_) => "routing_error",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        ServiceError::Domain(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Typed outcome from the service layer.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Service(err) => {
                let status = match err {
                    ServiceError::NotFound(_) | ServiceError::NoActiveSession(_) => {
                        StatusCode::NOT_FOUND
                    }
                    ServiceError::InvalidStyle(_) => StatusCode::BAD_REQUEST,
                    ServiceError::BoardNotAlive(_) => StatusCode::PRECONDITION_FAILED,
                    ServiceError::BoardBusy { .. } => StatusCode::CONFLICT,
                    ServiceError::Domain(_) | ServiceError::Routing(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                };
                (status, err.code())
            }
        };

        let payload = Json(ErrorBody {
            code,
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}
