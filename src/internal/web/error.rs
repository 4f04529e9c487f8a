use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::internal::discord::DiscordError;

const INTERNAL_ERROR_BODY: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed state parameter: {0}")]
    MalformedState(String),

    #[error("Invalid guild id: {0}")]
    InvalidGuildId(String),

    #[error("Not logged in")]
    Unauthorized,

    #[error("Unknown save type: {0}")]
    UnknownSaveType(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Discord authentication failed: {0}")]
    Discord(#[from] DiscordError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedState(_)
            | AppError::InvalidGuildId(_)
            | AppError::UnknownSaveType(_)
            | AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Discord(_) | AppError::Database(_) => {
                // upstream bodies and database errors stay in the log
                tracing::error!("{self}");
                return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}
