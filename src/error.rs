use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;

use crate::handlers::shared::ApiResponse;
use crate::services::team_membership::MembershipError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal server error{}", .0.as_ref().map_or("".to_string(), |s| format!(": {}", s)))]
    InternalServerError(Option<String>),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        // Never leak driver details to clients
        let error_message = match self {
            AppError::DatabaseError(_) => "Database error".to_string(),
            other => other.to_string(),
        };

        if status_code.is_server_error() {
            log::error!("Request failed with status {}: {}", status_code, self);
        } else {
            log::warn!("Request failed with status {}: {}", status_code, self);
        }

        let response_body = ApiResponse::<()>::error(&error_message);

        HttpResponse::build(status_code).json(response_body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_error) = error {
            if db_error.is_unique_violation() {
                log::warn!("Unique constraint violated: {}", db_error);
                return AppError::Conflict("Record already exists".to_string());
            }
        }

        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl From<MembershipError> for AppError {
    fn from(error: MembershipError) -> Self {
        let message = error.to_string();
        match error {
            MembershipError::TeamNotFound | MembershipError::MemberNotFound => {
                AppError::NotFound(message)
            }
            MembershipError::NotCaptain => AppError::PermissionDenied(message),
            MembershipError::AlreadyMember => AppError::Conflict(message),
            _ => AppError::BadRequest(message),
        }
    }
}

impl AppError {
    pub fn internal_server_error_message(message: impl Into<String>) -> Self {
        AppError::InternalServerError(Some(message.into()))
    }

    pub fn internal_server_error() -> Self {
        AppError::InternalServerError(None)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        log::error!("Anyhow error: {}", error);

        match error.downcast::<sqlx::Error>() {
            Ok(sqlx_err) => AppError::from(sqlx_err),
            Err(original_error) => AppError::InternalServerError(Some(original_error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("team".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("dup".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::PayloadTooLarge("big".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::internal_server_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_server_error_message_formatting() {
        assert_eq!(
            AppError::internal_server_error().to_string(),
            "Internal server error"
        );
        assert_eq!(
            AppError::internal_server_error_message("disk full").to_string(),
            "Internal server error: disk full"
        );
    }

    #[test]
    fn test_membership_errors_map_to_http_errors() {
        assert_eq!(
            AppError::from(MembershipError::NotCaptain).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::from(MembershipError::AlreadyMember).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(MembershipError::MemberNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(MembershipError::MustTransferFirst).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_row_not_found_is_a_database_error() {
        let error = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(error, AppError::DatabaseError(_)));
    }
}
