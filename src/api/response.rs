//! The JSON envelope every endpoint answers with, and the error type that
//! renders into it.

use rocket::{
    Request, Response,
    http::Status,
    response::{self, Responder},
    serde::json::Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::{auth::AuthError, store::StoreError};

pub type ApiResult<T> = Result<Envelope<T>, ApiError>;

/// `{ success, data?, error?, message?, count?, details? }`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    status: Status,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    fn new(status: Status, success: bool, data: Option<T>) -> Self {
        Self {
            status,
            success,
            data,
            error: None,
            message: None,
            count: None,
            details: None,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::new(Status::Ok, true, Some(data))
    }

    pub fn created(data: T) -> Self {
        Self::new(Status::Created, true, Some(data))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    #[cfg(test)]
    pub fn status(&self) -> Status {
        self.status
    }
}

impl<T> Envelope<Vec<T>> {
    /// A list response carrying its length in `count`.
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        Self::ok(items).with_count(count)
    }
}

impl Envelope<()> {
    /// Success without a payload.
    pub fn acknowledged(message: impl Into<String>) -> Self {
        Self::new(Status::Ok, true, None).with_message(message)
    }

    pub fn failure(status: Status, error: impl Into<String>) -> Self {
        let mut envelope = Self::new(status, false, None);
        envelope.error = Some(error.into());
        envelope
    }
}

impl<'r, T: Serialize> Responder<'r, 'static> for Envelope<T> {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status;
        Response::build_from(Json(self).respond_to(request)?)
            .status(status)
            .ok()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed or rejected bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not on the admin allow-list.
    #[error("{0}")]
    Forbidden(String),

    #[error("{error}")]
    BadRequest {
        error: String,
        message: Option<String>,
    },

    /// One entry per violated constraint.
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(String),

    /// Store or auth provider failure. `message` is not stable.
    #[error("{context}")]
    Internal {
        context: &'static str,
        message: String,
    },
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: None,
        }
    }

    pub fn internal(context: &'static str, source: impl std::fmt::Debug + std::fmt::Display) -> Self {
        tracing::error!("{}: {:?}", context, source);
        ApiError::Internal {
            context,
            message: source.to_string(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ApiError::Unauthorized(_) => Status::Unauthorized,
            ApiError::Forbidden(_) => Status::Forbidden,
            ApiError::BadRequest { .. } | ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Internal { .. } => Status::InternalServerError,
        }
    }

    pub fn into_envelope(self) -> Envelope<()> {
        let status = self.status();
        let error = self.to_string();
        match self {
            ApiError::BadRequest {
                message: Some(message),
                ..
            }
            | ApiError::Internal { message, .. } => {
                Envelope::failure(status, error).with_message(message)
            }
            ApiError::Validation(details) => {
                let mut envelope = Envelope::failure(status, error).with_message(details.join("; "));
                envelope.details = Some(details);
                envelope
            }
            _ => Envelope::failure(status, error),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::Database(e) => ApiError::internal("Database error", e),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials | AuthError::InvalidToken => {
                ApiError::Unauthorized(error.to_string())
            }
            AuthError::EmailTaken => ApiError::bad_request(error.to_string()),
            AuthError::PasswordHash(e) => ApiError::internal("Auth provider error", e),
            AuthError::Database(e) => ApiError::internal("Auth provider error", e),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        self.into_envelope().respond_to(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_empty_fields() {
        let envelope = Envelope::list(vec!["a", "b"]);
        assert_eq!(envelope.status(), Status::Ok);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "success": true, "data": ["a", "b"], "count": 2 })
        );
    }

    #[test]
    fn validation_error_lists_constraints() {
        let envelope = ApiError::Validation(vec![
            "name is required".to_string(),
            "address is required".to_string(),
        ])
        .into_envelope();
        assert_eq!(envelope.status(), Status::BadRequest);
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "success": false,
                "error": "Validation failed",
                "message": "name is required; address is required",
                "details": ["name is required", "address is required"],
            })
        );
    }

    #[test]
    fn errors_map_to_statuses() {
        assert_eq!(ApiError::Unauthorized("x".into()).status(), Status::Unauthorized);
        assert_eq!(ApiError::Forbidden("x".into()).status(), Status::Forbidden);
        assert_eq!(ApiError::NotFound("x".into()).status(), Status::NotFound);
        assert_eq!(ApiError::bad_request("x").status(), Status::BadRequest);
        assert_eq!(ApiError::from(StoreError::NotFound).status(), Status::NotFound);
        assert_eq!(
            ApiError::from(AuthError::InvalidToken).status(),
            Status::Unauthorized
        );
        let internal = ApiError::internal("Failed to fetch resources", "pool timed out");
        assert_eq!(internal.status(), Status::InternalServerError);
        assert_eq!(
            serde_json::to_value(internal.into_envelope()).unwrap(),
            json!({
                "success": false,
                "error": "Failed to fetch resources",
                "message": "pool timed out",
            })
        );
    }
}
