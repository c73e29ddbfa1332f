use auth::AuthError;
use auth::Outcome;
use auth::StoreError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::AccountError;
use crate::domain::conversation::errors::ConversationError;
use crate::domain::user::errors::UserError;

pub mod account;
pub mod conversations;
pub mod health;
pub mod messages;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    /// Authentication failed; `code` tells the client whether a refresh can help.
    Unauthorized {
        message: String,
        code: &'static str,
    },
    ServiceUnavailable {
        message: String,
        code: &'static str,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, code) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            ApiError::Unauthorized { message, code } => {
                (StatusCode::UNAUTHORIZED, message, Some(code))
            }
            ApiError::ServiceUnavailable { message, code } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, Some(code))
            }
        };

        (status, Json(ApiResponseBody::new_error(status, message, code))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err.outcome() {
            Outcome::Unauthorized => ApiError::Unauthorized {
                message: err.to_string(),
                code: err.code(),
            },
            Outcome::ServerFault => {
                tracing::error!(error = %err, code = err.code(), "Session operation failed");
                match err {
                    AuthError::StoreUnavailable(StoreError::Unavailable(_)) => {
                        ApiError::ServiceUnavailable {
                            message: "Session store unavailable".to_string(),
                            code: err.code(),
                        }
                    }
                    _ => ApiError::InternalServerError("Internal server error".to_string()),
                }
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::User(e) => e.into(),
            AccountError::Auth(e) => e.into(),
            AccountError::Password(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidName(_) | UserError::InvalidEmail(_) | UserError::InvalidUserId(_) => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "User repository failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<ConversationError> for ApiError {
    fn from(err: ConversationError) -> Self {
        match err {
            ConversationError::NotFound(_) | ConversationError::MessageNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            ConversationError::DatabaseError(msg) => {
                tracing::error!(error = %msg, "Conversation repository failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String, code: Option<&'static str>) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData {
                message,
                code: code.map(str::to_string),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Body of responses that only confirm an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponseData {
    pub message: String,
}
