use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, Serialize, strum_macros::AsRefStr)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    // -- Auth errors.
    LoginFail,
    MissingCredentials,
    AuthFailNoToken,
    AuthFailInvalidToken,
    AuthFailUserGone,
    WrongCurrentPassword,
    Forbidden,
    NotSongOwner,

    // -- Query errors.
    MalformedQuery { message: String },

    // -- Model errors.
    Validation { message: String },
    EmailTaken { email: String },
    SongNotFound { id: String },
    UserNotFound { id: String },

    // -- Infra errors.
    TooManyRequests,
    DbError(String),
    EnvVarError(String),
    TokenCreationError,
    Io(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = self.client_status_and_message();

        tracing::debug!("client error: {} -> {}", self.as_ref(), status_code);

        let response_body = serde_json::json!({
            "status": if status_code.is_server_error() { "error" } else { "fail" },
            "message": message,
        });

        (status_code, Json(response_body)).into_response()
    }
}

impl Error {
    pub fn client_status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::LoginFail => (
                StatusCode::UNAUTHORIZED,
                "Incorrect email or password".into(),
            ),
            Self::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                "Please provide email and password!".into(),
            ),
            Self::AuthFailNoToken => (
                StatusCode::UNAUTHORIZED,
                "You are not logged in! Please log in to get access.".into(),
            ),
            Self::AuthFailInvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token".into()),
            Self::AuthFailUserGone => (
                StatusCode::UNAUTHORIZED,
                "The user belonging to this token does no longer exist.".into(),
            ),
            Self::WrongCurrentPassword => (
                StatusCode::UNAUTHORIZED,
                "Your current password is wrong".into(),
            ),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action".into(),
            ),
            Self::NotSongOwner => (StatusCode::FORBIDDEN, "You do not own this song".into()),

            Self::MalformedQuery { message } => (StatusCode::BAD_REQUEST, message.clone()),

            Self::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            Self::EmailTaken { email } => (
                StatusCode::BAD_REQUEST,
                format!("Email already in use: {email}"),
            ),
            Self::SongNotFound { .. } => {
                (StatusCode::NOT_FOUND, "No song found with that ID".into())
            }
            Self::UserNotFound { .. } => {
                (StatusCode::NOT_FOUND, "No user found with that ID".into())
            }

            Self::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many requests from this IP, please try again in an hour!".into(),
            ),

            Self::DbError(_) | Self::EnvVarError(_) | Self::TokenCreationError | Self::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went very wrong!".into(),
            ),
        }
    }
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::EnvVarError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Error::AuthFailInvalidToken
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
