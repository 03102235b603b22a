use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("relative path is empty or invalid")]
    EmptyPath,
    #[error("path contains an invalid character (NUL)")]
    InvalidCharacter,
    #[error("absolute paths are not allowed; enter a path relative to the project root")]
    AbsolutePathNotAllowed,
    #[error("drive designators (such as C:) are not allowed; enter a relative path")]
    DriveLetterNotAllowed,
    #[error("path escapes the project root (`..` is not allowed to leave it)")]
    PathEscape,
    #[error("forbidden path: outside the project root")]
    OutsideRoot,
    #[error("a directory already exists with the requested file name")]
    DirectoryConflict,
    #[error("file does not exist as a regular file; create it first")]
    NotAFile,
    #[error("invalid request body: {0}")]
    InvalidJson(String),
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Io(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmptyPath => "EmptyPath",
            AppError::InvalidCharacter => "InvalidCharacter",
            AppError::AbsolutePathNotAllowed => "AbsolutePath",
            AppError::DriveLetterNotAllowed => "DriveLetter",
            AppError::PathEscape => "PathEscape",
            AppError::OutsideRoot => "OutsideRoot",
            AppError::DirectoryConflict => "DirectoryConflict",
            AppError::NotAFile => "NotAFile",
            AppError::InvalidJson(_) => "InvalidJson",
            AppError::NotFound => "NotFound",
            AppError::Io(_) => "Io",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmptyPath
            | AppError::InvalidCharacter
            | AppError::AbsolutePathNotAllowed
            | AppError::DriveLetterNotAllowed
            | AppError::PathEscape
            | AppError::DirectoryConflict
            | AppError::NotAFile
            | AppError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            AppError::OutsideRoot => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidJson(rejection.body_text())
    }
}
