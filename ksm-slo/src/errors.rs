use std::{error::Error as StdError, fmt};

use backtrace::Backtrace;
use thiserror::Error;

pub use http::StatusCode;

pub trait ErrorCode: StdError + 'static {
    fn code(&self) -> (StatusCode, &'static str);
}

#[derive(Error, Debug)]
pub enum Code {
    #[error(transparent)]
    Any(#[from] anyhow::Error),
    #[error("Not found. {0}")]
    NotFound(String),
    #[error("Forbidden. {0}")]
    Forbidden(String),
    #[error("Please recheck the request.see: {0}")]
    Validates(#[source] validator::ValidationErrors),
    // Rendered verbatim, callers match on the message text.
    #[error("{0}")]
    BadRequest(String),
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl ErrorCode for Code {
    fn code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Any(_) => (StatusCode::INTERNAL_SERVER_ERROR, "1010001"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "1010002"),
            Self::Validates(_) => (StatusCode::UNPROCESSABLE_ENTITY, "1010004"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "1010005"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "1010006"),
            Self::UnsupportedOperation(_) => {
                (StatusCode::METHOD_NOT_ALLOWED, "1010007")
            }
        }
    }
}

pub struct WithBacktrace {
    source: Code,
    backtrace: Backtrace,
}

impl WithBacktrace {
    /// HTTP status and application code of the wrapped error.
    pub fn code(&self) -> (StatusCode, &'static str) {
        self.source.code()
    }

    pub fn status(&self) -> StatusCode {
        self.source.code().0
    }
}

impl fmt::Debug for WithBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithBacktrace")
            .field("source", &self.source)
            .field("backtrace", &self.backtrace)
            .finish()
    }
}

impl fmt::Display for WithBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl StdError for WithBacktrace {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.source)
    }
}

impl From<Code> for WithBacktrace {
    fn from(code: Code) -> Self {
        WithBacktrace {
            source: code,
            backtrace: Backtrace::new(),
        }
    }
}

impl PartialEq for WithBacktrace {
    fn eq(&self, other: &Self) -> bool {
        let (_, src_code) = self.source.code();
        let (_, dst_code) = other.source.code();
        src_code == dst_code
    }
}

pub fn any<E: StdError>(err: E) -> WithBacktrace {
    Code::Any(anyhow::anyhow!("{}", err)).into()
}

pub fn anyhow(err: anyhow::Error) -> WithBacktrace {
    Code::Any(err).into()
}

pub fn not_found<S: ToString + ?Sized>(what: &S) -> WithBacktrace {
    Code::NotFound(what.to_string()).into()
}

pub fn forbidden<S: ToString + ?Sized>(reason: &S) -> WithBacktrace {
    Code::Forbidden(reason.to_string()).into()
}

/// Client error whose message reaches the caller unchanged.
pub fn bad_request<S: ToString + ?Sized>(msg: &S) -> WithBacktrace {
    Code::BadRequest(msg.to_string()).into()
}

pub fn unsupported_operation<S: ToString + ?Sized>(op: &S) -> WithBacktrace {
    Code::UnsupportedOperation(op.to_string()).into()
}

#[cfg(feature = "axum-resp")]
mod response {
    use axum::{response::IntoResponse, Json};
    use serde_json::json;

    use super::{ErrorCode, WithBacktrace};

    /// Renders as the status code plus `{"code": .., "message": ..}`.
    impl IntoResponse for WithBacktrace {
        fn into_response(self) -> axum::response::Response {
            tracing::error!("{:?}", self);
            let (status, code) = self.source.code();
            let body = Json(json!({
                "code": code,
                "message": self.source.to_string(),
            }));
            (status, body).into_response()
        }
    }
}
