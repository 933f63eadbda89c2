use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::users::password::HashError;
use crate::users::repo::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Required input missing; the message is sent to the client as-is.
    #[error("{0}")]
    Validation(&'static str),

    #[error("User not found")]
    NotFound,

    /// `context` is the client-facing message, `source` stays in the logs.
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error("template error: {0}")]
    Render(#[from] askama::Error),

    #[error("invalid request body: {0}")]
    BadBody(String),
}

impl AppError {
    pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| Self::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage { .. } | Self::Hashing(_) | Self::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Validation(msg) => (*msg).to_string(),
            Self::NotFound => "User not found".into(),
            Self::Storage { context, .. } => (*context).to_string(),
            Self::Hashing(_) => "Error encrypting the password".into(),
            Self::Render(_) => "Error rendering the page".into(),
            Self::BadBody(_) => "Invalid request body".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::warn!(error = %self, %status, "request rejected");
        }
        (status, self.client_message()).into_response()
    }
}
