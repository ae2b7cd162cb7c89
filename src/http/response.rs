//! JSON response shapes and error-to-status mapping.
//!
//! Failures always carry `{kind, message, retryable}` so a client can tell a
//! transient node outage from a request it must fix.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::blockchain::{AddressError, BlockchainError, IssuanceReceipt};
use crate::workflow::{ErrorKind, IssuanceOutcome, WorkflowError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
    pub retryable: bool,
}

impl From<&WorkflowError> for ErrorBody {
    fn from(err: &WorkflowError) -> Self {
        Self {
            kind: err.kind(),
            message: err.message().to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// `{ok: true, receipt} | {ok: false, reason, receipt?}`
#[derive(Debug, Serialize)]
pub struct IssuanceResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<IssuanceReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorBody>,
}

/// HTTP status for a failure kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::ContractBinding => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Connection => StatusCode::BAD_GATEWAY,
        ErrorKind::Transaction => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

impl IntoResponse for IssuanceOutcome {
    fn into_response(self) -> Response {
        let status = match self.reason() {
            None => StatusCode::OK,
            Some(reason) => status_for(reason.kind()),
        };
        let body = IssuanceResponse {
            ok: self.is_confirmed(),
            reason: self.reason().map(ErrorBody::from),
            receipt: self.receipt().cloned(),
        };
        (status, Json(body)).into_response()
    }
}

/// Error wrapper for the read-only endpoints.
#[derive(Debug)]
pub struct ApiError(pub WorkflowError);

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        Self(err)
    }
}

impl From<BlockchainError> for ApiError {
    fn from(err: BlockchainError) -> Self {
        Self(err.into())
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct Failure {
            ok: bool,
            reason: ErrorBody,
        }

        let status = status_for(self.0.kind());
        let body = Failure {
            ok: false,
            reason: ErrorBody::from(&self.0),
        };
        (status, Json(body)).into_response()
    }
}
