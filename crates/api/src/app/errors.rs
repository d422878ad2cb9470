//! Consistent error responses.
//!
//! The fault taxonomy maps to HTTP once, here. Everything else in the api
//! crate hands faults through untouched.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use podharbor_core::{DomainResult, Fault, FaultKind};

pub fn fault_to_response(fault: Fault) -> Response {
    let status = match fault.kind {
        FaultKind::Validation => StatusCode::BAD_REQUEST,
        FaultKind::Conflict => StatusCode::CONFLICT,
        FaultKind::NotFound => StatusCode::NOT_FOUND,
        FaultKind::Forbidden => StatusCode::FORBIDDEN,
        FaultKind::Token => StatusCode::UNAUTHORIZED,
        FaultKind::Unavailable => StatusCode::LOCKED,
        FaultKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if fault.kind == FaultKind::Internal {
        tracing::error!(code = fault.code, detail = ?fault.detail, "internal fault");
    }

    (
        status,
        Json(json!({
            "code": fault.code,
            "message": fault.message,
            "detail": fault.detail,
        })),
    )
        .into_response()
}

/// Render a service result as JSON with the given success status.
pub fn respond<T: Serialize>(result: DomainResult<T>, status: StatusCode) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(fault) => fault_to_response(fault),
    }
}

/// Render a body-less service result.
pub fn respond_empty(result: DomainResult<()>, status: StatusCode) -> Response {
    match result {
        Ok(()) => status.into_response(),
        Err(fault) => fault_to_response(fault),
    }
}
