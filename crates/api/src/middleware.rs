//! Bearer-token middleware for the protected surfaces.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use podharbor_core::Fault;

use crate::app::{errors, services::AppServices};
use crate::context::CurrentAccount;

/// Resolve the `Authorization: Bearer` header to an account and stash it in
/// request extensions. Locked or unverified accounts are rejected here, so
/// a still-valid token stops working the moment the account does.
pub async fn auth_middleware(
    State(services): State<Arc<AppServices>>,
    mut req: Request,
    next: Next,
) -> Response {
    let raw = match extract_bearer(req.headers()) {
        Ok(raw) => raw,
        Err(fault) => return errors::fault_to_response(fault),
    };

    let account = match services.authenticate_access(raw).await {
        Ok(account) => account,
        Err(fault) => return errors::fault_to_response(fault),
    };

    req.extensions_mut().insert(CurrentAccount(account));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Fault> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| Fault::token_invalid().with_detail("missing Authorization header"))?;

    let header = header
        .to_str()
        .map_err(|_| Fault::token_invalid().with_detail("malformed Authorization header"))?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(Fault::token_invalid().with_detail("empty bearer token"));
    }

    Ok(token)
}
