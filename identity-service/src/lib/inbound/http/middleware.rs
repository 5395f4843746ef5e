use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::cookies::extract_token;
use super::cookies::ACCESS_TOKEN_COOKIE;
use super::handlers::ApiError;
use crate::domain::user::errors::AuthError;
use crate::inbound::http::router::AppState;

/// Token gate for protected routes.
///
/// Resolves the caller from a bearer header or the `access_token` cookie and
/// stores the [`Identity`](crate::domain::user::models::Identity) in the
/// request extensions. Rejected requests never reach the inner handler and
/// all get the same 401 body; the specific reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(req.headers(), ACCESS_TOKEN_COOKIE);

    let identity = state
        .auth_service
        .resolve_identity(token.as_deref())
        .await
        .map_err(|e| {
            match &e {
                AuthError::Unauthenticated(reason) => {
                    tracing::warn!(
                        reason = %reason,
                        uri = %req.uri(),
                        "Authentication rejected"
                    );
                }
                other => {
                    tracing::error!(error = %other, "Identity resolution failed");
                }
            }
            ApiError::from(e).into_response()
        })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
