use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use crate::domain::user::models::Identity;
use crate::inbound::http::cookies::ACCESS_TOKEN_COOKIE;
use crate::inbound::http::cookies::LOGGED_IN_COOKIE;
use crate::inbound::http::cookies::REFRESH_TOKEN_COOKIE;
use crate::inbound::http::router::AppState;

/// Expire the token cookies. Issued tokens stay valid until their `exp`.
pub async fn logout(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<(StatusCode, HeaderMap), ApiError> {
    let mut headers = HeaderMap::new();
    for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, LOGGED_IN_COOKIE] {
        let cookie = state
            .cookies
            .cleared(name)
            .map_err(|e| anyhow::anyhow!("invalid cookie header: {e}"))?;
        headers.append(SET_COOKIE, cookie);
    }

    tracing::info!(user_id = %identity.user_id(), "User logged out");

    Ok((StatusCode::NO_CONTENT, headers))
}
