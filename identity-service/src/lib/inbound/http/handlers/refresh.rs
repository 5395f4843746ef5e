use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::cookies::extract_refresh_token;
use crate::inbound::http::router::AppState;

pub async fn refresh(
    State(state): State<AppState>,
    request_headers: HeaderMap,
) -> Result<(HeaderMap, ApiSuccess<RefreshResponseData>), ApiError> {
    let refresh_token = extract_refresh_token(&request_headers);
    let access_token = match refresh_token {
        Some(token) => state.auth_service.refresh(&token).await?,
        None => {
            tracing::warn!(reason = "no token supplied", "Refresh rejected");
            return Err(ApiError::Unauthorized(
                super::UNAUTHENTICATED_MESSAGE.to_string(),
            ));
        }
    };

    let mut headers = HeaderMap::new();
    for cookie in [
        state.cookies.access_cookie(&access_token),
        state.cookies.logged_in_cookie(),
    ] {
        let cookie = cookie.map_err(|e| anyhow::anyhow!("invalid cookie header: {e}"))?;
        headers.append(SET_COOKIE, cookie);
    }

    Ok((
        headers,
        ApiSuccess::new(StatusCode::OK, RefreshResponseData { access_token }),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub access_token: String,
}
