//! JWT authentication and role middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::AuthUser;
use crate::{error::AppError, state::AppState};

/// Name of the cookie carrying the access token.
pub const AUTH_COOKIE: &str = "auth-token";

/// Authenticates requests using a JWT from the header or the cookie.
///
/// # Token Sources
///
/// ```text
/// Authorization: Bearer <jwt>
/// Cookie: auth-token=<jwt>
/// ```
///
/// The header wins when both are present.
///
/// # Authentication Flow
///
/// 1. Extract the token
/// 2. Verify signature and expiry
/// 3. Load the token's user
/// 4. Store [`AuthUser`] in request extensions
/// 5. Continue to next middleware/handler
///
/// # Errors
///
/// Returns `401 Unauthorized` if no token is present, the token is invalid
/// or expired, or its user no longer exists.
///
/// # Example
///
/// ```rust,ignore
/// let protected = Router::new()
///     .route("/api/bookings", get(list_my_bookings_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let token = match AuthBearer::from_request_parts(&mut parts, &()).await {
        Ok(AuthBearer(token)) => token,
        Err(_) => token_from_cookie(&parts.headers).ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header or auth-token cookie is missing"}),
            )
        })?,
    };

    let user = st.auth_service.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Rejects callers without the admin role.
///
/// Must run after [`layer`].
///
/// # Errors
///
/// Returns `401 Unauthorized` if the request was not authenticated.
/// Returns `403 Forbidden` if the caller is not an administrator.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req.extensions().get::<AuthUser>().ok_or_else(|| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Authentication required"}))
    })?;

    if !user.is_admin() {
        tracing::warn!(user_id = user.id, "Non-admin denied access to admin route");
        return Err(AppError::forbidden(
            "Forbidden",
            json!({"reason": "Administrator role required"}),
        ));
    }

    Ok(next.run(req).await)
}

/// Reads the access token from the `Cookie` header.
pub fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == AUTH_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; auth-token=abc.def.ghi; lang=id"),
        );

        assert_eq!(token_from_cookie(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_token_from_cookie_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_cookie(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("auth-token="));
        assert_eq!(token_from_cookie(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("other-token=x"));
        assert_eq!(token_from_cookie(&headers), None);
    }
}
