//! Handlers for authentication and user management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::Value;
use validator::Validate;

use crate::api::dto::auth::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateRoleRequest, UserListParams,
};
use crate::api::dto::pagination::ListResponse;
use crate::api::extract::JsonBody;
use crate::api::middleware::auth::AUTH_COOKIE;
use crate::application::services::AuthUser;
use crate::domain::repositories::DocumentQuery;
use crate::error::AppError;
use crate::state::{AppState, CookieSettings};

fn session_cookie(token: &str, max_age: i64, settings: CookieSettings) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if settings.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Creates a visitor account and signs it in.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// - 400: invalid name, email, password (8-128 characters) or phone
/// - 409: email already registered
pub async fn register_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = state.auth_service.register(payload.into()).await?;
    let cookie = session_cookie(&session.token, session.expires_in, state.cookie);

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse::from(session)),
    ))
}

/// Exchanges credentials for an access token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// The token is returned in the body and set as the `auth-token` cookie
/// (`HttpOnly; SameSite=Lax; Path=/; Max-Age=<ttl>`).
///
/// # Errors
///
/// Returns 401 Unauthorized if the email or password is wrong.
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    let cookie = session_cookie(&session.token, session.expires_in, state.cookie);

    Ok(([(header::SET_COOKIE, cookie)], Json(AuthResponse::from(session))))
}

/// Clears the `auth-token` cookie.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// Tokens are stateless; a copied token stays valid until it expires.
pub async fn logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, session_cookie("", 0, state.cookie))],
    )
}

/// Returns the authenticated user.
///
/// # Endpoint
///
/// `GET /api/auth/me`
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.auth_service.get_user(user.id).await?))
}

/// Lists users.
///
/// # Endpoint
///
/// `GET /api/admin/users?search=ayu&role=admin`
pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> Result<Json<ListResponse>, AppError> {
    let (offset, limit) = params.pagination.window()?;

    let mut query = DocumentQuery::new(offset, limit).with_search(params.search.clone());
    if let Some(role) = params.role {
        query = query.with_field("role", role.as_str());
    }

    let listing = state.auth_service.list_users(query).await?;

    Ok(Json(ListResponse::new(listing, &params.pagination)))
}

/// Changes a user's role.
///
/// # Endpoint
///
/// `PATCH /api/admin/users/{id}/role`
///
/// # Errors
///
/// - 400: the caller tried to change their own role
/// - 404: user does not exist
pub async fn update_user_role_handler(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateRoleRequest>,
) -> Result<Json<Value>, AppError> {
    if caller.id == id {
        return Err(AppError::bad_request(
            "Cannot change your own role",
            serde_json::json!({"id": id}),
        ));
    }

    Ok(Json(state.auth_service.set_role(id, payload.role).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc", 3600, CookieSettings { secure: false });
        assert_eq!(
            cookie,
            "auth-token=abc; HttpOnly; SameSite=Lax; Path=/; Max-Age=3600"
        );

        let secure = session_cookie("abc", 3600, CookieSettings { secure: true });
        assert!(secure.ends_with("; Secure"));
    }

    #[test]
    fn test_cleared_cookie_expires_immediately() {
        let cookie = session_cookie("", 0, CookieSettings::default());
        assert!(cookie.starts_with("auth-token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
