//! DTOs for registration, login and user management.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DisplayFromStr, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::application::services::{NewAccount, Session};
use crate::domain::entities::Role;

/// Digits with optional leading `+` and common separators.
pub static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]{3,30}$").unwrap());

/// Request to create a visitor account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(regex(path = "*PHONE_REGEX", message = "Invalid phone number"))]
    pub phone: Option<String>,
}

impl From<RegisterRequest> for NewAccount {
    fn from(request: RegisterRequest) -> Self {
        NewAccount {
            name: request.name,
            email: request.email,
            password: request.password,
            phone: request.phone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Returned by register and login; the token is also set as a cookie.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: Value,
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        AuthResponse {
            user: session.user,
            token: session.token,
            token_type: "Bearer",
            expires_in: session.expires_in,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde(default)]
    pub search: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub role: Option<Role>,
}
