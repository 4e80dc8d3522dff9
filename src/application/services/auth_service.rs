//! Authentication service for portal accounts and access tokens.

use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::task::JoinError;
use validator::Validate;

use crate::application::services::catalog_service::{Listing, not_found};
use crate::domain::document::{Document, StoredDocument};
use crate::domain::entities::{Role, User, normalize_email};
use crate::domain::repositories::{DocumentQuery, DocumentRepository};
use crate::error::AppError;
use crate::utils::jwt::{JwtCodec, JwtError};
use crate::utils::password::{hash_password, verify_password};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// The caller of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A freshly issued token together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    /// Public view of the user, without the password hash.
    pub user: Value,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
}

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

/// Service for registering accounts, issuing tokens and authenticating requests.
///
/// Passwords are stored as salted PBKDF2 hashes. Tokens are HS256 JWTs signed
/// with the server secret; on every request the token's user is looked up so
/// deleted accounts and role changes take effect immediately.
pub struct AuthService<R: DocumentRepository + ?Sized> {
    repository: Arc<R>,
    jwt: JwtCodec,
}

impl<R: DocumentRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - document store holding the `users` collection
    /// - `jwt` - codec signing and verifying access tokens
    pub fn new(repository: Arc<R>, jwt: JwtCodec) -> Self {
        Self { repository, jwt }
    }

    /// Token lifetime in seconds, used for the cookie `Max-Age`.
    pub fn token_ttl_seconds(&self) -> i64 {
        self.jwt.ttl_seconds()
    }

    /// Registers a visitor account and signs it in.
    ///
    /// The role is always [`Role::User`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if a field or the password length is invalid.
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn register(&self, account: NewAccount) -> Result<Session, AppError> {
        let stored = self.create_account(account, Role::User).await?;
        self.session(stored)
    }

    /// Checks credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the email is unknown or the
    /// password does not match.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AppError> {
        let invalid = || {
            AppError::unauthorized(
                "Invalid email or password",
                json!({"reason": "Credentials do not match"}),
            )
        };

        let stored = self
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;
        let user = stored.clone().into_record::<User>()?.document;

        if !check_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = stored.id, "Failed login attempt");
            return Err(invalid());
        }

        tracing::info!(user_id = stored.id, "User logged in");
        self.session(stored)
    }

    /// Resolves a raw token to the user it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, forged or
    /// expired, or its user no longer exists.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = self.jwt.verify(token, Utc::now()).map_err(|e| {
            let reason = match e {
                JwtError::Expired => "Token has expired",
                _ => "Invalid token",
            };
            AppError::unauthorized("Unauthorized", json!({"reason": reason}))
        })?;

        let stored = self
            .repository
            .find_by_id(User::COLLECTION, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Unauthorized", json!({"reason": "User no longer exists"}))
            })?;
        let user = stored.into_record::<User>()?;

        Ok(AuthUser {
            id: user.id,
            email: user.document.email,
            role: user.document.role,
        })
    }

    /// Returns the public view of a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_user(&self, id: i64) -> Result<Value, AppError> {
        self.repository
            .find_by_id(User::COLLECTION, id)
            .await?
            .map(|stored| stored.to_public_json())
            .ok_or_else(|| not_found::<User>(id))
    }

    /// Lists users, newest first, optionally matching a name search.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn list_users(&self, query: DocumentQuery) -> Result<Listing, AppError> {
        let page = self
            .repository
            .list(User::COLLECTION, query.with_order(User::ORDER))
            .await?;

        Ok(Listing {
            items: page.items.iter().map(StoredDocument::to_public_json).collect(),
            total: page.total,
        })
    }

    /// Changes a user's role.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn set_role(&self, id: i64, role: Role) -> Result<Value, AppError> {
        let mut user = self
            .repository
            .find_by_id(User::COLLECTION, id)
            .await?
            .ok_or_else(|| not_found::<User>(id))?
            .into_record::<User>()?
            .document;

        user.role = role;

        let stored = self
            .repository
            .replace(User::COLLECTION, id, serde_json::to_value(&user)?)
            .await?
            .ok_or_else(|| not_found::<User>(id))?;

        tracing::info!(user_id = id, %role, "User role changed");
        Ok(stored.to_public_json())
    }

    /// Creates an administrator account.
    ///
    /// # Errors
    ///
    /// Same as [`AuthService::register`].
    pub async fn create_admin(&self, account: NewAccount) -> Result<Value, AppError> {
        let stored = self.create_account(account, Role::Admin).await?;
        Ok(stored.to_public_json())
    }

    /// Grants the administrator role to the account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no account uses the email.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn promote(&self, email: &str) -> Result<Value, AppError> {
        let stored = self.find_by_email(email).await?.ok_or_else(|| {
            AppError::not_found("User not found", json!({"email": normalize_email(email)}))
        })?;
        self.set_role(stored.id, Role::Admin).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredDocument>, AppError> {
        self.repository
            .find_one(User::COLLECTION, json!({"email": normalize_email(email)}))
            .await
    }

    async fn create_account(
        &self,
        account: NewAccount,
        role: Role,
    ) -> Result<StoredDocument, AppError> {
        validate_password(&account.password)?;

        let mut user = User {
            name: account.name.trim().to_string(),
            email: normalize_email(&account.email),
            password_hash: String::new(),
            role,
            phone: account.phone.filter(|p| !p.trim().is_empty()),
        };
        user.validate()?;

        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({"email": user.email}),
            ));
        }

        user.password_hash = digest_password(account.password).await?;

        let stored = self
            .repository
            .insert(User::COLLECTION, serde_json::to_value(&user)?)
            .await?;

        tracing::info!(user_id = stored.id, %role, "Account created");
        Ok(stored)
    }

    fn session(&self, stored: StoredDocument) -> Result<Session, AppError> {
        let user = stored.clone().into_record::<User>()?;
        let token = self
            .jwt
            .issue(user.id, &user.document.email, user.document.role, Utc::now());

        Ok(Session {
            user: stored.to_public_json(),
            token,
            expires_in: self.jwt.ttl_seconds(),
        })
    }
}

fn validate_password(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::bad_request(
            "Validation failed",
            json!({"password": [format!(
                "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
            )]}),
        ));
    }
    Ok(())
}

/// Key stretching is CPU-bound, so it runs off the async workers.
async fn digest_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| blocking_failed("Password hashing failed", e))
}

async fn check_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let (password, hash) = (password.to_string(), hash.to_string());
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| blocking_failed("Password verification failed", e))
}

fn blocking_failed(message: &'static str, e: JoinError) -> AppError {
    tracing::error!(error = %e, "{message}");
    AppError::internal(message, json!({}))
}
