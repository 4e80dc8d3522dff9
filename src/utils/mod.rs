//! Credential helpers shared by the auth service and the admin CLI.
//!
//! - [`jwt`] - HS256 access tokens
//! - [`password`] - PBKDF2 password hashing

pub mod jwt;
pub mod password;
