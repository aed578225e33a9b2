//! User accounts and the values that make them up.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ImagePath, UserId};

/// Maximum email length.
pub const EMAIL_MAX: usize = 254;
/// Maximum username and personal name length.
pub const NAME_MAX: usize = 150;

/// Validation errors returned by user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("email must be a valid address of at most {EMAIL_MAX} characters")]
    InvalidEmail,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username may only contain letters, digits and @/./+/-/_")]
    InvalidUsername,
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },
    #[error("{field} must be at most {NAME_MAX} characters")]
    NameTooLong { field: &'static str },
    #[error("password must not be empty")]
    EmptyPassword,
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyUsername | Self::InvalidUsername => "username",
            Self::EmptyName { field } | Self::NameTooLong { field } => field,
            Self::EmptyPassword => "password",
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn username_regex() -> &'static Regex {
    static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^[\w.@+-]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Login email, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref().trim().to_lowercase();
        if value.chars().count() > EMAIL_MAX || !email_regex().is_match(&value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Public handle of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate a username against `^[\w.@+-]+$`.
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if value.chars().count() > NAME_MAX {
            return Err(UserValidationError::NameTooLong { field: "username" });
        }
        if !username_regex().is_match(&value) {
            return Err(UserValidationError::InvalidUsername);
        }
        Ok(Self(value))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn personal_name(value: String, field: &'static str) -> Result<String, UserValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName { field });
    }
    if trimmed.chars().count() > NAME_MAX {
        return Err(UserValidationError::NameTooLong { field });
    }
    Ok(trimmed.to_owned())
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<ImagePath>,
    /// Admins may edit and delete any recipe.
    pub is_admin: bool,
}

/// User as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCard {
    pub user: User,
    /// Whether the viewer follows this user; always false for anonymous
    /// viewers.
    pub is_subscribed: bool,
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub first_name: String,
    pub last_name: String,
    password: String,
}

impl Registration {
    /// Validate every registration field.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Self, UserValidationError> {
        let email = Email::new(email)?;
        let username = Username::new(username)?;
        let first_name = personal_name(first_name.to_owned(), "first_name")?;
        let last_name = personal_name(last_name.to_owned(), "last_name")?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            username,
            first_name,
            last_name,
            password: password.to_owned(),
        })
    }

    /// Plain-text password to hash before persisting.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Opaque password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded hash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Email/password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: String,
}

impl LoginCredentials {
    /// Validate the raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, UserValidationError> {
        let email = Email::new(email)?;
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: password.to_owned(),
        })
    }

    /// Normalised login email.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Submitted password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
