//! Crate-wide failure taxonomy.
//!
//! Stores and services return [`Error`]; the HTTP layer maps each variant to a
//! status code in `http::error`.

/// Convenient alias used by stores, services and handlers.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A request field is missing or out of range.
    #[error("{message}")]
    Validation { field: String, message: String },

    /// No record with the requested identifier (`"Player"` / `"User"`).
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("User already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    PasswordMismatch,

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Access denied. Admin role required.")]
    Forbidden,

    #[error("{0}")]
    InvalidOperation(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Field name for validation failures, `None` otherwise.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}
