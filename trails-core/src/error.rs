use thiserror::Error;

/// A rejected form; only the first failing field is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Failures talking to the hosted auth/database backend.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An account with this email already exists. Please try signing in instead.")]
    AlreadyRegistered,

    #[error("Invalid email or password. Please check your credentials and try again.")]
    InvalidCredentials,

    #[error(
        "Please verify your email address before signing in. \
         Check your inbox for a verification email."
    )]
    EmailNotConfirmed,

    #[error("Too many login attempts. Please wait a few minutes before trying again.")]
    RateLimited,

    /// Error message reported by the backend.
    #[error("{0}")]
    Backend(String),

    #[error("Backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected backend response: {0}")]
    InvalidResponse(String),

    /// Reading or writing the local session file.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl AuthError {
    /// Map a raw backend message onto the friendly variants the UI shows.
    pub fn from_backend_message(message: &str) -> Self {
        if message.contains("User already registered") {
            AuthError::AlreadyRegistered
        } else if message.contains("Invalid login credentials") {
            AuthError::InvalidCredentials
        } else if message.contains("Email not confirmed") {
            AuthError::EmailNotConfirmed
        } else if message.contains("Too many requests") {
            AuthError::RateLimited
        } else {
            AuthError::Backend(message.to_string())
        }
    }
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_messages_map_to_friendly_errors() {
        assert!(matches!(
            AuthError::from_backend_message("User already registered"),
            AuthError::AlreadyRegistered
        ));
        assert!(matches!(
            AuthError::from_backend_message("Invalid login credentials"),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from_backend_message("Email not confirmed"),
            AuthError::EmailNotConfirmed
        ));
        assert!(matches!(
            AuthError::from_backend_message("Too many requests, slow down"),
            AuthError::RateLimited
        ));

        let other = AuthError::from_backend_message("Database is sleeping");
        assert_eq!(other.to_string(), "Database is sleeping");
    }

    #[test]
    fn validation_error_displays_its_message() {
        let err: AuthError = ValidationError::new("email", "Please enter a valid email").into();
        assert_eq!(err.to_string(), "Please enter a valid email");
    }
}
