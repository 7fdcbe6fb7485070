//! Form checks for sign-up, sign-in and password reset.
//!
//! Each check stops at the first failure, which is what the forms display.

use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use crate::error::ValidationError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| panic!("invalid email regex: {e}"))
});

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub captcha_answer: String,
    pub captcha_expected: i32,
}

#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct ResetPasswordForm {
    pub email: String,
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

fn check_email(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        Err(ValidationError::new("email", "Please enter a valid email"))
    }
}

impl SignUpForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.first_name.trim().is_empty() {
            return Err(ValidationError::new("first_name", "First name is required"));
        }
        if self.last_name.trim().is_empty() {
            return Err(ValidationError::new("last_name", "Last name is required"));
        }
        check_email(&self.email)?;
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::new("confirm_password", "Passwords don't match"));
        }
        if self.captcha_answer.trim().parse::<i32>().ok() != Some(self.captcha_expected) {
            return Err(ValidationError::new("captcha_answer", "Incorrect math answer"));
        }
        Ok(())
    }
}

impl SignInForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "Password is required"));
        }
        Ok(())
    }
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_email(&self.email)
    }
}

/// "What is a + b?" with both operands in 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleCaptcha {
    pub a: i32,
    pub b: i32,
}

impl SimpleCaptcha {
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self {
            a: rng.gen_range(1..=10),
            b: rng.gen_range(1..=10),
        }
    }

    pub fn question(&self) -> String {
        format!("What is {} + {}?", self.a, self.b)
    }

    pub fn answer(&self) -> i32 {
        self.a + self.b
    }

    pub fn check(&self, input: &str) -> bool {
        input.trim().parse::<i32>().ok() == Some(self.answer())
    }
}

/// `first_last_xxxxxx`, lowercased, with six random base-36 characters.
pub fn generate_username<R: Rng>(first_name: &str, last_name: &str, rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String =
        (0..6).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect();

    format!(
        "{}_{}_{}",
        first_name.trim().to_lowercase(),
        last_name.trim().to_lowercase(),
        suffix
    )
}
