//! Signup and login form validation.
//!
//! Account storage itself is delegated to the hosted auth provider; this
//! module only enforces the same constraint set the site's forms use.

use itertools::Itertools;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

#[must_use]
#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[validate(
        email(message = "Please enter a valid email"),
        length(max = 255, message = "Please enter a valid email")
    )]
    pub email: String,

    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[must_use]
#[derive(Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 2, max = 100, message = "Name must be at least 2 characters"))]
    pub full_name: String,

    #[validate(
        email(message = "Please enter a valid email"),
        length(max = 255, message = "Please enter a valid email")
    )]
    pub email: String,

    #[validate(
        length(min = 8, max = 128, message = "Password must be at least 8 characters"),
        custom(function = validate_password_classes)
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords don't match"))]
    pub confirm_password: String,
}

impl LoginForm {
    /// Trim whitespace-padded input the way the site's forms do.
    pub fn normalized(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

impl SignupForm {
    pub fn normalized(mut self) -> Self {
        self.full_name = self.full_name.trim().to_string();
        self.email = self.email.trim().to_string();
        self
    }
}

/// The password must contain an uppercase letter, a lowercase letter, and a
/// digit.
fn validate_password_classes(password: &str) -> Result<(), ValidationError> {
    let class_checks = [
        (char::is_uppercase as fn(char) -> bool, "Password must contain an uppercase letter"),
        (char::is_lowercase, "Password must contain a lowercase letter"),
        (|character: char| character.is_ascii_digit(), "Password must contain a number"),
    ];
    for (check, message) in class_checks {
        if !password.chars().any(check) {
            return Err(ValidationError::new("password_classes").with_message(message.into()));
        }
    }
    Ok(())
}

/// Flatten validation errors into per-field human-readable messages.
#[must_use]
pub fn messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .iter()
        .sorted_by(|(a, _), (b, _)| a.cmp(b))
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| match &error.message {
                Some(message) => message.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect()
}
