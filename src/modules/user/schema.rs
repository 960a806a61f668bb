use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

lazy_static::lazy_static! {
    static ref USERNAME_PATTERN: regex::Regex =
        regex::Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9._]{0,22}[A-Za-z0-9])?$")
            .expect("username pattern is valid");
    static ref REPEATED_SEPARATORS: regex::Regex =
        regex::Regex::new(r"[-_.]{2,}").expect("separator pattern is valid");
}

// =============================================================================
// UPDATE USER
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub preferred_units: Option<String>,
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let length = username.chars().count();
    let message = if !(3..=24).contains(&length) {
        "Username must be between 3 and 24 characters"
    } else if username.contains(char::is_whitespace) {
        "Username cannot contain spaces"
    } else if !USERNAME_PATTERN.is_match(username) {
        "Username can only contain letters, numbers, dots and underscores, and must start and end with a letter or number"
    } else if REPEATED_SEPARATORS.is_match(username) {
        "Username cannot contain consecutive special characters"
    } else {
        return Ok(());
    };

    Err(ValidationError::new("username").with_message(Cow::Borrowed(message)))
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
