//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// OAuth2 password-grant form. `username` carries the email.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Username must be an email"))]
    pub username: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// `?code=` of the verification and reset links.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CodeQuery {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 8))]
    pub new_password: String,
    #[validate(length(min = 8))]
    pub confirm_password: String,
}

/// Create user request (super user).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 8))]
    pub confirm_password: String,
}

/// Profile update. An empty or missing name leaves it unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 100))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordRequest {
    #[validate(length(min = 8))]
    pub old_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
    #[validate(length(min = 8))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_bounds() {
        let ok = CreateItemRequest {
            title: "a".repeat(100),
            description: "b".repeat(200),
        };
        assert!(ok.validate().is_ok());

        let long = CreateItemRequest {
            title: "a".repeat(101),
            description: "b".to_string(),
        };
        assert!(long.validate().is_err());

        let empty = UpdateItemRequest {
            title: Some(String::new()),
            description: None,
        };
        assert!(empty.validate().is_err());
        assert!(UpdateItemRequest::default().validate().is_ok());
    }

    #[test]
    fn test_short_password_and_bad_email_rejected() {
        let form = LoginForm {
            username: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(form.validate().is_err());

        let reset = ResetPasswordRequest {
            new_password: "short".to_string(),
            confirm_password: "short".to_string(),
        };
        assert!(reset.validate().is_err());
    }
}
