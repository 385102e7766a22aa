//! Request DTOs with declarative validation.

use serde::Deserialize;
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use arkiv_core::error::AppError;

/// Query parameters for the browse/search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    /// Folder path to list (root when absent).
    pub folder: Option<String>,
    /// Search term; ignores the folder filter when present.
    pub search: Option<String>,
    /// Listing sort key.
    pub sort_by: Option<String>,
}

/// Body for folder creation.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFolderBody {
    /// New folder name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Parent folder id (root when absent).
    pub parent_id: Option<Uuid>,
}

/// Body for granting shares on a file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GrantSharesBody {
    /// Permission to grant.
    pub permission_id: Uuid,
    /// Grantee emails.
    #[validate(length(min = 1, message = "At least one email is required"))]
    pub emails: Vec<String>,
}

impl GrantSharesBody {
    /// Validate each email's format, beyond the derive-level checks.
    pub fn validate_emails(&self) -> Result<(), AppError> {
        for email in &self.emails {
            if !email.validate_email() {
                return Err(AppError::validation_field(
                    "emails",
                    format!("\"{email}\" is not a valid email address"),
                ));
            }
        }
        Ok(())
    }
}

/// Body for account registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterBody {
    /// Display name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub fullname: String,
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginBody {
    /// Email address.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Plaintext password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Convert declarative validation failures into a field-tagged app error.
pub fn check<T: Validate>(body: &T) -> Result<(), AppError> {
    body.validate().map_err(|errors| {
        let (field, messages) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value".to_string());
                (field.to_string(), message)
            })
            .unwrap_or_else(|| ("body".to_string(), "Invalid request".to_string()));
        AppError::validation_field(field, messages)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tags_the_failing_field() {
        let body = CreateFolderBody {
            name: String::new(),
            parent_id: None,
        };
        let err = check(&body).expect_err("empty name");
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[test]
    fn test_grant_shares_email_format() {
        let body = GrantSharesBody {
            permission_id: Uuid::new_v4(),
            emails: vec!["ada@example.com".into(), "not-an-email".into()],
        };
        assert!(check(&body).is_ok());
        let err = body.validate_emails().expect_err("bad email");
        assert_eq!(err.field.as_deref(), Some("emails"));
    }

    #[test]
    fn test_register_body_validates() {
        let body = RegisterBody {
            fullname: "Ada".into(),
            email: "ada@example.com".into(),
            password: "abcdefg1".into(),
        };
        assert!(check(&body).is_ok());
    }
}
