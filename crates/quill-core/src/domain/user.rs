use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, FieldError};

pub const EMAIL_MAX_LEN: usize = 100;
pub const NAME_MAX_LEN: usize = 30;

/// User entity - represents a user in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active, non-admin user with generated ID and timestamps.
    pub fn new(email: String, name: String, password_hash: String) -> Result<Self, DomainError> {
        let mut errors = Vec::new();
        if email.is_empty() || !email.contains('@') {
            errors.push(FieldError::new("email", "must be a valid email address"));
        } else if email.chars().count() > EMAIL_MAX_LEN {
            errors.push(FieldError::new(
                "email",
                format!("must be at most {EMAIL_MAX_LEN} characters"),
            ));
        }
        if name.trim().is_empty() {
            errors.push(FieldError::new("name", "must not be blank"));
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::new(
                "name",
                format!("must be at most {NAME_MAX_LEN} characters"),
            ));
        }
        DomainError::check(errors)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            email,
            name,
            password_hash,
            is_active: true,
            is_admin: false,
            created_at: now,
            updated_at: now,
        })
    }
}
