use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, FieldError};

pub const TAG_NAME_MAX_LEN: usize = 50;

/// Tag entity - a label attached to posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation(vec![FieldError::new(
                "name",
                "must not be blank",
            )]));
        }
        if name.chars().count() > TAG_NAME_MAX_LEN {
            return Err(DomainError::Validation(vec![FieldError::new(
                "name",
                format!("must be at most {TAG_NAME_MAX_LEN} characters"),
            )]));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            name,
        })
    }
}
