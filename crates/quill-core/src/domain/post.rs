use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, FieldError};

pub const TITLE_MAX_LEN: usize = 200;

/// Post entity - represents a blog post.
///
/// Tag associations live in their own relation, see
/// [`TagRepository`](crate::ports::TagRepository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    /// The author.
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post, validating title and content.
    pub fn new(user_id: Uuid, title: String, content: String) -> Result<Self, DomainError> {
        Self::with_created_at(user_id, title, content, Utc::now())
    }

    /// Create a post with an explicit creation time (imports, fixtures).
    pub fn with_created_at(
        user_id: Uuid,
        title: String,
        content: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let mut errors = Vec::new();
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "must not be blank"));
        } else if title.chars().count() > TITLE_MAX_LEN {
            errors.push(FieldError::new(
                "title",
                format!("must be at most {TITLE_MAX_LEN} characters"),
            ));
        }
        if content.trim().is_empty() {
            errors.push(FieldError::new("content", "must not be blank"));
        }
        DomainError::check(errors)?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
