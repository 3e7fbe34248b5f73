use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Bookmark, Post, Tag, User};
use crate::error::RepoError;
use crate::listing::PostFilter;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// All posts matching the filter, in no particular order.
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError>;
}

/// Bookmark repository. A (user, post) pair is saved at most once.
#[async_trait]
pub trait BookmarkRepository: BaseRepository<Bookmark, Uuid> {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError>;

    /// The subset of `post_ids` the user has bookmarked, in a single lookup.
    async fn bookmarked_among(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError>;
}

/// Tag repository, including the post/tag association.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, Uuid> {
    /// Associate a tag with a post. Attaching twice is a no-op.
    async fn attach(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError>;

    /// Tags of each given post, sorted by name. Posts without tags are absent.
    async fn tags_for_posts(&self, post_ids: &[Uuid])
    -> Result<HashMap<Uuid, Vec<Tag>>, RepoError>;
}
