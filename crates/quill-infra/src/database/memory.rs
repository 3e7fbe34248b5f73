//! In-memory record store - used when no database is configured, and in tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Bookmark, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::listing::PostFilter;
use quill_core::ports::{
    BaseRepository, BookmarkRepository, PostRepository, TagRepository, UserRepository,
};

/// An entity that can live in an [`InMemoryRepository`].
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Whether storing `self` next to `other` would break a uniqueness rule.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }
}

impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for Bookmark {
    fn id(&self) -> Uuid {
        self.id
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.same_pair(other)
    }
}

impl Record for Tag {
    fn id(&self) -> Uuid {
        self.id
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Generic in-memory repository using a HashMap with async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryRepository<T: Record> {
    records: RwLock<HashMap<Uuid, T>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Clone every record matching `keep`.
    async fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let records = self.records.read().await;
        records.values().filter(|r| keep(r)).cloned().collect()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut records = self.records.write().await;

        let id = entity.id();
        if records
            .values()
            .any(|other| other.id() != id && entity.conflicts_with(other))
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        records.insert(id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.records.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

/// In-memory user repository.
pub type InMemoryUserRepository = InMemoryRepository<User>;

/// In-memory post repository.
pub type InMemoryPostRepository = InMemoryRepository<Post>;

/// In-memory bookmark repository.
pub type InMemoryBookmarkRepository = InMemoryRepository<Bookmark>;

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.select(|u| u.email == email).await.into_iter().next())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        Ok(self.select(|p| filter.matches(p)).await)
    }
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .any(|b| b.user_id == user_id && b.post_id == post_id))
    }

    async fn bookmarked_among(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        let wanted: HashSet<&Uuid> = post_ids.iter().collect();
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|b| b.user_id == user_id && wanted.contains(&b.post_id))
            .map(|b| b.post_id)
            .collect())
    }
}

/// In-memory tag repository with its post associations.
#[derive(Default)]
pub struct InMemoryTagRepository {
    tags: InMemoryRepository<Tag>,
    links: RwLock<HashSet<(Uuid, Uuid)>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        self.tags.find_by_id(id).await
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        self.tags.save(entity).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.tags.delete(id).await?;
        self.links.write().await.retain(|(_, tag_id)| *tag_id != id);
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn attach(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError> {
        if self.tags.find_by_id(tag_id).await?.is_none() {
            return Err(RepoError::Constraint(format!("Unknown tag {tag_id}")));
        }
        self.links.write().await.insert((post_id, tag_id));
        Ok(())
    }

    async fn tags_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        let wanted: HashSet<&Uuid> = post_ids.iter().collect();
        let links = self.links.read().await;
        let tags = self.tags.records.read().await;

        let mut out: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (post_id, tag_id) in links.iter().filter(|(p, _)| wanted.contains(p)) {
            if let Some(tag) = tags.get(tag_id) {
                out.entry(*post_id).or_default().push(tag.clone());
            }
        }
        for tags in out.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(out)
    }
}
