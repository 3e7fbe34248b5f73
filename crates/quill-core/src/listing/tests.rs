use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::*;
use crate::domain::{Bookmark, Post, Tag, User};
use crate::error::RepoError;
use crate::ports::BaseRepository;

/// Minimal record store that counts the lookups the pipeline makes.
#[derive(Default)]
struct FakeStore {
    users: Mutex<Vec<User>>,
    posts: Mutex<Vec<Post>>,
    bookmarks: Mutex<Vec<Bookmark>>,
    tags: Mutex<Vec<(Uuid, Tag)>>,
    bookmark_queries: AtomicUsize,
    tag_queries: AtomicUsize,
}

macro_rules! fake_base {
    ($entity:ty, $field:ident) => {
        #[async_trait]
        impl BaseRepository<$entity, Uuid> for FakeStore {
            async fn find_by_id(&self, id: Uuid) -> Result<Option<$entity>, RepoError> {
                Ok(self.$field.lock().unwrap().iter().find(|e| e.id == id).cloned())
            }

            async fn save(&self, entity: $entity) -> Result<$entity, RepoError> {
                self.$field.lock().unwrap().push(entity.clone());
                Ok(entity)
            }

            async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
                self.$field.lock().unwrap().retain(|e| e.id != id);
                Ok(())
            }
        }
    };
}

fake_base!(User, users);
fake_base!(Post, posts);
fake_base!(Bookmark, bookmarks);

#[async_trait]
impl BaseRepository<Tag, Uuid> for FakeStore {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(None)
    }

    async fn save(&self, entity: Tag) -> Result<Tag, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[async_trait]
impl PostRepository for FakeStore {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        Ok(filter.apply(self.posts.lock().unwrap().clone()))
    }
}

#[async_trait]
impl BookmarkRepository for FakeStore {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.user_id == user_id && b.post_id == post_id))
    }

    async fn bookmarked_among(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        self.bookmark_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .bookmarks
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id && post_ids.contains(&b.post_id))
            .map(|b| b.post_id)
            .collect())
    }
}

#[async_trait]
impl TagRepository for FakeStore {
    async fn attach(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError> {
        self.tags.lock().unwrap().push((
            post_id,
            Tag {
                id: tag_id,
                name: tag_id.to_string(),
            },
        ));
        Ok(())
    }

    async fn tags_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        self.tag_queries.fetch_add(1, Ordering::SeqCst);
        let mut out: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for (post_id, tag) in self.tags.lock().unwrap().iter() {
            if post_ids.contains(post_id) {
                out.entry(*post_id).or_default().push(tag.clone());
            }
        }
        Ok(out)
    }
}

struct Fixture {
    store: Arc<FakeStore>,
    service: PostListingService,
    alice: User,
    bob: User,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(FakeStore::default());
        let service = PostListingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        );
        let alice = User::new("alice@example.com".into(), "Alice".into(), String::new()).unwrap();
        let bob = User::new("bob@example.com".into(), "Bob".into(), String::new()).unwrap();
        store.users.lock().unwrap().extend([alice.clone(), bob.clone()]);

        Self {
            store,
            service,
            alice,
            bob,
        }
    }

    /// Add a post `minutes_ago` minutes old.
    fn post(&self, author: &User, title: &str, content: &str, minutes_ago: i64) -> Post {
        let post = Post::with_created_at(
            author.id,
            title.to_string(),
            content.to_string(),
            Utc::now() - Duration::minutes(minutes_ago),
        )
        .unwrap();
        self.store.posts.lock().unwrap().push(post.clone());
        post
    }

    fn bookmark(&self, user: &User, post: &Post) {
        self.store
            .bookmarks
            .lock()
            .unwrap()
            .push(Bookmark::new(user.id, post.id));
    }
}

fn titles(result: &ListingResult) -> Vec<&str> {
    result.posts.iter().map(|p| p.post.title.as_str()).collect()
}

fn query() -> ListingQuery {
    ListingQuery::default()
}

#[tokio::test]
async fn test_seven_posts_first_page() {
    let fx = Fixture::new();
    for i in 0..7 {
        fx.post(&fx.alice, &format!("post {i}"), "body", i);
    }

    let result = fx.service.list(&query(), None).await.unwrap();

    assert_eq!(result.posts.len(), 3);
    assert_eq!(result.pages, 3);
    assert_eq!(result.total_count, 7);
    assert_eq!(titles(&result), vec!["post 0", "post 1", "post 2"]);
}

#[tokio::test]
async fn test_search_counts_only_matches() {
    let fx = Fixture::new();
    for i in 0..8 {
        fx.post(&fx.alice, &format!("post {i}"), "nothing here", i);
    }
    fx.post(&fx.alice, "Hello world", "x", 20);
    fx.post(&fx.bob, "greeting", "well, HELLO", 30);

    let q = ListingQuery {
        search: SearchTerm::new("hello"),
        ..query()
    };
    let result = fx.service.list(&q, None).await.unwrap();

    assert_eq!(result.total_count, 2);
    assert_eq!(result.pages, 1);
}

#[tokio::test]
async fn test_relevance_ranks_filtered_set() {
    let fx = Fixture::new();
    fx.post(&fx.alice, "newest", "mentions rust", 1);
    fx.post(&fx.alice, "rust title", "nothing", 10);
    fx.post(&fx.alice, "unrelated", "nothing", 0);

    let q = ListingQuery {
        search: SearchTerm::new("rust"),
        sort: SortMode::Relevance,
        ..query()
    };
    let result = fx.service.list(&q, None).await.unwrap();

    assert_eq!(titles(&result), vec!["rust title", "newest"]);
}

#[tokio::test]
async fn test_out_of_range_pages_are_clamped() {
    let fx = Fixture::new();
    for i in 0..7 {
        fx.post(&fx.alice, &format!("post {i}"), "body", i);
    }

    let first = fx.service.list(&query(), None).await.unwrap();
    let zero = fx
        .service
        .list(&ListingQuery { page: 0, ..query() }, None)
        .await
        .unwrap();
    assert_eq!(first, zero);

    let last = fx
        .service
        .list(&ListingQuery { page: 3, ..query() }, None)
        .await
        .unwrap();
    let beyond = fx
        .service
        .list(&ListingQuery { page: 42, ..query() }, None)
        .await
        .unwrap();
    assert_eq!(last, beyond);
    assert_eq!(titles(&beyond), vec!["post 6"]);
    assert_eq!(beyond.page, 3);
}

#[tokio::test]
async fn test_anonymous_viewer_gets_no_flags_and_no_bookmark_query() {
    let fx = Fixture::new();
    let post = fx.post(&fx.alice, "hello", "x", 0);
    fx.bookmark(&fx.alice, &post);

    let result = fx.service.list(&query(), None).await.unwrap();

    assert!(result.posts.iter().all(|p| p.is_bookmarked.is_none()));
    assert!(result.posts.iter().all(|p| p.is_mine.is_none()));
    assert_eq!(fx.store.bookmark_queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_viewer_flags_use_one_batched_lookup() {
    let fx = Fixture::new();
    let own = fx.post(&fx.alice, "own", "x", 0);
    let saved = fx.post(&fx.bob, "saved", "x", 1);
    fx.post(&fx.bob, "other", "x", 2);
    fx.bookmark(&fx.alice, &saved);
    fx.bookmark(&fx.bob, &own);

    let result = fx.service.list(&query(), Some(fx.alice.id)).await.unwrap();

    let flags: Vec<_> = result
        .posts
        .iter()
        .map(|p| (p.post.title.as_str(), p.is_mine, p.is_bookmarked))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("own", Some(true), Some(false)),
            ("saved", Some(false), Some(true)),
            ("other", Some(false), Some(false)),
        ]
    );
    assert_eq!(fx.store.bookmark_queries.load(Ordering::SeqCst), 1);
    assert_eq!(fx.store.tag_queries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_tags_are_attached_to_their_posts() {
    let fx = Fixture::new();
    let tagged = fx.post(&fx.alice, "tagged", "x", 0);
    fx.post(&fx.alice, "plain", "x", 1);
    let tag_id = Uuid::new_v4();
    fx.store.attach(tagged.id, tag_id).await.unwrap();

    let result = fx.service.list(&query(), None).await.unwrap();

    assert_eq!(result.posts[0].tags.len(), 1);
    assert_eq!(result.posts[0].tags[0].id, tag_id);
    assert!(result.posts[1].tags.is_empty());
}

#[tokio::test]
async fn test_mine_only_scopes_to_viewer() {
    let fx = Fixture::new();
    fx.post(&fx.alice, "alice's", "x", 0);
    fx.post(&fx.bob, "bob's", "x", 1);

    let q = ListingQuery {
        mine_only: true,
        ..query()
    };
    let result = fx.service.list(&q, Some(fx.bob.id)).await.unwrap();
    assert_eq!(titles(&result), vec!["bob's"]);

    let anonymous = fx.service.list(&q, None).await.unwrap();
    assert_eq!(anonymous.total_count, 2);
}

#[tokio::test]
async fn test_target_user_wins_over_mine_only() {
    let fx = Fixture::new();
    fx.post(&fx.alice, "alice's", "x", 0);
    fx.post(&fx.bob, "bob's", "x", 1);

    let q = ListingQuery {
        mine_only: true,
        user_email: Some("alice@example.com".to_string()),
        ..query()
    };
    let result = fx.service.list(&q, Some(fx.bob.id)).await.unwrap();

    assert_eq!(titles(&result), vec!["alice's"]);
}

#[tokio::test]
async fn test_unknown_target_user_is_not_found() {
    let fx = Fixture::new();
    fx.post(&fx.alice, "alice's", "x", 0);

    let q = ListingQuery {
        user_email: Some("ghost@example.com".to_string()),
        ..query()
    };
    let err = fx.service.list(&q, None).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::NotFound { entity_type: "User", ref key } if key == "ghost@example.com"
    ));
}

#[tokio::test]
async fn test_empty_store() {
    let fx = Fixture::new();

    let result = fx.service.list(&query(), Some(fx.alice.id)).await.unwrap();

    assert!(result.posts.is_empty());
    assert_eq!(result.pages, 0);
    assert_eq!(result.total_count, 0);
    assert_eq!(fx.store.bookmark_queries.load(Ordering::SeqCst), 0);
}
