//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::PostListingService;
use quill_core::ports::{BookmarkRepository, PostRepository, TagRepository, UserRepository};
use quill_infra::{
    DatabaseConfig, InMemoryBookmarkRepository, InMemoryPostRepository, InMemoryTagRepository,
    InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
use quill_infra::{
    PostgresBookmarkRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository, database::connect,
};

/// The record store behind the listing.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub bookmarks: Arc<dyn BookmarkRepository>,
    pub tags: Arc<dyn TagRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            bookmarks: Arc::new(InMemoryBookmarkRepository::new()),
            tags: Arc::new(InMemoryTagRepository::new()),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub listing: PostListingService,
    /// Backend name reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// Build the state, falling back to in-memory storage when no database
    /// is configured or reachable.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::with_repositories(Repositories::in_memory(), "memory");
        };

        Self::connect(config).await
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &DatabaseConfig) -> Self {
        match connect(config).await {
            Ok(db) => {
                let repos = Repositories {
                    users: Arc::new(PostgresUserRepository::new(db.clone())),
                    posts: Arc::new(PostgresPostRepository::new(db.clone())),
                    bookmarks: Arc::new(PostgresBookmarkRepository::new(db.clone())),
                    tags: Arc::new(PostgresTagRepository::new(db)),
                };
                tracing::info!("Application state initialized");
                Self::with_repositories(repos, "postgres")
            }
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::with_repositories(Repositories::in_memory(), "memory")
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn connect(_config: &DatabaseConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Self::with_repositories(Repositories::in_memory(), "memory")
    }

    pub fn with_repositories(repos: Repositories, storage: &'static str) -> Self {
        Self {
            listing: PostListingService::new(repos.users, repos.posts, repos.bookmarks, repos.tags),
            storage,
        }
    }
}
