//! Record store implementations: PostgreSQL via SeaORM, and in-memory.

mod connections;
pub mod memory;

#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

pub use connections::DatabaseConfig;
#[cfg(feature = "postgres")]
pub use connections::connect;

pub use memory::{
    InMemoryBookmarkRepository, InMemoryPostRepository, InMemoryRepository,
    InMemoryTagRepository, InMemoryUserRepository,
};

#[cfg(feature = "postgres")]
pub use postgres_repo::{
    PostgresBookmarkRepository, PostgresPostRepository, PostgresTagRepository,
    PostgresUserRepository,
};
