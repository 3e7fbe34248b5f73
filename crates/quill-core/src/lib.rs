//! # Quill Core
//!
//! The domain layer of the Quill blog API.
//! This crate contains the entities, the ports the storage layer must implement,
//! and the post listing pipeline. It has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod listing;
pub mod ports;

pub use error::{DomainError, FieldError, RepoError};
pub use listing::{ListingQuery, ListingResult, PostListingService};
