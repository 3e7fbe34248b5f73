//! The post listing pipeline: scope and search, rank, paginate, annotate.

mod annotate;
mod paginate;
mod rank;
mod search;

#[cfg(test)]
mod tests;

use std::num::NonZeroUsize;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::{BookmarkRepository, PostRepository, TagRepository, UserRepository};

pub use annotate::{AnnotatedPost, Annotator};
pub use paginate::{DEFAULT_PER_PAGE, Page, paginate, parse_page_number, parse_per_page};
pub use rank::{SortMode, rank, relevance_score};
pub use search::{PostFilter, SearchTerm};

/// A parsed listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: Option<SearchTerm>,
    pub per_page: NonZeroUsize,
    /// Requested page, before clamping.
    pub page: i64,
    /// Only the viewer's own posts. Ignored for anonymous viewers.
    pub mine_only: bool,
    /// Only posts by the user with this email. Wins over `mine_only`.
    pub user_email: Option<String>,
    pub sort: SortMode,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: None,
            per_page: DEFAULT_PER_PAGE,
            page: 1,
            mine_only: false,
            user_email: None,
            sort: SortMode::Latest,
        }
    }
}

/// One page of the listing plus totals over the whole candidate set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResult {
    pub posts: Vec<AnnotatedPost>,
    pub page: usize,
    pub pages: usize,
    pub total_count: usize,
}

/// Runs listing requests against the record store. Read-only and stateless,
/// so a single instance is shared by all workers.
#[derive(Clone)]
pub struct PostListingService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    annotator: Annotator,
}

impl PostListingService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        bookmarks: Arc<dyn BookmarkRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            annotator: Annotator::new(bookmarks, tags),
        }
    }

    pub async fn list(
        &self,
        query: &ListingQuery,
        viewer: Option<Uuid>,
    ) -> Result<ListingResult, DomainError> {
        let filter = PostFilter {
            search: query.search.clone(),
            author_id: self.resolve_author(query, viewer).await?,
        };

        let candidates = self.posts.list(&filter).await?;
        let ranked = rank(candidates, query.sort, filter.search.as_ref());
        let page = paginate(ranked, query.per_page, query.page);
        let posts = self.annotator.annotate(page.items, viewer).await?;

        Ok(ListingResult {
            posts,
            page: page.number,
            pages: page.num_pages,
            total_count: page.total_count,
        })
    }

    async fn resolve_author(
        &self,
        query: &ListingQuery,
        viewer: Option<Uuid>,
    ) -> Result<Option<Uuid>, DomainError> {
        if let Some(email) = &query.user_email {
            let user = self
                .users
                .find_by_email(email)
                .await?
                .ok_or_else(|| DomainError::NotFound {
                    entity_type: "User",
                    key: email.clone(),
                })?;
            return Ok(Some(user.id));
        }

        Ok(viewer.filter(|_| query.mine_only))
    }
}
