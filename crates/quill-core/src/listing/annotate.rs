//! Viewer-specific enrichment of a page of posts.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Post, Tag};
use crate::error::RepoError;
use crate::ports::{BookmarkRepository, TagRepository};

/// A post as returned by the listing, with its tags and viewer flags.
///
/// The flags are `None` for anonymous viewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedPost {
    pub post: Post,
    pub tags: Vec<Tag>,
    pub is_bookmarked: Option<bool>,
    pub is_mine: Option<bool>,
}

/// Attaches tags, bookmark state and ownership to a page of posts.
///
/// Each page costs at most one tag query and one bookmark query, run
/// concurrently, regardless of how many posts it holds.
#[derive(Clone)]
pub struct Annotator {
    bookmarks: Arc<dyn BookmarkRepository>,
    tags: Arc<dyn TagRepository>,
}

impl Annotator {
    pub fn new(bookmarks: Arc<dyn BookmarkRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { bookmarks, tags }
    }

    pub async fn annotate(
        &self,
        page: Vec<Post>,
        viewer: Option<Uuid>,
    ) -> Result<Vec<AnnotatedPost>, RepoError> {
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = page.iter().map(|p| p.id).collect();
        let bookmarked = async {
            match viewer {
                Some(user_id) => self.bookmarks.bookmarked_among(user_id, &ids).await.map(Some),
                None => Ok(None),
            }
        };
        let (mut tags, bookmarked) =
            futures::try_join!(self.tags.tags_for_posts(&ids), bookmarked)?;

        Ok(page
            .into_iter()
            .map(|post| AnnotatedPost {
                tags: tags.remove(&post.id).unwrap_or_default(),
                is_bookmarked: bookmarked.as_ref().map(|set| set.contains(&post.id)),
                is_mine: viewer.map(|user_id| post.is_authored_by(user_id)),
                post,
            })
            .collect())
    }
}
