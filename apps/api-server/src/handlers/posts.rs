//! Post listing endpoint.

use actix_web::{HttpResponse, web};

use quill_core::domain::Tag;
use quill_core::listing::{
    AnnotatedPost, SearchTerm, SortMode, parse_page_number, parse_per_page,
};
use quill_core::{ListingQuery, ListingResult};
use quill_shared::dto::{ListPostsParams, ListPostsResponse, PostResponse, TagResponse};

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// List posts, newest first, one page at a time.
///
/// GET /api/posts?SearchTerm=&PerPages=&PageNum=&isMine=&UserEmail=&SortBy=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<Vec<(String, String)>>,
    identity: OptionalIdentity,
) -> AppResult<HttpResponse> {
    let params: ListPostsParams = query.into_inner().into_iter().collect();
    let query = listing_query(&params);
    let viewer = identity.0.map(|i| i.user_id);

    let result = state.listing.list(&query, viewer).await?;

    tracing::debug!(
        viewer = ?viewer,
        page = result.page,
        pages = result.pages,
        total = result.total_count,
        "Listed posts"
    );

    Ok(HttpResponse::Ok().json(listing_response(result)))
}

/// Malformed numbers and unknown sort keys fall back to defaults.
fn listing_query(params: &ListPostsParams) -> ListingQuery {
    ListingQuery {
        search: params.search_term.as_deref().and_then(SearchTerm::new),
        per_page: parse_per_page(params.per_pages.as_deref()),
        page: parse_page_number(params.page_num.as_deref()),
        mine_only: params.is_mine.as_deref() == Some("true"),
        user_email: params.user_email.clone().filter(|email| !email.is_empty()),
        sort: SortMode::from_param(params.sort_by.as_deref()),
    }
}

fn listing_response(result: ListingResult) -> ListPostsResponse {
    ListPostsResponse {
        posts: result.posts.into_iter().map(post_response).collect(),
        page: result.page,
        pages: result.pages,
        total_count: result.total_count,
    }
}

fn post_response(annotated: AnnotatedPost) -> PostResponse {
    let AnnotatedPost {
        post,
        tags,
        is_bookmarked,
        is_mine,
    } = annotated;

    PostResponse {
        id: post.id.to_string(),
        author_id: post.user_id.to_string(),
        title: post.title,
        content: post.content,
        tags: tags.into_iter().map(tag_response).collect(),
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
        is_bookmarked,
        is_mine,
    }
}

fn tag_response(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id.to_string(),
        name: tag.name,
    }
}

#[cfg(test)]
mod tests;
