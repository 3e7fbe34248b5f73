//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/posts`.
///
/// Every field is kept as raw text: malformed numbers fall back to defaults
/// instead of failing the request. Servers should build it from the raw query
/// pairs via `FromIterator`, which never rejects input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsParams {
    #[serde(rename = "SearchTerm")]
    pub search_term: Option<String>,
    #[serde(rename = "PerPages")]
    pub per_pages: Option<String>,
    #[serde(rename = "PageNum")]
    pub page_num: Option<String>,
    #[serde(rename = "isMine")]
    pub is_mine: Option<String>,
    #[serde(rename = "UserEmail")]
    pub user_email: Option<String>,
    #[serde(rename = "SortBy")]
    pub sort_by: Option<String>,
}

/// Repeated keys keep the last value; unknown keys are ignored.
impl FromIterator<(String, String)> for ListPostsParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "SearchTerm" => &mut params.search_term,
                "PerPages" => &mut params.per_pages,
                "PageNum" => &mut params.page_num,
                "isMine" => &mut params.is_mine,
                "UserEmail" => &mut params.user_email,
                "SortBy" => &mut params.sort_by,
                _ => continue,
            };
            *slot = Some(value);
        }
        params
    }
}

/// A tag as shown on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: String,
    pub name: String,
}

/// A post projection in the listing.
///
/// The viewer flags are absent for anonymous requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<TagResponse>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bookmarked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mine: Option<bool>,
}

/// Response envelope of `GET /api/posts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPostsResponse {
    pub posts: Vec<PostResponse>,
    /// The page served, after out-of-range requests were clamped.
    pub page: usize,
    pub pages: usize,
    pub total_count: usize,
}
