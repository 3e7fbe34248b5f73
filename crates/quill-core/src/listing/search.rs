//! Free-text search over post titles and contents.

use uuid::Uuid;

use crate::domain::Post;

/// A non-empty, case-folded search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    raw: String,
    needle: String,
}

impl SearchTerm {
    /// `None` for an empty term, which means "no filtering".
    pub fn new(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        Some(Self {
            raw: raw.to_string(),
            needle: raw.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The lowercased term, for storage backends that compare case-folded text.
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring test.
    pub fn found_in(&self, haystack: &str) -> bool {
        haystack.to_lowercase().contains(&self.needle)
    }

    pub fn in_title(&self, post: &Post) -> bool {
        self.found_in(&post.title)
    }

    pub fn in_content(&self, post: &Post) -> bool {
        self.found_in(&post.content)
    }
}

/// Predicate selecting the listing candidate set.
///
/// Unset fields do not filter. Storage backends translate this into their own
/// query language; [`PostFilter::matches`] is the reference semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFilter {
    pub search: Option<SearchTerm>,
    pub author_id: Option<Uuid>,
}

impl PostFilter {
    pub fn matches(&self, post: &Post) -> bool {
        if self.author_id.is_some_and(|author| !post.is_authored_by(author)) {
            return false;
        }
        match &self.search {
            Some(term) => term.in_title(post) || term.in_content(post),
            None => true,
        }
    }

    /// Apply the filter to an in-memory collection.
    pub fn apply(&self, posts: impl IntoIterator<Item = Post>) -> Vec<Post> {
        posts.into_iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(title: &str, content: &str) -> Post {
        Post::new(Uuid::new_v4(), title.to_string(), content.to_string()).unwrap()
    }

    #[test]
    fn test_empty_term_is_no_filter() {
        assert!(SearchTerm::new("").is_none());

        let posts = vec![post("a", "b"), post("c", "d")];
        assert_eq!(PostFilter::default().apply(posts).len(), 2);
    }

    #[test]
    fn test_case_insensitive_title_or_content() {
        let term = SearchTerm::new("HeLLo");
        let filter = PostFilter {
            search: term,
            author_id: None,
        };

        assert!(filter.matches(&post("Hello there", "body")));
        assert!(filter.matches(&post("title", "say hello")));
        assert!(!filter.matches(&post("goodbye", "farewell")));
    }

    #[test]
    fn test_author_scope_combines_with_search() {
        let mine = post("hello", "x");
        let other = post("hello", "x");
        let filter = PostFilter {
            search: SearchTerm::new("hello"),
            author_id: Some(mine.user_id),
        };

        let result = filter.apply(vec![mine.clone(), other]);
        assert_eq!(result, vec![mine]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let filter = PostFilter {
            search: SearchTerm::new("zzz"),
            author_id: None,
        };
        assert!(filter.apply(vec![post("a", "b")]).is_empty());
    }
}
