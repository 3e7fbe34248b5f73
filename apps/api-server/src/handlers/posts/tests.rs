use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use quill_core::domain::{Bookmark, Post, Tag, User};
use quill_core::ports::{BaseRepository, TagRepository, TokenService};
use quill_infra::{
    InMemoryBookmarkRepository, InMemoryPostRepository, InMemoryTagRepository,
    InMemoryUserRepository, JwtConfig, JwtTokenService,
};
use quill_shared::ErrorResponse;
use quill_shared::dto::ListPostsResponse;

use crate::handlers::configure_routes;
use crate::observability::RequestIdMiddleware;
use crate::state::{AppState, Repositories};

struct Fixture {
    state: AppState,
    tokens: Arc<dyn TokenService>,
    alice: User,
    bob: User,
    /// Alice's posts, oldest first.
    alice_posts: Vec<Post>,
    bob_post: Post,
}

impl Fixture {
    async fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let bookmarks = Arc::new(InMemoryBookmarkRepository::new());
        let tags = Arc::new(InMemoryTagRepository::new());

        let alice = users
            .save(user("alice@example.com", "alice"))
            .await
            .unwrap();
        let bob = users.save(user("bob@example.com", "bob")).await.unwrap();

        let base = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut alice_posts = Vec::new();
        for i in 0..7 {
            let post = Post::with_created_at(
                alice.id,
                format!("Alice post {i}"),
                format!("Notes from day {i}, mostly about rust"),
                base + TimeDelta::hours(i),
            )
            .unwrap();
            alice_posts.push(posts.save(post).await.unwrap());
        }
        let bob_post = posts
            .save(
                Post::with_created_at(
                    bob.id,
                    "Rust lifetimes".to_string(),
                    "Borrowing explained".to_string(),
                    base - TimeDelta::days(1),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let rust = tags.save(Tag::new("rust".to_string()).unwrap()).await.unwrap();
        tags.attach(bob_post.id, rust.id).await.unwrap();

        bookmarks
            .save(Bookmark::new(bob.id, alice_posts[6].id))
            .await
            .unwrap();

        let repos = Repositories {
            users,
            posts,
            bookmarks,
            tags,
        };

        Self {
            state: AppState::with_repositories(repos, "memory"),
            tokens: Arc::new(JwtTokenService::new(JwtConfig {
                secret: "handler-test-secret".to_string(),
                ..JwtConfig::default()
            })),
            alice,
            bob,
            alice_posts,
            bob_post,
        }
    }

    fn bearer(&self, user: &User) -> (header::HeaderName, String) {
        let token = self
            .tokens
            .generate_token(user.id, &user.email, vec!["user".to_string()])
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}

macro_rules! app {
    ($fx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($fx.state.clone()))
                .app_data(web::Data::new($fx.tokens.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn user(email: &str, name: &str) -> User {
    User::new(email.to_string(), name.to_string(), "hash".to_string()).unwrap()
}

#[actix_web::test]
async fn test_first_page_is_newest_three() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_count, 8);
    assert_eq!(body.pages, 3);
    assert_eq!(body.page, 1);
    let titles: Vec<_> = body.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, ["Alice post 6", "Alice post 5", "Alice post 4"]);
}

#[actix_web::test]
async fn test_anonymous_gets_no_viewer_flags() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let first = &body["posts"][0];
    assert!(first.get("is_bookmarked").is_none());
    assert!(first.get("is_mine").is_none());
}

#[actix_web::test]
async fn test_bearer_token_sets_viewer_flags() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header(fx.bearer(&fx.bob))
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    let newest = &body.posts[0];
    assert_eq!(newest.id, fx.alice_posts[6].id.to_string());
    assert_eq!(newest.is_bookmarked, Some(true));
    assert_eq!(newest.is_mine, Some(false));
    assert_eq!(body.posts[1].is_bookmarked, Some(false));
}

#[actix_web::test]
async fn test_invalid_token_served_anonymously() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts")
        .insert_header((header::AUTHORIZATION, "Bearer forged"))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: ListPostsResponse = test::read_body_json(res).await;
    assert!(body.posts.iter().all(|p| p.is_mine.is_none()));
}

#[actix_web::test]
async fn test_search_and_tags() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?SearchTerm=LIFETIMES")
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_count, 1);
    let post = &body.posts[0];
    assert_eq!(post.id, fx.bob_post.id.to_string());
    assert_eq!(post.tags.len(), 1);
    assert_eq!(post.tags[0].name, "rust");
}

#[actix_web::test]
async fn test_mine_only() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?isMine=true&PerPages=10")
        .insert_header(fx.bearer(&fx.bob))
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_count, 1);
    assert_eq!(body.posts[0].is_mine, Some(true));
}

#[actix_web::test]
async fn test_user_email_scopes_to_author() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?UserEmail=alice%40example.com&PerPages=10")
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_count, 7);
    let alice_id = fx.alice.id.to_string();
    assert!(body.posts.iter().all(|p| p.author_id == alice_id));
}

#[actix_web::test]
async fn test_unknown_user_email_is_404() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?UserEmail=ghost%40example.com")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().contains_key("x-request-id"));
    let problem: ErrorResponse = test::read_body_json(res).await;
    assert_eq!(problem.status, 404);
}

#[actix_web::test]
async fn test_malformed_paging_falls_back() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?PerPages=abc&PageNum=xyz")
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.page, 1);
    assert_eq!(body.posts.len(), 3);
}

#[actix_web::test]
async fn test_page_past_end_clamps_to_last() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?PageNum=99")
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.page, 3);
    assert_eq!(body.posts.len(), 2);
    assert_eq!(body.posts[1].id, fx.bob_post.id.to_string());
}

#[actix_web::test]
async fn test_repeated_page_param_uses_last_value() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/api/posts?PageNum=1&PageNum=2")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: ListPostsResponse = test::read_body_json(res).await;
    assert_eq!(body.page, 2);
    assert_eq!(body.posts[0].id, fx.alice_posts[3].id.to_string());
}

#[actix_web::test]
async fn test_sort_by_relevance_puts_title_match_first() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    // Every post mentions rust; only Bob's has it in the title.
    let req = test::TestRequest::get()
        .uri("/api/posts?SearchTerm=rust&SortBy=relevance")
        .to_request();
    let body: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.total_count, 8);
    assert_eq!(body.posts[0].id, fx.bob_post.id.to_string());
    assert_eq!(body.posts[1].id, fx.alice_posts[6].id.to_string());

    let req = test::TestRequest::get()
        .uri("/api/posts?SearchTerm=rust")
        .to_request();
    let latest: ListPostsResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(latest.posts[0].id, fx.alice_posts[6].id.to_string());
}

#[actix_web::test]
async fn test_health_reports_storage() {
    let fx = Fixture::new().await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
