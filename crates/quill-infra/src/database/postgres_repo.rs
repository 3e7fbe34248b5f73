//! PostgreSQL repository implementations.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, OnConflict};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use quill_core::domain::{Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::listing::{PostFilter, SearchTerm};
use quill_core::ports::{BookmarkRepository, PostRepository, TagRepository, UserRepository};

use super::entity::bookmark::{self, Entity as BookmarkEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL bookmark repository.
pub type PostgresBookmarkRepository = PostgresBaseRepository<BookmarkEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// `%term%` for a LIKE against a lowercased column, with wildcards escaped.
fn like_pattern(term: &SearchTerm) -> LikeExpr {
    let mut escaped = String::with_capacity(term.needle().len() + 2);
    escaped.push('%');
    for c in term.needle().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    LikeExpr::new(escaped).escape('\\')
}

/// Translate the listing predicate into a SQL condition.
fn post_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::UserId.eq(author_id));
    }

    if let Some(term) = &filter.search {
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                        .like(like_pattern(term)),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col(post::Column::Content)))
                        .like(like_pattern(term)),
                ),
        );
    }

    condition
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, filter: &PostFilter) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post_condition(filter))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            candidates = result.len(),
            search = filter.search.as_ref().map(SearchTerm::as_str),
            "Listed posts"
        );

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl BookmarkRepository for PostgresBookmarkRepository {
    async fn exists(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let found = BookmarkEntity::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.eq(post_id))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.is_some())
    }

    async fn bookmarked_among(
        &self,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows = BookmarkEntity::find()
            .filter(bookmark::Column::UserId.eq(user_id))
            .filter(bookmark::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(|b| b.post_id).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn attach(&self, post_id: Uuid, tag_id: Uuid) -> Result<(), RepoError> {
        let link = post_tag::ActiveModel {
            post_id: Set(post_id),
            tag_id: Set(tag_id),
        };

        PostTagEntity::insert(link)
            .on_conflict(
                OnConflict::columns([post_tag::Column::PostId, post_tag::Column::TagId])
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    async fn tags_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Tag>>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;
        if links.is_empty() {
            return Ok(HashMap::new());
        }

        let tag_ids: HashSet<Uuid> = links.iter().map(|l| l.tag_id).collect();
        let tags: HashMap<Uuid, Tag> = TagEntity::find()
            .filter(tag::Column::Id.is_in(tag_ids))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|m| (m.id, Tag::from(m)))
            .collect();

        let mut out: HashMap<Uuid, Vec<Tag>> = HashMap::new();
        for link in links {
            if let Some(tag) = tags.get(&link.tag_id) {
                out.entry(link.post_id).or_default().push(tag.clone());
            }
        }
        for tags in out.values_mut() {
            tags.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Ok(out)
    }
}
