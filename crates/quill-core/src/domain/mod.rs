//! Domain entities - the core business objects.

mod bookmark;
mod post;
mod tag;
mod user;

pub use bookmark::Bookmark;
pub use post::{Post, TITLE_MAX_LEN};
pub use tag::{TAG_NAME_MAX_LEN, Tag};
pub use user::{EMAIL_MAX_LEN, NAME_MAX_LEN, User};
