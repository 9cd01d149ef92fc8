//! Domain entities - the core business objects.

mod group;
mod post;
mod user;

pub use group::{Group, NewGroup};
pub use post::{Post, PostForm};
pub use user::User;
