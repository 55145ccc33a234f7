//! More-like-this query and its "like" items.

mod item;
mod query;

pub use item::MoreLikeThisQueryItem;
pub use query::{MoreLikeThisQuery, MORE_LIKE_THIS_KEY};
