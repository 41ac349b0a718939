mod comment;
mod follow;
mod newsfeed;
mod post;

pub use comment::*;
pub use follow::*;
pub use newsfeed::*;
pub use post::*;
