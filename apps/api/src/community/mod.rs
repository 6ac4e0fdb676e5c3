pub mod comments;
pub mod feed;
pub mod handlers;
pub mod likes;
pub mod posts;
