pub mod pain;
pub mod post;
pub mod user;
