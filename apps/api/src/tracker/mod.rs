pub mod entries;
pub mod handlers;
pub mod severity;
