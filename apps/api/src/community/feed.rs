use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::backend::{BackendError, DataStore};
use crate::errors::DEGRADED_NOTICE;
use crate::models::post::{Category, Comment, Post};
use crate::models::user::Session;

pub const LOAD_FAILED_NOTICE: &str = "Could not load posts. Please try again later.";

/// Category filter for the feed: every category, or exactly one.
/// Travels as the category label, with `"All"` for the unfiltered feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        if label == "All" {
            return Ok(CategoryFilter::All);
        }
        Category::from_label(&label)
            .map(CategoryFilter::Only)
            .ok_or_else(|| format!("unknown category '{label}'"))
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.label().to_string()
    }
}

/// A post as the feed shows it to the current visitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub liked: bool,
    pub comment_count: usize,
    pub comments: Vec<Comment>,
}

impl PostView {
    pub fn from_post(post: Post, liked: &HashSet<i64>) -> Self {
        let mut comments = post.comments;
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        PostView {
            liked: liked.contains(&post.id),
            comment_count: comments.len(),
            id: post.id,
            category: post.category,
            title: post.title,
            content: post.content,
            author_name: post.author_name,
            created_at: post.created_at,
            likes: post.likes,
            comments,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<PostView>,
    pub filter: CategoryFilter,
    /// Size of the fetched snapshot before filtering.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl FeedResponse {
    pub fn new(snapshot: Vec<PostView>, filter: CategoryFilter) -> Self {
        let total = snapshot.len();
        FeedResponse {
            posts: filter_posts(snapshot, filter),
            filter,
            total,
            notice: None,
        }
    }

    pub fn empty_with_notice(filter: CategoryFilter, notice: &str) -> Self {
        FeedResponse {
            posts: Vec::new(),
            filter,
            total: 0,
            notice: Some(notice.to_string()),
        }
    }
}

/// Keeps the posts the filter selects, in snapshot order.
pub fn filter_posts(snapshot: Vec<PostView>, filter: CategoryFilter) -> Vec<PostView> {
    snapshot
        .into_iter()
        .filter(|post| filter.matches(post.category))
        .collect()
}

/// Fetches the full post list and marks the ones the session's user liked.
pub async fn load_feed(
    store: &dyn DataStore,
    session: Option<&Session>,
) -> Result<Vec<PostView>, BackendError> {
    let posts = store.list_posts(session).await?;
    let liked = match session {
        Some(session) => store.liked_post_ids(session).await?,
        None => HashSet::new(),
    };

    Ok(posts
        .into_iter()
        .map(|post| PostView::from_post(post, &liked))
        .collect())
}

/// The feed the visitor gets to see. Never fails: an unconfigured backend
/// or a failed fetch renders an empty list with a notice.
pub async fn current_feed(
    store: Option<&dyn DataStore>,
    session: Option<&Session>,
    filter: CategoryFilter,
) -> FeedResponse {
    let Some(store) = store else {
        return FeedResponse::empty_with_notice(filter, DEGRADED_NOTICE);
    };

    match load_feed(store, session).await {
        Ok(snapshot) => FeedResponse::new(snapshot, filter),
        Err(e) => {
            error!("Failed to load posts: {e}");
            FeedResponse::empty_with_notice(filter, LOAD_FAILED_NOTICE)
        }
    }
}
