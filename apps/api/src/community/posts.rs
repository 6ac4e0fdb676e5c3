use serde::Deserialize;
use tracing::info;

use crate::backend::DataStore;
use crate::errors::AppError;
use crate::models::post::{Category, NewPost};
use crate::models::user::Session;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_CONTENT_CHARS: usize = 2000;
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Deserialize)]
pub struct NewPostRequest {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author_name: Option<String>,
}

/// A post form that passed validation. Building one never touches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub category: Category,
    pub title: String,
    pub content: String,
    pub author_name: String,
}

impl PostDraft {
    /// Title and content are required; blank display names post as "Anonymous".
    pub fn validate(req: NewPostRequest) -> Result<Self, AppError> {
        let title = req.title.trim();
        let content = req.content.trim();

        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        if content.is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::Validation(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "Content must be at most {MAX_CONTENT_CHARS} characters"
            )));
        }

        let author_name = req
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_string();

        Ok(PostDraft {
            category: req.category.unwrap_or_default(),
            title: title.to_string(),
            content: content.to_string(),
            author_name,
        })
    }

    pub fn into_new_post(self, session: Option<&Session>) -> NewPost {
        NewPost {
            category: self.category,
            title: self.title,
            content: self.content,
            author_id: session.map(|s| s.user.id),
            author_name: self.author_name,
        }
    }
}

pub async fn create_post(
    store: &dyn DataStore,
    session: Option<&Session>,
    draft: PostDraft,
) -> Result<(), AppError> {
    let post = draft.into_new_post(session);
    store.insert_post(session, &post).await?;
    info!(
        "Created post in '{}' by {}",
        post.category.label(),
        post.author_name
    );
    Ok(())
}
