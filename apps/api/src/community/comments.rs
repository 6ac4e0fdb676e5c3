use serde::Deserialize;
use tracing::info;

use crate::backend::DataStore;
use crate::errors::AppError;
use crate::models::post::NewComment;
use crate::models::user::Session;

#[derive(Debug, Deserialize)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub text: String,
}

/// Trimmed comment text; whitespace-only text counts as empty.
pub fn validate_comment(text: &str) -> Result<String, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Validation("Comment cannot be empty".to_string()));
    }
    Ok(text.to_string())
}

pub async fn add_comment(
    store: &dyn DataStore,
    session: &Session,
    post_id: i64,
    text: String,
) -> Result<(), AppError> {
    let comment = NewComment {
        post_id,
        author_id: session.user.id,
        author_name: session.user.display_name(),
        text,
    };
    store.insert_comment(session, &comment).await?;
    info!("User {} commented on post {}", session.user.id, post_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::models::post::Category;

    #[test]
    fn test_validate_comment_trims() {
        assert_eq!(
            validate_comment("  Great tip! I also use a weighted blanket. ").unwrap(),
            "Great tip! I also use a weighted blanket."
        );
    }

    #[test]
    fn test_validate_comment_rejects_blank() {
        assert!(validate_comment("").is_err());
        assert!(validate_comment(" \t ").is_err());
    }

    #[tokio::test]
    async fn test_add_comment_uses_display_name() {
        let backend = MemoryBackend::new();
        let post_id = backend.seed_post(Category::TipsAndAdvice, "Winter flares", 0);
        let session = backend.register("helperuser@example.com");

        add_comment(&backend, &session, post_id, "Great tip!".to_string())
            .await
            .unwrap();

        let posts = backend.list_posts(None).await.unwrap();
        let comment = &posts[0].comments[0];
        assert_eq!(comment.author_name, "helperuser");
        assert_eq!(comment.text, "Great tip!");
    }
}
