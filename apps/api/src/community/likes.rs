use serde::Serialize;
use tracing::info;

use crate::backend::DataStore;
use crate::errors::AppError;
use crate::models::user::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeOutcome {
    Liked,
    Unliked,
}

/// Flips the user's like on a post.
///
/// Reads the like row first, then writes: delete + `decrement_likes` when it
/// exists, insert + `increment_likes` when it doesn't. The read and the write
/// are separate round trips, so two concurrent toggles by the same user can
/// both see the same state.
pub async fn toggle_like(
    store: &dyn DataStore,
    session: &Session,
    post_id: i64,
) -> Result<LikeOutcome, AppError> {
    let outcome = match store.find_like(session, post_id).await? {
        Some(like) => {
            store.delete_like(session, like.id).await?;
            store.decrement_likes(session, post_id).await?;
            LikeOutcome::Unliked
        }
        None => {
            store.insert_like(session, post_id).await?;
            store.increment_likes(session, post_id).await?;
            LikeOutcome::Liked
        }
    };

    info!("User {} {:?} post {}", session.user.id, outcome, post_id);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::models::post::Category;

    #[tokio::test]
    async fn test_like_then_unlike_restores_count() {
        let backend = MemoryBackend::new();
        let post_id = backend.seed_post(Category::TipsAndAdvice, "Winter flares", 1);
        let session = backend.register("fan@example.com");

        let first = toggle_like(&backend, &session, post_id).await.unwrap();
        assert_eq!(first, LikeOutcome::Liked);
        assert_eq!(backend.post(post_id).unwrap().likes, 2);
        assert_eq!(backend.like_rows(), 1);

        let second = toggle_like(&backend, &session, post_id).await.unwrap();
        assert_eq!(second, LikeOutcome::Unliked);
        assert_eq!(backend.post(post_id).unwrap().likes, 1);
        assert_eq!(backend.like_rows(), 0);
    }

    #[tokio::test]
    async fn test_likes_are_per_user() {
        let backend = MemoryBackend::new();
        let post_id = backend.seed_post(Category::DailyExperiences, "Morning stiffness", 0);
        let alice = backend.register("alice@example.com");
        let bob = backend.register("bob@example.com");

        toggle_like(&backend, &alice, post_id).await.unwrap();
        let outcome = toggle_like(&backend, &bob, post_id).await.unwrap();

        assert_eq!(outcome, LikeOutcome::Liked);
        assert_eq!(backend.post(post_id).unwrap().likes, 2);
    }

    #[tokio::test]
    async fn test_like_missing_post_fails_without_counting() {
        let backend = MemoryBackend::new();
        let session = backend.register("fan@example.com");

        let result = toggle_like(&backend, &session, 404).await;
        assert!(matches!(result, Err(AppError::Backend(_))));
        assert_eq!(backend.like_rows(), 0);
    }
}
