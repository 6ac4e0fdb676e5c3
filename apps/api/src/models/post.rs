use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The four fixed community categories. Serialized with their display labels,
/// which are also the values stored in the `posts.category` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[default]
    #[serde(rename = "Daily Experiences")]
    DailyExperiences,
    #[serde(rename = "Tips & Advice")]
    TipsAndAdvice,
    #[serde(rename = "Medication Discussion")]
    MedicationDiscussion,
    #[serde(rename = "Support & Encouragement")]
    SupportAndEncouragement,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::DailyExperiences,
        Category::TipsAndAdvice,
        Category::MedicationDiscussion,
        Category::SupportAndEncouragement,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::DailyExperiences => "Daily Experiences",
            Category::TipsAndAdvice => "Tips & Advice",
            Category::MedicationDiscussion => "Medication Discussion",
            Category::SupportAndEncouragement => "Support & Encouragement",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// A row of `posts` with its embedded `comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub category: Category,
    pub title: String,
    pub content: String,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub author_id: Option<Uuid>,
    pub author_name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `posts`. `likes` and `created_at` are filled by the store.
#[derive(Debug, Clone, Serialize)]
pub struct NewPost {
    pub category: Category,
    pub title: String,
    pub content: String,
    pub author_id: Option<Uuid>,
    pub author_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub post_id: i64,
    pub author_id: Uuid,
    pub author_name: String,
    pub text: String,
}

/// A row of `post_likes`: at most one per (post, user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostLike {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPostLike {
    pub post_id: i64,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serializes_as_label() {
        let json = serde_json::to_string(&Category::TipsAndAdvice).unwrap();
        assert_eq!(json, "\"Tips & Advice\"");
    }

    #[test]
    fn test_category_from_label_roundtrips_all() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
        }
        assert_eq!(Category::from_label("All"), None);
    }

    #[test]
    fn test_default_category_is_daily_experiences() {
        assert_eq!(Category::default(), Category::DailyExperiences);
    }

    #[test]
    fn test_post_deserializes_without_comments() {
        let json = r#"{
            "id": 7,
            "category": "Support & Encouragement",
            "title": "You are not alone",
            "content": "Take one day at a time.",
            "author_id": null,
            "author_name": "Community_Helper",
            "created_at": "2025-10-03T12:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.category, Category::SupportAndEncouragement);
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());
    }
}
