//! In-process stand-in for the hosted backend, used by the test suites.
//!
//! Every trait call bumps a counter so tests can assert that a request never
//! reached the backend.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::backend::{AuthProvider, BackendError, DataStore, SignUpOutcome};
use crate::models::pain::{NewPainEntry, PainEntry};
use crate::models::post::{Category, Comment, NewComment, NewPost, Post, PostLike};
use crate::models::user::{Session, User};

#[derive(Default)]
struct Tables {
    next_id: i64,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    likes: Vec<PostLike>,
    entries: Vec<PainEntry>,
    accounts: Vec<Account>,
}

struct Account {
    user: User,
    password: String,
    token: Option<String>,
}

impl Tables {
    fn next(&mut self) -> (i64, DateTime<Utc>) {
        self.next_id += 1;
        let created_at =
            DateTime::<Utc>::from_timestamp(1_759_500_000 + self.next_id * 60, 0).unwrap();
        (self.next_id, created_at)
    }

    fn post_mut(&mut self, post_id: i64) -> Result<&mut Post, BackendError> {
        self.posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| BackendError::Api {
                status: 409,
                message: format!("post {post_id} does not exist"),
            })
    }

    fn user_for_token(&self, token: &str) -> Option<&User> {
        self.accounts
            .iter()
            .find(|a| a.token.as_deref() == Some(token))
            .map(|a| &a.user)
    }
}

#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_auth: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of backend calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent read fail as if the network were down.
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// Makes the auth provider unreachable.
    pub fn fail_auth(&self) {
        self.fail_auth.store(true, Ordering::SeqCst);
    }

    pub fn seed_post(&self, category: Category, title: &str, likes: i64) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        let (id, created_at) = tables.next();
        tables.posts.push(Post {
            id,
            category,
            title: title.to_string(),
            content: format!("{title} (content)"),
            author_id: None,
            author_name: "TestUser".to_string(),
            created_at,
            likes,
            comments: Vec::new(),
        });
        id
    }

    /// Creates a confirmed account that is already signed in.
    pub fn register(&self, email: &str) -> Session {
        let mut tables = self.tables.lock().unwrap();
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        let token = format!("token-{}", user.id);
        tables.accounts.push(Account {
            user: user.clone(),
            password: "correct horse".to_string(),
            token: Some(token.clone()),
        });
        Session {
            user,
            access_token: token,
        }
    }

    pub fn post(&self, post_id: i64) -> Option<Post> {
        let tables = self.tables.lock().unwrap();
        tables.posts.iter().find(|p| p.id == post_id).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.tables.lock().unwrap().posts.len()
    }

    pub fn like_rows(&self) -> usize {
        self.tables.lock().unwrap().likes.len()
    }

    pub fn pain_entries(&self) -> Vec<PainEntry> {
        self.tables.lock().unwrap().entries.clone()
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn read_guard(&self) -> Result<(), BackendError> {
        self.record_call();
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Api {
                status: 503,
                message: "backend unreachable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataStore for MemoryBackend {
    async fn list_posts(&self, _session: Option<&Session>) -> Result<Vec<Post>, BackendError> {
        self.read_guard()?;
        let tables = self.tables.lock().unwrap();
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .cloned()
            .map(|mut post| {
                post.comments = tables
                    .comments
                    .iter()
                    .filter(|c| c.post_id == post.id)
                    .cloned()
                    .collect();
                post
            })
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn liked_post_ids(&self, session: &Session) -> Result<HashSet<i64>, BackendError> {
        self.read_guard()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .likes
            .iter()
            .filter(|l| l.user_id == session.user.id)
            .map(|l| l.post_id)
            .collect())
    }

    async fn insert_post(
        &self,
        _session: Option<&Session>,
        post: &NewPost,
    ) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        let (id, created_at) = tables.next();
        tables.posts.push(Post {
            id,
            category: post.category,
            title: post.title.clone(),
            content: post.content.clone(),
            author_id: post.author_id,
            author_name: post.author_name.clone(),
            created_at,
            likes: 0,
            comments: Vec::new(),
        });
        Ok(())
    }

    async fn find_like(
        &self,
        session: &Session,
        post_id: i64,
    ) -> Result<Option<PostLike>, BackendError> {
        self.read_guard()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .likes
            .iter()
            .find(|l| l.post_id == post_id && l.user_id == session.user.id)
            .cloned())
    }

    async fn insert_like(&self, session: &Session, post_id: i64) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        tables.post_mut(post_id)?;
        let (id, _) = tables.next();
        tables.likes.push(PostLike {
            id,
            post_id,
            user_id: session.user.id,
        });
        Ok(())
    }

    async fn delete_like(&self, _session: &Session, like_id: i64) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        tables.likes.retain(|l| l.id != like_id);
        Ok(())
    }

    async fn increment_likes(
        &self,
        _session: &Session,
        post_id: i64,
    ) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        tables.post_mut(post_id)?.likes += 1;
        Ok(())
    }

    async fn decrement_likes(
        &self,
        _session: &Session,
        post_id: i64,
    ) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        let post = tables.post_mut(post_id)?;
        post.likes = (post.likes - 1).max(0);
        Ok(())
    }

    async fn insert_comment(
        &self,
        _session: &Session,
        comment: &NewComment,
    ) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        tables.post_mut(comment.post_id)?;
        let (id, created_at) = tables.next();
        tables.comments.push(Comment {
            id,
            post_id: comment.post_id,
            author_id: Some(comment.author_id),
            author_name: comment.author_name.clone(),
            text: comment.text.clone(),
            created_at,
        });
        Ok(())
    }

    async fn recent_pain_entries(
        &self,
        session: &Session,
        limit: usize,
    ) -> Result<Vec<PainEntry>, BackendError> {
        self.read_guard()?;
        let tables = self.tables.lock().unwrap();
        let mut entries: Vec<PainEntry> = tables
            .entries
            .iter()
            .filter(|e| e.user_id == session.user.id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn insert_pain_entry(
        &self,
        _session: &Session,
        entry: &NewPainEntry,
    ) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        let (id, created_at) = tables.next();
        tables.entries.push(PainEntry {
            id,
            user_id: entry.user_id,
            pain_level: entry.pain_level,
            fatigue_level: entry.fatigue_level,
            medication: entry.medication.clone(),
            weather_impact: entry.weather_impact,
            triggers: entry.triggers.clone(),
            notes: entry.notes.clone(),
            created_at,
        });
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        if tables
            .accounts
            .iter()
            .any(|a| a.user.email.as_deref() == Some(email))
        {
            return Err(BackendError::Invalid("User already registered".to_string()));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
        };
        tables.accounts.push(Account {
            user: user.clone(),
            password: password.to_string(),
            token: None,
        });
        Ok(SignUpOutcome {
            user: Some(user),
            confirmation_required: true,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        let account = tables
            .accounts
            .iter_mut()
            .find(|a| a.user.email.as_deref() == Some(email) && a.password == password)
            .ok_or_else(|| BackendError::AuthRejected("Invalid login credentials".to_string()))?;
        let token = format!("token-{}", Uuid::new_v4());
        account.token = Some(token.clone());
        Ok(Session {
            user: account.user.clone(),
            access_token: token,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.record_call();
        let mut tables = self.tables.lock().unwrap();
        for account in tables.accounts.iter_mut() {
            if account.token.as_deref() == Some(access_token) {
                account.token = None;
            }
        }
        Ok(())
    }

    async fn user_for_token(&self, access_token: &str) -> Result<User, BackendError> {
        self.record_call();
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(BackendError::Api {
                status: 503,
                message: "auth unreachable".to_string(),
            });
        }
        let tables = self.tables.lock().unwrap();
        tables
            .user_for_token(access_token)
            .cloned()
            .ok_or_else(|| BackendError::AuthRejected("invalid JWT".to_string()))
    }
}
