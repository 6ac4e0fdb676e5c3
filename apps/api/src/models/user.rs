use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity issued by the auth provider. Only `id` and `email` are read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Name shown next to comments: the local part of the email address.
    pub fn display_name(&self) -> String {
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .unwrap_or("Member")
            .to_string()
    }
}

/// A signed-in user together with the access token the browser presented.
/// Lives only as long as the request that resolved it.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub access_token: String,
}
