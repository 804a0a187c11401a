use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Denormalized author reference embedded in posts and reposts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub display_picture: Option<String>,
}

/// Full user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_picture: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub followers: Vec<UserId>,
    /// Number of accounts this user follows.
    #[serde(default)]
    pub following: u64,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            display_picture: self.display_picture.clone(),
        }
    }

    pub fn is_followed_by(&self, user: &UserId) -> bool {
        self.followers.contains(user)
    }

    /// Add `follower` once. Returns the user unchanged if already following.
    pub fn with_follower(mut self, follower: &UserId) -> Self {
        if !self.followers.contains(follower) {
            self.followers.push(follower.clone());
        }
        self
    }

    pub fn without_follower(mut self, follower: &UserId) -> Self {
        self.followers.retain(|f| f != follower);
        self
    }
}
