//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod fake_remote;
pub mod mock_api;

use chrono::{TimeZone, Utc};
use std::path::PathBuf;
use tempfile::TempDir;
use threads_client::config::AuthToken;
use threads_client::model::{Post, PostId, Repost, RepostId, User, UserId, UserSummary};
use threads_client::store::auth::AuthIntent;
use threads_client::store::Store;

pub fn summary(id: &str) -> UserSummary {
    UserSummary {
        id: UserId::from(id),
        username: id.to_string(),
        display_picture: None,
    }
}

pub fn user(id: &str) -> User {
    User {
        id: UserId::from(id),
        username: id.to_string(),
        name: id.to_uppercase(),
        display_picture: None,
        bio: String::new(),
        link: None,
        followers: vec![],
        following: 0,
    }
}

pub fn post(id: &str, creator: &str) -> Post {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Post {
        id: PostId::from(id),
        creator: summary(creator),
        content: format!("content of {}", id),
        image: None,
        likes: 0,
        liked_by: vec![],
        children: vec![],
        parent: None,
        created_at: at,
        updated_at: at,
    }
}

/// Post already liked by `likers`.
pub fn liked_post(id: &str, creator: &str, likers: &[&str]) -> Post {
    let mut p = post(id, creator);
    p.liked_by = likers.iter().map(|u| UserId::from(*u)).collect();
    p.likes = likers.len() as u64;
    p
}

pub fn reply(id: &str, creator: &str, parent: &str) -> Post {
    let mut p = post(id, creator);
    p.parent = Some(PostId::from(parent));
    p
}

pub fn repost(id: &str, creator: &str, post: Post) -> Repost {
    let at = post.created_at;
    Repost {
        id: RepostId::from(id),
        repost_creator: summary(creator),
        post,
        created_at: at,
        updated_at: at,
    }
}

/// Store with `viewer` signed in.
pub fn signed_in_store(viewer: &str) -> Store {
    let store = Store::default();
    store.dispatch(AuthIntent::SignedIn {
        token: AuthToken::new("test-token"),
        user: user(viewer),
    });
    store
}

/// Temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
