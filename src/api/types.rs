//! Request and response payloads.

use serde::{Deserialize, Serialize};

use crate::config::AuthToken;
use crate::model::User;

use super::error::ApiError;

/// Image file to attach to a post or profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// MIME type sniffed from the file contents.
    ///
    /// Anything the `image` crate cannot recognize is rejected before upload.
    pub fn mime_type(&self) -> Result<&'static str, ApiError> {
        image::guess_format(&self.bytes)
            .map(|format| format.to_mime_type())
            .map_err(|_| {
                ApiError::Validation(format!("'{}' is not a supported image", self.file_name))
            })
    }
}

/// New post or reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl NewPost {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            image: None,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() && self.image.is_none() {
            return Err(ApiError::Validation("content is required".to_string()));
        }
        Ok(())
    }
}

/// Changes to an existing post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEdit {
    pub content: String,
    /// Replacement image. `None` keeps the current one.
    pub image: Option<ImageUpload>,
}

impl PostEdit {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.content.trim().is_empty() {
            return Err(ApiError::Validation("content is required".to_string()));
        }
        Ok(())
    }
}

/// Changes to the signed-in user's profile. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub link: Option<String>,
    pub display_picture: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Response of login and signup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthSession {
    pub token: AuthToken,
    pub user: User,
}
