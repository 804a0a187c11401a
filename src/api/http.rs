//! reqwest-backed [`RemoteService`].

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::{ApiConfig, AuthToken};
use crate::model::{FeedItem, Post, PostId, Repost, RepostId, Thread, User, UserId};

use super::error::ApiError;
use super::service::RemoteService;
use super::types::{
    AuthSession, Credentials, ImageUpload, NewAccount, NewPost, PostEdit, ProfileEdit,
};

/// Client for the threads REST API.
pub struct HttpService {
    client: Client,
    base_url: Url,
    token: RwLock<Option<AuthToken>>,
}

impl HttpService {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds as u64))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds as u64))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::Validation(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Validation(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            token: RwLock::new(None),
        })
    }

    /// `{base}/api/{segments...}`, each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("api").extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(method = %method, url = %url, "API request");
        self.client.request(method, url)
    }

    /// Request carrying the bearer token. Fails locally when signed out.
    fn authorized(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let token = self.token.read().clone().ok_or_else(|| {
            ApiError::Unauthorized("sign in to perform this action".to_string())
        })?;
        Ok(self.request(method, segments).header(AUTHORIZATION, token.bearer()))
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = check(builder.send().await?).await?;
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        check(builder.send().await?).await?;
        Ok(())
    }
}

/// Turn a non-success response into an [`ApiError`] using the server's message.
async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            }
        });

    tracing::debug!(status = status.as_u16(), message = %message, "API error response");
    Err(ApiError::from_status(status.as_u16(), message))
}

fn image_part(upload: ImageUpload) -> Result<Part, ApiError> {
    let mime = upload.mime_type()?;
    Part::bytes(upload.bytes)
        .file_name(upload.file_name)
        .mime_str(mime)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

fn post_form(content: String, image: Option<ImageUpload>) -> Result<Form, ApiError> {
    let mut form = Form::new().text("content", content);
    if let Some(upload) = image {
        form = form.part("image", image_part(upload)?);
    }
    Ok(form)
}

fn profile_form(edit: ProfileEdit) -> Result<Form, ApiError> {
    let mut form = Form::new();
    if let Some(name) = edit.name {
        form = form.text("name", name);
    }
    if let Some(bio) = edit.bio {
        form = form.text("bio", bio);
    }
    if let Some(link) = edit.link {
        form = form.text("link", link);
    }
    if let Some(upload) = edit.display_picture {
        form = form.part("displayPicture", image_part(upload)?);
    }
    Ok(form)
}

#[async_trait]
impl RemoteService for HttpService {
    fn set_token(&self, token: Option<AuthToken>) {
        *self.token.write() = token;
    }

    async fn list_feed(&self) -> Result<Vec<FeedItem>, ApiError> {
        self.send(self.request(Method::GET, &["posts"])).await
    }

    async fn get_thread(&self, id: &PostId) -> Result<Thread, ApiError> {
        self.send(self.request(Method::GET, &["posts", id.as_str()]))
            .await
    }

    async fn list_user_posts(&self, user: &UserId) -> Result<Vec<FeedItem>, ApiError> {
        self.send(self.request(Method::GET, &["posts", "user", user.as_str()]))
            .await
    }

    async fn list_user_replies(&self, user: &UserId) -> Result<Vec<Post>, ApiError> {
        let segments = ["posts", "user", user.as_str(), "replies"];
        self.send(self.request(Method::GET, &segments)).await
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, ApiError> {
        post.validate()?;
        let form = post_form(post.content, post.image)?;
        self.send(self.authorized(Method::POST, &["posts"])?.multipart(form))
            .await
    }

    async fn create_reply(&self, parent: &PostId, reply: NewPost) -> Result<Post, ApiError> {
        reply.validate()?;
        let form = post_form(reply.content, reply.image)?;
        let segments = ["posts", parent.as_str(), "replies"];
        self.send(self.authorized(Method::POST, &segments)?.multipart(form))
            .await
    }

    async fn edit_post(&self, id: &PostId, edit: PostEdit) -> Result<Post, ApiError> {
        edit.validate()?;
        let form = post_form(edit.content, edit.image)?;
        self.send(
            self.authorized(Method::PATCH, &["posts", id.as_str()])?
                .multipart(form),
        )
        .await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::DELETE, &["posts", id.as_str()])?)
            .await
    }

    async fn like_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::PUT, &["posts", id.as_str(), "like"])?)
            .await
    }

    async fn unlike_post(&self, id: &PostId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::PUT, &["posts", id.as_str(), "unlike"])?)
            .await
    }

    async fn list_user_reposts(&self, user: &UserId) -> Result<Vec<Repost>, ApiError> {
        self.send(self.request(Method::GET, &["reposts", "user", user.as_str()]))
            .await
    }

    async fn create_repost(&self, post: &PostId) -> Result<Repost, ApiError> {
        self.send(self.authorized(Method::POST, &["reposts", post.as_str()])?)
            .await
    }

    async fn delete_repost(&self, id: &RepostId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::DELETE, &["reposts", id.as_str()])?)
            .await
    }

    async fn login(&self, credentials: Credentials) -> Result<AuthSession, ApiError> {
        self.send(self.request(Method::POST, &["users", "login"]).json(&credentials))
            .await
    }

    async fn signup(&self, account: NewAccount) -> Result<AuthSession, ApiError> {
        self.send(self.request(Method::POST, &["users", "signup"]).json(&account))
            .await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.send(self.authorized(Method::GET, &["users", "me"])?)
            .await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, ApiError> {
        self.send(self.request(Method::GET, &["users", id.as_str()]))
            .await
    }

    async fn update_user(&self, edit: ProfileEdit) -> Result<User, ApiError> {
        let form = profile_form(edit)?;
        self.send(self.authorized(Method::PATCH, &["users", "me"])?.multipart(form))
            .await
    }

    async fn follow(&self, id: &UserId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::PUT, &["users", id.as_str(), "follow"])?)
            .await
    }

    async fn unfollow(&self, id: &UserId) -> Result<(), ApiError> {
        self.send_empty(self.authorized(Method::PUT, &["users", id.as_str(), "unfollow"])?)
            .await
    }
}
