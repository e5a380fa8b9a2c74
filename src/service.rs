//! Access to the YouTube Data API `commentThreads` resource.

use crate::error::ServiceError;
use crate::models::{CommentThread, CommentThreadListResponse};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::rc::Rc;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://youtube.googleapis.com";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const ACCESS_TOKEN_ENV: &str = "YOUTUBE_ACCESS_TOKEN";
pub const BASE_URL_ENV: &str = "YOUTUBE_API_BASE_URL";

const COMMENT_THREADS_PATH: &str = "/youtube/v3/commentThreads";

/// Remote operations on comment threads, allowing for mocking in tests.
pub trait CommentThreadService {
    fn list(&self, request: &ListRequest) -> Result<CommentThreadListResponse, ServiceError>;

    fn insert(
        &self,
        parts: &[String],
        thread: &CommentThread,
    ) -> Result<CommentThread, ServiceError>;
}

impl<T: CommentThreadService + ?Sized> CommentThreadService for Box<T> {
    fn list(&self, request: &ListRequest) -> Result<CommentThreadListResponse, ServiceError> {
        (**self).list(request)
    }

    fn insert(
        &self,
        parts: &[String],
        thread: &CommentThread,
    ) -> Result<CommentThread, ServiceError> {
        (**self).insert(parts, thread)
    }
}

impl<T: CommentThreadService + ?Sized> CommentThreadService for Rc<T> {
    fn list(&self, request: &ListRequest) -> Result<CommentThreadListResponse, ServiceError> {
        (**self).list(request)
    }

    fn insert(
        &self,
        parts: &[String],
        thread: &CommentThread,
    ) -> Result<CommentThread, ServiceError> {
        (**self).insert(parts, thread)
    }
}

/// Parameters of one `commentThreads.list` call. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListRequest {
    pub parts: Vec<String>,
    pub ids: Vec<String>,
    pub all_threads_related_to_channel_id: String,
    pub channel_id: String,
    pub max_results: Option<i64>,
    pub moderation_status: String,
    pub order: String,
    pub search_terms: String,
    pub text_format: String,
    pub video_id: String,
    pub page_token: String,
}

impl ListRequest {
    /// Returns the query string pairs for this request.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("part", self.parts.join(","))];

        if !self.ids.is_empty() {
            pairs.push(("id", self.ids.join(",")));
        }

        let optional = [
            (
                "allThreadsRelatedToChannelId",
                &self.all_threads_related_to_channel_id,
            ),
            ("channelId", &self.channel_id),
        ];
        for (key, value) in optional {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }

        if let Some(max_results) = self.max_results {
            pairs.push(("maxResults", max_results.to_string()));
        }

        let optional = [
            ("moderationStatus", &self.moderation_status),
            ("order", &self.order),
            ("searchTerms", &self.search_terms),
            ("textFormat", &self.text_format),
            ("videoId", &self.video_id),
            ("pageToken", &self.page_token),
        ];
        for (key, value) in optional {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }

        pairs
    }
}

/// Connection settings for [`YouTubeService`].
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Reads `YOUTUBE_API_KEY`, `YOUTUBE_ACCESS_TOKEN` and `YOUTUBE_API_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, such as a map in tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            api_key: non_empty(API_KEY_ENV),
            access_token: non_empty(ACCESS_TOKEN_ENV),
            base_url: non_empty(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some() || self.access_token.is_some()
    }
}

/// Default implementation that calls the real YouTube Data API over HTTPS.
pub struct YouTubeService {
    client: Client,
    config: ServiceConfig,
}

impl YouTubeService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        if !config.has_credentials() {
            return Err(ServiceError::MissingCredentials);
        }
        let client = Client::builder()
            .user_agent(concat!("yt-comment-threads/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            COMMENT_THREADS_PATH
        )
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(key) = &self.config.api_key {
            request = request.header("X-Goog-Api-Key", key);
        }
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }
        request
    }
}

impl CommentThreadService for YouTubeService {
    fn list(&self, request: &ListRequest) -> Result<CommentThreadListResponse, ServiceError> {
        let query = request.query_pairs();
        debug!(endpoint = %self.endpoint(), ?query, "commentThreads.list");

        let response = self
            .authorize(self.client.get(self.endpoint()).query(&query))
            .send()?;
        let body = read_success_body(response)?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::Parse(format!("Failed to parse comment threads: {e}")))
    }

    fn insert(
        &self,
        parts: &[String],
        thread: &CommentThread,
    ) -> Result<CommentThread, ServiceError> {
        debug!(endpoint = %self.endpoint(), "commentThreads.insert");

        let response = self
            .authorize(
                self.client
                    .post(self.endpoint())
                    .query(&[("part", parts.join(","))])
                    .json(thread),
            )
            .send()?;
        let body = read_success_body(response)?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::Parse(format!("Failed to parse comment thread: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn read_success_body(response: Response) -> Result<String, ServiceError> {
    let status = response.status();
    let body = response.text()?;
    if status.is_success() {
        return Ok(body);
    }
    Err(map_status_error(status, &body))
}

/// Maps a non-success HTTP status and body to a ServiceError.
/// This is a separate function to enable testing of the error mapping logic.
fn map_status_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED => ServiceError::Unauthorized(message),
        StatusCode::FORBIDDEN if message.contains("exceeded your") => {
            ServiceError::QuotaExceeded(message)
        }
        StatusCode::FORBIDDEN => ServiceError::Forbidden(message),
        StatusCode::NOT_FOUND => ServiceError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ServiceError::QuotaExceeded(message),
        s if s.is_server_error() => ServiceError::Server {
            status: s.as_u16(),
            message,
        },
        s => ServiceError::Api {
            status: s.as_u16(),
            message,
        },
    }
}
