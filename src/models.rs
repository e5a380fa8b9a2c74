//! Data models for YouTube comment threads and paginated results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// A top-level comment plus its thread metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThread {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<CommentThreadSnippet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<CommentThreadReplies>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThreadSnippet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub video_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_comment: Option<Comment>,
    #[serde(skip_serializing_if = "is_false")]
    pub can_reply: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_reply_count: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub is_public: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommentThreadReplies {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub etag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<CommentSnippet>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentSnippet {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_profile_image_url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_channel_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_channel_id: Option<AuthorChannelId>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub channel_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub video_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text_display: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text_original: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub parent_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub can_rate: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub viewer_rating: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub like_count: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub moderation_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthorChannelId {
    pub value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub total_results: i64,
    pub results_per_page: i64,
}

impl CommentThread {
    /// Builds the minimal resource submitted by an insert call.
    pub fn for_insert(
        channel_id: &str,
        author_channel_id: &str,
        video_id: &str,
        text_original: &str,
    ) -> Self {
        Self {
            snippet: Some(CommentThreadSnippet {
                channel_id: channel_id.to_string(),
                top_level_comment: Some(Comment {
                    snippet: Some(CommentSnippet {
                        author_channel_id: Some(AuthorChannelId {
                            value: author_channel_id.to_string(),
                        }),
                        channel_id: channel_id.to_string(),
                        text_original: text_original.to_string(),
                        video_id: video_id.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    /// Returns the snippet of the thread's top-level comment, if present.
    pub fn top_level_snippet(&self) -> Option<&CommentSnippet> {
        self.snippet
            .as_ref()?
            .top_level_comment
            .as_ref()?
            .snippet
            .as_ref()
    }

    pub fn author_display_name(&self) -> &str {
        self.top_level_snippet()
            .map(|s| s.author_display_name.as_str())
            .unwrap_or_default()
    }

    /// Video id of the top-level comment, falling back to the thread snippet.
    pub fn video_id(&self) -> &str {
        match self.top_level_snippet() {
            Some(s) if !s.video_id.is_empty() => s.video_id.as_str(),
            _ => self
                .snippet
                .as_ref()
                .map(|s| s.video_id.as_str())
                .unwrap_or_default(),
        }
    }

    pub fn text_display(&self) -> &str {
        self.top_level_snippet()
            .map(|s| s.text_display.as_str())
            .unwrap_or_default()
    }
}

/// One raw page returned by `commentThreads.list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentThreadListResponse {
    pub kind: String,
    pub etag: String,
    pub next_page_token: String,
    pub page_info: Option<PageInfo>,
    pub items: Vec<CommentThread>,
}

/// Result of a paginated fetch: items plus pagination info.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadResponse {
    pub items: Vec<CommentThread>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
    /// Always empty: the API never issues a previous-page token for comment threads.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prev_page_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_results: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FetchMetadata>,
}

impl From<CommentThreadListResponse> for CommentThreadResponse {
    fn from(page: CommentThreadListResponse) -> Self {
        let total_results = page.page_info.as_ref().map_or(0, |p| p.total_results);
        Self {
            items: page.items,
            next_page_token: page.next_page_token,
            prev_page_token: String::new(),
            page_info: page.page_info,
            total_results,
            metadata: None,
        }
    }
}

impl CommentThreadResponse {
    pub fn has_next_page(&self) -> bool {
        !self.next_page_token.is_empty()
    }
}

/// Describes how a fetch-all run ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
    pub fetched: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchMetadata {
    /// More results exist beyond what was returned.
    pub fn truncated(fetched: usize) -> Self {
        Self {
            truncated: Some(true),
            complete: None,
            fetched,
            message: Some(format!(
                "Response limited to {fetched} comments due to size constraints. Use pageToken to continue."
            )),
        }
    }

    /// Every available result was returned.
    pub fn complete(fetched: usize) -> Self {
        Self {
            truncated: None,
            complete: Some(true),
            fetched,
            message: None,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated.unwrap_or(false)
    }

    pub fn is_complete(&self) -> bool {
        self.complete.unwrap_or(false)
    }
}
