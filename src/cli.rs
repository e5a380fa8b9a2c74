//! CLI interface and argument parsing.

use crate::comment_thread::{CommentThreads, CommentThreadsBuilder};
use crate::output::OutputFormat;
use crate::service::{ServiceConfig, DEFAULT_BASE_URL};
use clap::{ArgAction, Parser, Subcommand};

/// CLI tool to list and insert YouTube comment threads.
#[derive(Parser, Debug)]
#[command(name = "yt-comment-threads")]
#[command(version)]
#[command(about = "List and insert YouTube comment threads")]
pub struct Args {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// OAuth 2.0 access token (required for insert)
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// API base URL
    #[arg(long, env = "YOUTUBE_API_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Write output to file
    #[arg(short = 'O', long, global = true)]
    pub output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List comment threads
    List(ListArgs),
    /// Insert a new top-level comment
    Insert(InsertArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Comment thread IDs (comma separated)
    #[arg(short = 'i', long, value_delimiter = ',')]
    pub ids: Vec<String>,

    /// Return all threads associated with this channel
    #[arg(short = 'a', long)]
    pub all_threads_related_to_channel_id: Option<String>,

    /// Channel ID
    #[arg(short = 'c', long)]
    pub channel_id: Option<String>,

    /// Maximum items per page (values below 1 become 1)
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    pub max_results: Option<i64>,

    /// Moderation status: heldForReview, likelySpam or published
    #[arg(long)]
    pub moderation_status: Option<String>,

    /// Sort order: time or relevance
    #[arg(long)]
    pub order: Option<String>,

    /// Only return threads containing these terms
    #[arg(short = 's', long)]
    pub search_terms: Option<String>,

    /// Text format: html or plainText
    #[arg(short = 't', long)]
    pub text_format: Option<String>,

    /// Video ID
    #[arg(long)]
    pub video_id: Option<String>,

    /// Page token to continue from
    #[arg(long)]
    pub page_token: Option<String>,

    /// Page through results, stopping at 10 threads
    #[arg(long)]
    pub fetch_all: bool,

    /// Resource parts to request (comma separated)
    #[arg(short = 'p', long, value_delimiter = ',', default_value = "id,snippet")]
    pub parts: Vec<String>,

    /// Output format
    #[arg(short = 'f', long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// JSON path applied to json/yaml output
    #[arg(short = 'j', long)]
    pub json_path: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct InsertArgs {
    /// Channel ID of the video
    #[arg(short = 'c', long)]
    pub channel_id: String,

    /// Channel ID of the comment author
    #[arg(short = 'a', long)]
    pub author_channel_id: String,

    /// Video ID
    #[arg(long)]
    pub video_id: String,

    /// Comment text
    #[arg(short = 't', long)]
    pub text_original: String,

    /// Output format
    #[arg(short = 'f', long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// JSON path applied to json/yaml output
    #[arg(short = 'j', long)]
    pub json_path: Option<String>,
}

impl Args {
    /// Connection settings from the global flags and environment.
    pub fn service_config(&self) -> ServiceConfig {
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.trim().is_empty());
        ServiceConfig {
            api_key: non_empty(&self.api_key),
            access_token: non_empty(&self.access_token),
            base_url: self.base_url.clone(),
        }
    }
}

impl ListArgs {
    /// Applies every supplied flag to a client builder.
    pub fn builder(&self) -> CommentThreadsBuilder {
        let mut builder = CommentThreads::builder()
            .with_ids(self.ids.iter().filter(|id| !id.is_empty()).cloned())
            .with_fetch_all(self.fetch_all);

        if let Some(v) = &self.all_threads_related_to_channel_id {
            builder = builder.with_all_threads_related_to_channel_id(v);
        }
        if let Some(v) = &self.channel_id {
            builder = builder.with_channel_id(v);
        }
        if let Some(v) = self.max_results {
            builder = builder.with_max_results(v);
        }
        if let Some(v) = &self.moderation_status {
            builder = builder.with_moderation_status(v);
        }
        if let Some(v) = &self.order {
            builder = builder.with_order(v);
        }
        if let Some(v) = &self.search_terms {
            builder = builder.with_search_terms(v);
        }
        if let Some(v) = &self.text_format {
            builder = builder.with_text_format(v);
        }
        if let Some(v) = &self.video_id {
            builder = builder.with_video_id(v);
        }
        if let Some(v) = &self.page_token {
            builder = builder.with_page_token(v);
        }
        builder
    }
}

impl InsertArgs {
    pub fn builder(&self) -> CommentThreadsBuilder {
        CommentThreads::builder()
            .with_channel_id(&self.channel_id)
            .with_author_channel_id(&self.author_channel_id)
            .with_video_id(&self.video_id)
            .with_text_original(&self.text_original)
    }
}
