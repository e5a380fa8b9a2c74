//! YouTube Comment Threads Library
//!
//! A library for listing, paging through and inserting YouTube comment threads,
//! with JSON, YAML and table output.

pub mod cli;
pub mod comment_thread;
pub mod error;
pub mod models;
pub mod output;
pub mod service;

pub use cli::{Args, Command};
pub use comment_thread::{
    CommentThreadParams, CommentThreads, CommentThreadsBuilder, DEFAULT_PAGE_SIZE,
    FETCH_ALL_MAX_ITEMS, FETCH_ALL_PAGE_SIZE,
};
pub use error::{CommentThreadError, OutputError, ServiceError};
pub use models::{
    CommentThread, CommentThreadListResponse, CommentThreadResponse, FetchMetadata, PageInfo,
};
pub use output::OutputFormat;
pub use service::{CommentThreadService, ListRequest, ServiceConfig, YouTubeService};
