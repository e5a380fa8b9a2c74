//! The comment-thread client: filtered listing, bounded pagination and insert.

use crate::error::{CommentThreadError, OutputError};
use crate::models::{CommentThread, CommentThreadResponse, FetchMetadata};
use crate::output::{print_json, print_yaml, render_threads_table, write_threads_text, OutputFormat};
use crate::service::{CommentThreadService, ListRequest, ServiceConfig, YouTubeService};
use std::io::Write;
use tracing::{debug, info, warn};

/// Maximum number of threads returned by a fetch-all run.
pub const FETCH_ALL_MAX_ITEMS: usize = 10;
/// Page size forced while paging in fetch-all mode.
pub const FETCH_ALL_PAGE_SIZE: i64 = 5;
/// Page size used when the caller sets none.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Query and insert parameters. Empty fields are not sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentThreadParams {
    pub ids: Vec<String>,
    pub all_threads_related_to_channel_id: String,
    pub author_channel_id: String,
    pub channel_id: String,
    pub max_results: Option<i64>,
    pub moderation_status: String,
    pub order: String,
    pub search_terms: String,
    pub text_format: String,
    pub text_original: String,
    pub video_id: String,
    pub page_token: String,
    pub fetch_all: bool,
}

/// Builder for [`CommentThreads`]; one `with_*` method per parameter.
#[derive(Default)]
pub struct CommentThreadsBuilder {
    params: CommentThreadParams,
    service: Option<Box<dyn CommentThreadService>>,
}

impl CommentThreadsBuilder {
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_all_threads_related_to_channel_id(mut self, id: impl Into<String>) -> Self {
        self.params.all_threads_related_to_channel_id = id.into();
        self
    }

    pub fn with_author_channel_id(mut self, id: impl Into<String>) -> Self {
        self.params.author_channel_id = id.into();
        self
    }

    pub fn with_channel_id(mut self, id: impl Into<String>) -> Self {
        self.params.channel_id = id.into();
        self
    }

    /// Sets the page size; zero or negative values become 1.
    pub fn with_max_results(mut self, max_results: i64) -> Self {
        self.params.max_results = Some(max_results.max(1));
        self
    }

    pub fn with_moderation_status(mut self, status: impl Into<String>) -> Self {
        self.params.moderation_status = status.into();
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.params.order = order.into();
        self
    }

    pub fn with_search_terms(mut self, terms: impl Into<String>) -> Self {
        self.params.search_terms = terms.into();
        self
    }

    pub fn with_text_format(mut self, format: impl Into<String>) -> Self {
        self.params.text_format = format.into();
        self
    }

    pub fn with_text_original(mut self, text: impl Into<String>) -> Self {
        self.params.text_original = text.into();
        self
    }

    pub fn with_video_id(mut self, id: impl Into<String>) -> Self {
        self.params.video_id = id.into();
        self
    }

    pub fn with_page_token(mut self, token: impl Into<String>) -> Self {
        self.params.page_token = token.into();
        self
    }

    pub fn with_fetch_all(mut self, fetch_all: bool) -> Self {
        self.params.fetch_all = fetch_all;
        self
    }

    pub fn with_service(mut self, service: Box<dyn CommentThreadService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Builds the client. Without an explicit service, a [`YouTubeService`]
    /// is configured from the environment.
    pub fn build(self) -> Result<CommentThreads, CommentThreadError> {
        self.build_with(ServiceConfig::from_env)
    }

    /// Like [`build`](Self::build), reading the default service's settings
    /// through `lookup` instead of the process environment.
    pub fn build_with_lookup(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<CommentThreads, CommentThreadError> {
        self.build_with(|| ServiceConfig::from_lookup(lookup))
    }

    fn build_with(
        self,
        config: impl FnOnce() -> ServiceConfig,
    ) -> Result<CommentThreads, CommentThreadError> {
        let service = match self.service {
            Some(service) => service,
            None => Box::new(YouTubeService::new(config()).map_err(CommentThreadError::Service)?),
        };
        Ok(CommentThreads::new(self.params, service))
    }
}

/// Client for the `commentThreads` resource.
pub struct CommentThreads {
    params: CommentThreadParams,
    service: Box<dyn CommentThreadService>,
}

impl CommentThreads {
    pub fn new(params: CommentThreadParams, service: Box<dyn CommentThreadService>) -> Self {
        Self { params, service }
    }

    pub fn builder() -> CommentThreadsBuilder {
        CommentThreadsBuilder::default()
    }

    pub fn params(&self) -> &CommentThreadParams {
        &self.params
    }

    /// Page size sent by [`get_with_pagination`](Self::get_with_pagination).
    pub fn effective_page_size(&self) -> i64 {
        if self.params.fetch_all {
            return FETCH_ALL_PAGE_SIZE;
        }
        match self.params.max_results {
            Some(n) if n > 0 => n,
            _ => DEFAULT_PAGE_SIZE,
        }
    }

    fn list_request<S: AsRef<str>>(&self, parts: &[S], max_results: Option<i64>) -> ListRequest {
        let p = &self.params;
        ListRequest {
            parts: parts.iter().map(|s| s.as_ref().to_string()).collect(),
            ids: p.ids.clone(),
            all_threads_related_to_channel_id: p.all_threads_related_to_channel_id.clone(),
            channel_id: p.channel_id.clone(),
            max_results,
            moderation_status: p.moderation_status.clone(),
            order: p.order.clone(),
            search_terms: p.search_terms.clone(),
            text_format: p.text_format.clone(),
            video_id: p.video_id.clone(),
            page_token: p.page_token.clone(),
        }
    }

    /// Runs one list call using every non-empty parameter as a filter.
    pub fn get<S: AsRef<str>>(&self, parts: &[S]) -> Result<Vec<CommentThread>, CommentThreadError> {
        let request = self.list_request(parts, self.params.max_results);
        debug!(page_token = %request.page_token, "listing comment threads");
        let page = self.service.list(&request).map_err(CommentThreadError::Get)?;
        Ok(page.items)
    }

    /// Runs one list call and returns the page with its pagination info.
    pub fn get_with_pagination<S: AsRef<str>>(
        &self,
        parts: &[S],
    ) -> Result<CommentThreadResponse, CommentThreadError> {
        let request = self.list_request(parts, Some(self.effective_page_size()));
        debug!(
            page_token = %request.page_token,
            max_results = ?request.max_results,
            "listing comment thread page"
        );
        let page = self.service.list(&request).map_err(CommentThreadError::Get)?;
        Ok(CommentThreadResponse::from(page))
    }

    /// Fetches either a single page or, in fetch-all mode, up to
    /// [`FETCH_ALL_MAX_ITEMS`] threads across pages.
    ///
    /// A fetch-all run is marked `truncated` only when more threads exist
    /// past the returned ones. Exactly [`FETCH_ALL_MAX_ITEMS`] threads with
    /// no next page is reported as `complete`.
    pub fn fetch<S: AsRef<str>>(
        &mut self,
        parts: &[S],
    ) -> Result<CommentThreadResponse, CommentThreadError> {
        if !self.params.fetch_all {
            return self.get_with_pagination(parts);
        }

        let original_max_results = self.params.max_results;
        let original_page_token = self.params.page_token.clone();
        self.params.max_results = Some(FETCH_ALL_PAGE_SIZE);

        let result = self.fetch_bounded(parts);

        self.params.max_results = original_max_results;
        self.params.page_token = original_page_token;
        result
    }

    fn fetch_bounded<S: AsRef<str>>(
        &mut self,
        parts: &[S],
    ) -> Result<CommentThreadResponse, CommentThreadError> {
        let mut items: Vec<CommentThread> = Vec::new();
        let mut last_page = CommentThreadResponse::default();
        let mut truncated = false;

        while items.len() < FETCH_ALL_MAX_ITEMS {
            let mut page = self.get_with_pagination(parts)?;
            let page_items = std::mem::take(&mut page.items);
            let remaining = FETCH_ALL_MAX_ITEMS - items.len();
            info!(
                page_items = page_items.len(),
                fetched = items.len(),
                "fetched comment thread page"
            );

            if page_items.len() > remaining {
                items.extend(page_items.into_iter().take(remaining));
                truncated = true;
                last_page = page;
                break;
            }
            items.extend(page_items);

            if !page.has_next_page() {
                last_page = page;
                break;
            }
            if items.len() >= FETCH_ALL_MAX_ITEMS {
                truncated = true;
                last_page = page;
                break;
            }
            if page.next_page_token == self.params.page_token {
                warn!(token = %page.next_page_token, "page token did not advance, stopping");
                last_page = page;
                break;
            }

            self.params.page_token = page.next_page_token.clone();
            last_page = page;
        }

        let fetched = items.len();
        last_page.items = items;
        last_page.metadata = Some(if truncated {
            warn!(fetched, "comment threads truncated at fetch-all limit");
            FetchMetadata::truncated(fetched)
        } else {
            FetchMetadata::complete(fetched)
        });
        Ok(last_page)
    }

    /// Fetches threads and writes them to `writer` in the requested format.
    pub fn list<S: AsRef<str>>(
        &mut self,
        parts: &[S],
        format: OutputFormat,
        json_path: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<(), CommentThreadError> {
        let response = self.fetch(parts)?;

        match format {
            OutputFormat::Json => print_json(&response, json_path, writer)?,
            OutputFormat::Yaml => print_yaml(&response, json_path, writer)?,
            OutputFormat::Table => render_threads_table(&response.items, writer)?,
            OutputFormat::Text => write_threads_text(&response.items, writer)?,
            OutputFormat::Silent => {}
        }
        Ok(())
    }

    /// Inserts a new top-level comment and reports the created resource.
    pub fn insert(
        &self,
        format: OutputFormat,
        json_path: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<CommentThread, CommentThreadError> {
        let p = &self.params;
        let required = [
            ("channel_id", &p.channel_id),
            ("author_channel_id", &p.author_channel_id),
            ("video_id", &p.video_id),
            ("text_original", &p.text_original),
        ];
        if let Some((name, _)) = required.into_iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CommentThreadError::MissingField(name));
        }

        let thread = CommentThread::for_insert(
            &p.channel_id,
            &p.author_channel_id,
            &p.video_id,
            &p.text_original,
        );
        debug!(video_id = %p.video_id, "inserting comment thread");
        let inserted = self
            .service
            .insert(&["snippet".to_string()], &thread)
            .map_err(CommentThreadError::Insert)?;
        info!(id = %inserted.id, "comment thread inserted");

        match format {
            OutputFormat::Json => print_json(&inserted, json_path, writer)?,
            OutputFormat::Yaml => print_yaml(&inserted, json_path, writer)?,
            OutputFormat::Silent => {}
            OutputFormat::Text | OutputFormat::Table => {
                writeln!(writer, "CommentThread inserted: {}", inserted.id)
                    .map_err(OutputError::from)?;
            }
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::models::{
        Comment, CommentSnippet, CommentThreadListResponse, CommentThreadSnippet, PageInfo,
    };
    use serde_json::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PARTS: [&str; 2] = ["id", "snippet"];

    /// Mock service serving synthetic pages keyed by page token.
    #[derive(Default)]
    struct MockService {
        pages: Vec<CommentThreadListResponse>,
        fail_list: bool,
        fail_insert: bool,
        list_calls: RefCell<Vec<ListRequest>>,
        inserted: RefCell<Vec<CommentThread>>,
    }

    impl MockService {
        fn paged(sizes: &[usize]) -> Self {
            let total: usize = sizes.iter().sum();
            let pages = sizes
                .iter()
                .enumerate()
                .map(|(i, &size)| CommentThreadListResponse {
                    next_page_token: if i + 1 < sizes.len() {
                        format!("page-{}", i + 1)
                    } else {
                        String::new()
                    },
                    page_info: Some(PageInfo {
                        total_results: total as i64,
                        results_per_page: size as i64,
                    }),
                    items: (0..size).map(|j| thread(&format!("t{i}-{j}"))).collect(),
                    ..Default::default()
                })
                .collect();
            Self {
                pages,
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail_list: true,
                fail_insert: true,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<ListRequest> {
            self.list_calls.borrow().clone()
        }
    }

    impl CommentThreadService for MockService {
        fn list(&self, request: &ListRequest) -> Result<CommentThreadListResponse, ServiceError> {
            self.list_calls.borrow_mut().push(request.clone());
            if self.fail_list {
                return Err(ServiceError::Api {
                    status: 400,
                    message: "boom".to_string(),
                });
            }
            let index = request
                .page_token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(0);
            Ok(self.pages.get(index).cloned().unwrap_or_default())
        }

        fn insert(
            &self,
            parts: &[String],
            thread: &CommentThread,
        ) -> Result<CommentThread, ServiceError> {
            assert_eq!(parts, ["snippet".to_string()]);
            if self.fail_insert {
                return Err(ServiceError::Forbidden("comments disabled".to_string()));
            }
            self.inserted.borrow_mut().push(thread.clone());
            let mut created = thread.clone();
            created.id = "UgxNewThread".to_string();
            Ok(created)
        }
    }

    fn thread(id: &str) -> CommentThread {
        CommentThread {
            id: id.to_string(),
            snippet: Some(CommentThreadSnippet {
                video_id: "vid".to_string(),
                top_level_comment: Some(Comment {
                    id: id.to_string(),
                    snippet: Some(CommentSnippet {
                        author_display_name: "Alice".to_string(),
                        video_id: "vid".to_string(),
                        text_display: format!("comment {id}"),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn client(service: &Rc<MockService>, builder: CommentThreadsBuilder) -> CommentThreads {
        builder
            .with_service(Box::new(Rc::clone(service)))
            .build()
            .unwrap()
    }

    fn insert_builder() -> CommentThreadsBuilder {
        CommentThreads::builder()
            .with_channel_id("UCchannel")
            .with_author_channel_id("UCauthor")
            .with_video_id("vid")
            .with_text_original("Nice!")
    }

    #[test]
    fn test_build_without_service_requires_credentials() {
        let result = CommentThreads::builder().build_with_lookup(|_| None);
        assert!(matches!(
            result,
            Err(CommentThreadError::Service(ServiceError::MissingCredentials))
        ));
    }

    #[test]
    fn test_build_without_service_uses_default_service() {
        let client = CommentThreads::builder()
            .with_video_id("vid")
            .build_with_lookup(|key| match key {
                crate::service::API_KEY_ENV => Some("key-123".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(client.params().video_id, "vid");
    }

    #[test]
    fn test_build_with_injected_service_skips_credentials() {
        let service = Rc::new(MockService::default());
        let result = CommentThreads::builder()
            .with_service(Box::new(Rc::clone(&service)))
            .build_with_lookup(|_| None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_max_results_normalized() {
        let service = Rc::new(MockService::default());
        for (input, expected) in [(0, 1), (-5, 1), (1, 1), (50, 50)] {
            let c = client(&service, CommentThreads::builder().with_max_results(input));
            assert_eq!(c.params().max_results, Some(expected));
        }
    }

    #[test]
    fn test_effective_page_size() {
        let service = Rc::new(MockService::default());
        let c = client(&service, CommentThreads::builder());
        assert_eq!(c.effective_page_size(), DEFAULT_PAGE_SIZE);

        let c = client(&service, CommentThreads::builder().with_max_results(3));
        assert_eq!(c.effective_page_size(), 3);

        let c = client(
            &service,
            CommentThreads::builder().with_max_results(50).with_fetch_all(true),
        );
        assert_eq!(c.effective_page_size(), FETCH_ALL_PAGE_SIZE);
    }

    #[test]
    fn test_get_passes_filters() {
        let service = Rc::new(MockService::paged(&[2]));
        let c = client(
            &service,
            CommentThreads::builder()
                .with_ids(["a", "b"])
                .with_video_id("vid")
                .with_order("time")
                .with_search_terms("rust")
                .with_max_results(7),
        );
        let items = c.get(&PARTS).unwrap();
        assert_eq!(items.len(), 2);

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].parts, vec!["id", "snippet"]);
        assert_eq!(calls[0].ids, vec!["a", "b"]);
        assert_eq!(calls[0].video_id, "vid");
        assert_eq!(calls[0].order, "time");
        assert_eq!(calls[0].search_terms, "rust");
        assert_eq!(calls[0].max_results, Some(7));
        assert_eq!(calls[0].channel_id, "");
    }

    #[test]
    fn test_get_failure_wraps_error() {
        let service = Rc::new(MockService::failing());
        let c = client(&service, CommentThreads::builder());
        let err = c.get(&PARTS).unwrap_err();
        assert!(matches!(err, CommentThreadError::Get(ServiceError::Api { .. })));
        assert!(err.to_string().contains("failed to get comment thread"));
    }

    #[test]
    fn test_get_with_pagination_default_page_size() {
        let service = Rc::new(MockService::paged(&[3, 2]));
        let c = client(&service, CommentThreads::builder());
        let response = c.get_with_pagination(&PARTS).unwrap();
        assert_eq!(response.items.len(), 3);
        assert_eq!(response.next_page_token, "page-1");
        assert_eq!(response.prev_page_token, "");
        assert_eq!(response.total_results, 5);
        assert_eq!(service.calls()[0].max_results, Some(DEFAULT_PAGE_SIZE));
    }

    #[test]
    fn test_get_with_pagination_fetch_all_forces_page_size() {
        let service = Rc::new(MockService::paged(&[3]));
        let c = client(
            &service,
            CommentThreads::builder().with_max_results(40).with_fetch_all(true),
        );
        c.get_with_pagination(&PARTS).unwrap();
        assert_eq!(service.calls()[0].max_results, Some(FETCH_ALL_PAGE_SIZE));
    }

    #[test]
    fn test_single_page_fetch_makes_one_call() {
        let service = Rc::new(MockService::paged(&[3, 3, 3]));
        let mut c = client(&service, CommentThreads::builder().with_max_results(3));
        let response = c.fetch(&PARTS).unwrap();

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].max_results, Some(3));
        assert_eq!(calls[0].page_token, "");
        assert_eq!(response.items.len(), 3);
        assert!(response.metadata.is_none());
    }

    #[test]
    fn test_single_page_fetch_uses_page_token() {
        let service = Rc::new(MockService::paged(&[3, 2]));
        let mut c = client(&service, CommentThreads::builder().with_page_token("page-1"));
        let response = c.fetch(&PARTS).unwrap();
        assert_eq!(response.items.len(), 2);
        assert!(!response.has_next_page());
        assert_eq!(service.calls()[0].page_token, "page-1");
    }

    #[test]
    fn test_fetch_all_truncates_at_cap() {
        let service = Rc::new(MockService::paged(&[5, 5, 5]));
        let mut c = client(&service, CommentThreads::builder().with_fetch_all(true));
        let response = c.fetch(&PARTS).unwrap();

        assert_eq!(response.items.len(), FETCH_ALL_MAX_ITEMS);
        let meta = response.metadata.unwrap();
        assert!(meta.is_truncated());
        assert_eq!(meta.fetched, 10);

        let calls = service.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].page_token, "");
        assert_eq!(calls[1].page_token, "page-1");
        assert!(calls.iter().all(|r| r.max_results == Some(FETCH_ALL_PAGE_SIZE)));
        assert_eq!(response.items[5].id, "t1-0");
    }

    #[test]
    fn test_fetch_all_caps_for_larger_results() {
        for sizes in [vec![5, 5, 5, 5], vec![12], vec![4, 4, 4], vec![5, 5, 1]] {
            let service = Rc::new(MockService::paged(&sizes));
            let mut c = client(&service, CommentThreads::builder().with_fetch_all(true));
            let response = c.fetch(&PARTS).unwrap();
            assert_eq!(response.items.len(), 10, "sizes {sizes:?}");
            assert!(response.metadata.unwrap().is_truncated(), "sizes {sizes:?}");
        }
    }

    #[test]
    fn test_fetch_all_complete_when_results_run_out() {
        for sizes in [vec![], vec![3], vec![5, 4], vec![2, 2, 2, 2]] {
            let total: usize = sizes.iter().sum();
            let service = Rc::new(MockService::paged(&sizes));
            let mut c = client(&service, CommentThreads::builder().with_fetch_all(true));
            let response = c.fetch(&PARTS).unwrap();
            assert_eq!(response.items.len(), total, "sizes {sizes:?}");
            let meta = response.metadata.unwrap();
            assert!(meta.is_complete(), "sizes {sizes:?}");
            assert_eq!(meta.fetched, total);
            assert!(meta.message.is_none());
        }
    }

    #[test]
    fn test_fetch_all_exactly_cap_without_more_pages_is_complete() {
        let service = Rc::new(MockService::paged(&[5, 5]));
        let mut c = client(&service, CommentThreads::builder().with_fetch_all(true));
        let response = c.fetch(&PARTS).unwrap();
        assert_eq!(response.items.len(), 10);
        assert!(response.metadata.unwrap().is_complete());
    }

    #[test]
    fn test_fetch_all_restores_params() {
        let service = Rc::new(MockService::paged(&[5, 5, 5]));
        let mut c = client(
            &service,
            CommentThreads::builder().with_fetch_all(true).with_max_results(42),
        );
        c.fetch(&PARTS).unwrap();
        assert_eq!(c.params().max_results, Some(42));
        assert_eq!(c.params().page_token, "");

        let mut unset = client(&service, CommentThreads::builder().with_fetch_all(true));
        unset.fetch(&PARTS).unwrap();
        assert_eq!(unset.params().max_results, None);
    }

    #[test]
    fn test_fetch_all_restores_params_on_error() {
        let service = Rc::new(MockService::failing());
        let mut c = client(
            &service,
            CommentThreads::builder()
                .with_fetch_all(true)
                .with_max_results(8)
                .with_page_token("start"),
        );
        let err = c.fetch(&PARTS).unwrap_err();
        assert!(matches!(err, CommentThreadError::Get(_)));
        assert_eq!(c.params().max_results, Some(8));
        assert_eq!(c.params().page_token, "start");
    }

    #[test]
    fn test_fetch_all_stops_when_token_repeats() {
        let stuck = CommentThreadListResponse {
            next_page_token: "page-0".to_string(),
            items: vec![thread("only")],
            ..Default::default()
        };
        let service = Rc::new(MockService {
            pages: vec![stuck],
            ..Default::default()
        });
        let mut c = client(
            &service,
            CommentThreads::builder()
                .with_fetch_all(true)
                .with_page_token("page-0"),
        );
        let response = c.fetch(&PARTS).unwrap();
        assert_eq!(service.calls().len(), 1);
        assert_eq!(response.items.len(), 1);
    }

    #[test]
    fn test_list_json_single_page_includes_pagination() {
        let service = Rc::new(MockService::paged(&[2, 2]));
        let mut c = client(&service, CommentThreads::builder());
        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Json, None, &mut buf).unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 2);
        assert_eq!(value["nextPageToken"], "page-1");
        assert_eq!(value["totalResults"], 4);
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_list_json_fetch_all_includes_metadata() {
        let service = Rc::new(MockService::paged(&[5, 5, 5]));
        let mut c = client(&service, CommentThreads::builder().with_fetch_all(true));
        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Json, None, &mut buf).unwrap();

        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["items"].as_array().unwrap().len(), 10);
        assert_eq!(value["metadata"]["truncated"], true);
        assert_eq!(value["metadata"]["fetched"], 10);
    }

    #[test]
    fn test_list_yaml_with_json_path() {
        let service = Rc::new(MockService::paged(&[2]));
        let mut c = client(&service, CommentThreads::builder());
        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Yaml, Some("$.items[*].id"), &mut buf)
            .unwrap();
        let value: Value = serde_yaml::from_slice(&buf).unwrap();
        assert_eq!(value, serde_json::json!(["t0-0", "t0-1"]));
    }

    #[test]
    fn test_list_table() {
        let service = Rc::new(MockService::paged(&[2]));
        let mut c = client(&service, CommentThreads::builder());
        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Table, None, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("│   │ ID   │ AUTHOR │ VIDEO ID │ TEXT DISPLAY │"));
        assert!(out.contains("│ 1 │ t0-0 │ Alice  │ vid      │ comment t0-0 │"));
        assert!(out.contains("│ 2 │ t0-1 │"));
    }

    #[test]
    fn test_list_text_and_silent() {
        let service = Rc::new(MockService::paged(&[1]));
        let mut c = client(&service, CommentThreads::builder());

        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Text, None, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "t0-0  Alice: comment t0-0\n");

        let mut buf = Vec::new();
        c.list(&PARTS, OutputFormat::Silent, None, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_list_propagates_get_error() {
        let service = Rc::new(MockService::failing());
        let mut c = client(&service, CommentThreads::builder());
        let mut buf = Vec::new();
        let err = c.list(&PARTS, OutputFormat::Json, None, &mut buf).unwrap_err();
        assert!(matches!(err, CommentThreadError::Get(_)));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_list_invalid_json_path() {
        let service = Rc::new(MockService::paged(&[1]));
        let mut c = client(&service, CommentThreads::builder());
        let mut buf = Vec::new();
        let err = c
            .list(&PARTS, OutputFormat::Json, Some("$.items["), &mut buf)
            .unwrap_err();
        assert!(matches!(err, CommentThreadError::Output(_)));
    }

    #[test]
    fn test_insert_default_output() {
        let service = Rc::new(MockService::default());
        let c = client(&service, insert_builder());
        let mut buf = Vec::new();
        let inserted = c.insert(OutputFormat::Text, None, &mut buf).unwrap();
        assert_eq!(inserted.id, "UgxNewThread");
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "CommentThread inserted: UgxNewThread\n"
        );

        let sent = service.inserted.borrow();
        assert_eq!(sent.len(), 1);
        let snippet = sent[0].top_level_snippet().unwrap();
        assert_eq!(snippet.text_original, "Nice!");
        assert_eq!(snippet.author_channel_id.as_ref().unwrap().value, "UCauthor");
        assert_eq!(sent[0].snippet.as_ref().unwrap().channel_id, "UCchannel");
    }

    #[test]
    fn test_insert_silent() {
        let service = Rc::new(MockService::default());
        let c = client(&service, insert_builder());
        let mut buf = Vec::new();
        c.insert(OutputFormat::Silent, None, &mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn test_insert_json_and_yaml_contain_id() {
        let service = Rc::new(MockService::default());
        let c = client(&service, insert_builder());

        let mut buf = Vec::new();
        c.insert(OutputFormat::Json, None, &mut buf).unwrap();
        let value: Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["id"], "UgxNewThread");

        let mut buf = Vec::new();
        c.insert(OutputFormat::Yaml, None, &mut buf).unwrap();
        let value: Value = serde_yaml::from_slice(&buf).unwrap();
        assert_eq!(value["id"], "UgxNewThread");
    }

    #[test]
    fn test_insert_missing_field() {
        let service = Rc::new(MockService::default());
        let c = client(&service, insert_builder().with_video_id(""));
        let mut buf = Vec::new();
        let err = c.insert(OutputFormat::Text, None, &mut buf).unwrap_err();
        assert!(matches!(err, CommentThreadError::MissingField("video_id")));
        assert!(service.inserted.borrow().is_empty());
    }

    #[test]
    fn test_insert_failure_wraps_error() {
        let service = Rc::new(MockService::failing());
        let c = client(&service, insert_builder());
        let mut buf = Vec::new();
        let err = c.insert(OutputFormat::Text, None, &mut buf).unwrap_err();
        assert!(matches!(err, CommentThreadError::Insert(ServiceError::Forbidden(_))));
        assert!(err.to_string().contains("failed to insert comment thread"));
        assert!(buf.is_empty());
    }
}
