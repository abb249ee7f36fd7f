//! Incremental page loading.
//!
//! The loader owns the cursor and the two flags that gate fetching. It never
//! holds records itself: `finish` hands a non-empty page back to the caller
//! to append.

use tracing::{debug, warn};

use crate::client::PersonasClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::types::Persona;

pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Result of applying one fetch completion.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// A non-empty page arrived; the cursor has advanced.
    Loaded(Vec<Persona>),
    /// An empty page arrived; no further fetches will be issued.
    Exhausted,
    /// The fetch failed; the same page will be requested next time.
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub struct PageLoader {
    page: u32,
    page_size: u32,
    has_more: bool,
    loading: bool,
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PageLoader {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            has_more: true,
            loading: false,
        }
    }

    /// The next page to request (1-based).
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn can_fetch(&self) -> bool {
        !self.loading && self.has_more
    }

    /// Mark a fetch in flight and return the request for the current page,
    /// or `None` while a fetch is already running or the data is exhausted.
    pub fn begin(&mut self, client: &PersonasClient) -> Option<HttpRequest> {
        if !self.can_fetch() {
            debug!(
                page = self.page,
                loading = self.loading,
                has_more = self.has_more,
                "page fetch suppressed"
            );
            return None;
        }
        self.loading = true;
        debug!(page = self.page, page_size = self.page_size, "fetching page");
        Some(client.build_list_page(self.page, self.page_size))
    }

    /// Apply the outcome of the fetch started by `begin`.
    ///
    /// Late completions are applied as they arrive; there is no cancellation.
    pub fn finish(&mut self, result: Result<Vec<Persona>, ApiError>) -> PageOutcome {
        if !self.loading {
            warn!(page = self.page, "page completion arrived with no fetch in flight");
        }
        self.loading = false;
        match result {
            Ok(records) if records.is_empty() => {
                self.has_more = false;
                debug!(page = self.page, "registry exhausted");
                PageOutcome::Exhausted
            }
            Ok(records) => {
                debug!(page = self.page, count = records.len(), "page loaded");
                self.page += 1;
                PageOutcome::Loaded(records)
            }
            Err(err) => {
                warn!(page = self.page, error = %err, "page fetch failed");
                PageOutcome::Failed(err)
            }
        }
    }
}

/// Decides when a scroll position is close enough to the end of the list to
/// request the next page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndTrigger {
    threshold: f32,
}

impl Default for EndTrigger {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl EndTrigger {
    /// `threshold` is the trailing fraction of rendered items, clamped to `0.0..=1.0`.
    pub fn new(threshold: f32) -> Self {
        let threshold = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Whether `last_visible` (index of the last row on screen) has entered
    /// the trailing window of a list of `rendered` rows. An empty list is
    /// always at its end.
    pub fn reached(&self, last_visible: usize, rendered: usize) -> bool {
        if rendered == 0 {
            return true;
        }
        let remaining = rendered.saturating_sub(last_visible.saturating_add(1));
        remaining as f32 <= rendered as f32 * self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: usize) -> Vec<Persona> {
        (0..n)
            .map(|i| Persona {
                code: format!("C{i}"),
                ..Persona::default()
            })
            .collect()
    }

    #[test]
    fn begin_requests_current_page_and_sets_loading() {
        let client = PersonasClient::default();
        let mut loader = PageLoader::default();
        let req = loader.begin(&client).unwrap();
        assert_eq!(req.path, "http://localhost:8080/personas?page=1&pageSize=15");
        assert!(loader.is_loading());
    }

    #[test]
    fn begin_is_a_noop_while_loading() {
        let client = PersonasClient::default();
        let mut loader = PageLoader::default();
        assert!(loader.begin(&client).is_some());
        assert!(loader.begin(&client).is_none());
        assert_eq!(loader.page(), 1);
    }

    #[test]
    fn non_empty_page_advances_cursor() {
        let client = PersonasClient::default();
        let mut loader = PageLoader::default();
        loader.begin(&client);
        let outcome = loader.finish(Ok(page(15)));
        assert!(matches!(outcome, PageOutcome::Loaded(ref r) if r.len() == 15));
        assert_eq!(loader.page(), 2);
        assert!(!loader.is_loading());
        assert!(loader.has_more());
    }

    #[test]
    fn empty_page_exhausts_permanently() {
        let client = PersonasClient::default();
        let mut loader = PageLoader::default();
        loader.begin(&client);
        assert_eq!(loader.finish(Ok(Vec::new())), PageOutcome::Exhausted);
        assert!(!loader.has_more());
        assert_eq!(loader.page(), 1);
        for _ in 0..3 {
            assert!(loader.begin(&client).is_none());
        }
    }

    #[test]
    fn failure_resets_loading_without_advancing() {
        let client = PersonasClient::default();
        let mut loader = PageLoader::default();
        loader.begin(&client);
        let outcome = loader.finish(Err(ApiError::Transport("refused".to_string())));
        assert!(matches!(outcome, PageOutcome::Failed(_)));
        assert!(!loader.is_loading());
        assert_eq!(loader.page(), 1);
        let retry = loader.begin(&client).unwrap();
        assert!(retry.path.contains("page=1&"));
    }

    #[test]
    fn late_completion_is_still_applied() {
        let mut loader = PageLoader::default();
        assert!(!loader.is_loading());
        let outcome = loader.finish(Ok(page(3)));
        assert!(matches!(outcome, PageOutcome::Loaded(ref r) if r.len() == 3));
        assert_eq!(loader.page(), 2);
        assert!(!loader.is_loading());
        assert!(loader.has_more());
    }

    #[test]
    fn zero_page_size_is_raised_to_one() {
        assert_eq!(PageLoader::new(0).page_size(), 1);
    }

    #[test]
    fn trigger_fires_in_trailing_tenth() {
        let trigger = EndTrigger::default();
        assert!(!trigger.reached(0, 30));
        assert!(!trigger.reached(25, 30));
        assert!(trigger.reached(26, 30));
        assert!(trigger.reached(29, 30));
        assert!(trigger.reached(0, 0));
    }

    #[test]
    fn trigger_tolerates_out_of_range_index() {
        assert!(EndTrigger::default().reached(usize::MAX, 5));
    }

    #[test]
    fn trigger_threshold_is_clamped() {
        assert_eq!(EndTrigger::new(5.0).threshold(), 1.0);
        assert_eq!(EndTrigger::new(-1.0).threshold(), 0.0);
        assert_eq!(EndTrigger::new(f32::NAN).threshold(), 0.0);
    }
}
