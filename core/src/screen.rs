//! The personas screen: every piece of state behind the list, its filters
//! and the edit modal.
//!
//! # Design
//! The screen is sans-IO like the rest of the crate. Hosts that own their
//! own event loop use the `begin_*`/`complete_*` pairs and execute the
//! requests in between; hosts happy to block use `fetch_next_page`,
//! `on_scroll` and `commit`, which do the same through a `Transport`.
//!
//! The displayed rows are a list of indices into the full record list and
//! are recomputed after every mutation, so they never drift from the
//! records and the filter state.

use tracing::debug;

use crate::client::{PersonasClient, DEFAULT_BASE_URL};
use crate::edit::{CommitOutcome, EditSession, PendingCommit};
use crate::error::{ApiError, EditError};
use crate::filter::{FilterEngine, FilterKind, FilterMode};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::loader::{EndTrigger, PageLoader, PageOutcome, DEFAULT_PAGE_SIZE};
use crate::types::{Persona, PersonaField};

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub base_url: String,
    pub page_size: u32,
    /// Trailing fraction of rendered rows that triggers the next fetch.
    pub end_threshold: f32,
    pub filter_mode: FilterMode,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            end_threshold: 0.1,
            filter_mode: FilterMode::default(),
        }
    }
}

/// What a fetch completion did to the screen.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// This many records were appended.
    Appended(usize),
    Exhausted,
    Failed(ApiError),
    /// No request was issued: one is in flight or the registry is exhausted.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct PersonasScreen {
    client: PersonasClient,
    loader: PageLoader,
    trigger: EndTrigger,
    filters: FilterEngine,
    editor: EditSession,
    records: Vec<Persona>,
    view: Vec<usize>,
}

impl Default for PersonasScreen {
    fn default() -> Self {
        Self::new(ScreenConfig::default())
    }
}

impl PersonasScreen {
    pub fn new(config: ScreenConfig) -> Self {
        Self {
            client: PersonasClient::new(&config.base_url),
            loader: PageLoader::new(config.page_size),
            trigger: EndTrigger::new(config.end_threshold),
            filters: FilterEngine::new(config.filter_mode),
            editor: EditSession::default(),
            records: Vec::new(),
            view: Vec::new(),
        }
    }

    pub fn client(&self) -> &PersonasClient {
        &self.client
    }

    pub fn loader(&self) -> &PageLoader {
        &self.loader
    }

    pub fn editor(&self) -> &EditSession {
        &self.editor
    }

    /// Every loaded record, in arrival order.
    pub fn records(&self) -> &[Persona] {
        &self.records
    }

    /// The rows on screen after filtering.
    pub fn displayed(&self) -> impl ExactSizeIterator<Item = &Persona> + '_ {
        self.view.iter().map(|&index| &self.records[index])
    }

    pub fn displayed_len(&self) -> usize {
        self.view.len()
    }

    pub fn displayed_row(&self, row: usize) -> Option<&Persona> {
        self.view.get(row).map(|&index| &self.records[index])
    }

    pub fn is_filter_enabled(&self, kind: FilterKind) -> bool {
        self.filters.is_enabled(kind)
    }

    // -- loading ----------------------------------------------------------

    pub fn begin_fetch(&mut self) -> Option<HttpRequest> {
        self.loader.begin(&self.client)
    }

    /// Apply the response (or transport failure) for the request returned by
    /// `begin_fetch`.
    pub fn complete_fetch(&mut self, response: Result<HttpResponse, ApiError>) -> FetchOutcome {
        let parsed = response.and_then(|r| self.client.parse_list_page(r));
        match self.loader.finish(parsed) {
            PageOutcome::Loaded(page) => {
                let count = page.len();
                self.records.extend(page);
                self.refresh_view();
                FetchOutcome::Appended(count)
            }
            PageOutcome::Exhausted => FetchOutcome::Exhausted,
            PageOutcome::Failed(err) => FetchOutcome::Failed(err),
        }
    }

    pub fn fetch_next_page<T: Transport>(&mut self, transport: &mut T) -> FetchOutcome {
        let Some(request) = self.begin_fetch() else {
            return FetchOutcome::Skipped;
        };
        let response = transport.execute(request);
        self.complete_fetch(response)
    }

    /// Initial load.
    pub fn mount<T: Transport>(&mut self, transport: &mut T) -> FetchOutcome {
        self.fetch_next_page(transport)
    }

    /// Whether a scroll that leaves `last_visible` as the last row on screen
    /// should request the next page.
    pub fn wants_more(&self, last_visible: usize) -> bool {
        self.loader.can_fetch() && self.trigger.reached(last_visible, self.view.len())
    }

    pub fn on_scroll<T: Transport>(&mut self, transport: &mut T, last_visible: usize) -> FetchOutcome {
        if !self.wants_more(last_visible) {
            return FetchOutcome::Skipped;
        }
        self.fetch_next_page(transport)
    }

    // -- filters ----------------------------------------------------------

    pub fn toggle_ruc_filter(&mut self) -> bool {
        self.toggle_filter(FilterKind::Ruc)
    }

    pub fn toggle_verified_filter(&mut self) -> bool {
        self.toggle_filter(FilterKind::Verified)
    }

    pub fn toggle_filter(&mut self, kind: FilterKind) -> bool {
        let enabled = self.filters.toggle(kind);
        self.refresh_view();
        debug!(?kind, enabled, shown = self.view.len(), "filter toggled");
        enabled
    }

    // -- editing ----------------------------------------------------------

    /// Open the edit modal on displayed row `row`. Returns false if the row
    /// does not exist.
    pub fn open_row(&mut self, row: usize) -> bool {
        match self.view.get(row) {
            Some(&index) => {
                self.editor.open(&self.records[index]);
                true
            }
            None => false,
        }
    }

    pub fn set_field(&mut self, field: PersonaField, value: impl Into<String>) -> Result<(), EditError> {
        self.editor.set_field(field, value)
    }

    pub fn set_field_by_name(&mut self, name: &str, value: impl Into<String>) -> Result<(), EditError> {
        self.editor.set_field_by_name(name, value)
    }

    pub fn cancel_edit(&mut self) {
        self.editor.cancel();
    }

    pub fn begin_commit(&self) -> Result<PendingCommit, EditError> {
        self.editor.begin_commit(&self.client)
    }

    pub fn complete_commit(
        &mut self,
        pending: PendingCommit,
        response: Result<HttpResponse, ApiError>,
    ) -> CommitOutcome {
        let parsed = response.and_then(|r| self.client.parse_update(r));
        let outcome = self.editor.finish_commit(pending, parsed, &mut self.records);
        if matches!(outcome, CommitOutcome::Replaced(_)) {
            self.refresh_view();
        }
        outcome
    }

    pub fn commit<T: Transport>(&mut self, transport: &mut T) -> CommitOutcome {
        let pending = match self.begin_commit() {
            Ok(pending) => pending,
            Err(err) => return CommitOutcome::Failed(err),
        };
        let response = transport.execute(pending.request.clone());
        self.complete_commit(pending, response)
    }

    fn refresh_view(&mut self) {
        self.view = self.filters.view(&self.records);
    }
}
