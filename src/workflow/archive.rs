// file: src/workflow/archive.rs
// description: archive listing session: search/filter inputs, debounced fetch, URL query sync
// reference: debounced, generation-fenced refresh over the document API seam

use crate::api::{CancelToken, DocumentApi};
use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, Result};
use crate::models::{Document, Tag};
use crate::routes::{ArchiveQuery, Route};
use crate::view::{ALL_FILTER, FilterChip, ListView, filter_chips};
use crate::workflow::debounce::{DebounceTicket, Debouncer};
use crate::workflow::fence::RequestFence;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveSnapshot {
    pub search: String,
    pub filter: Option<String>,
    pub documents: Vec<Document>,
    pub tags: Vec<Tag>,
    pub loading: bool,
    /// Query state last written back to the URL.
    pub location: ArchiveQuery,
}

struct Shared<A: ?Sized> {
    api: Arc<A>,
    state: Mutex<ArchiveSnapshot>,
    documents_fence: RequestFence,
    tags_fence: RequestFence,
    cancel: CancelToken,
}

impl<A: ?Sized> Shared<A> {
    fn state(&self) -> MutexGuard<'_, ArchiveSnapshot> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Search text and filter drive the list query. Every change schedules one
/// debounced fetch; only the newest response is applied, and a successful
/// fetch rewrites the location to the filter/search it used.
pub struct DocumentArchive<A: DocumentApi + ?Sized + 'static> {
    shared: Arc<Shared<A>>,
    debouncer: Debouncer,
    placeholder_count: usize,
}

impl<A: DocumentApi + ?Sized + 'static> DocumentArchive<A> {
    /// Inputs start from the location's query string. Nothing is fetched until
    /// `refresh` (or an input change) is called.
    pub fn open(api: Arc<A>, location: ArchiveQuery, config: &ArchiveConfig) -> Self {
        let state = ArchiveSnapshot {
            search: location.search().unwrap_or_default().to_string(),
            filter: location.filter().map(str::to_string),
            loading: true,
            location,
            ..ArchiveSnapshot::default()
        };

        Self {
            shared: Arc::new(Shared {
                api,
                state: Mutex::new(state),
                documents_fence: RequestFence::new(),
                tags_fence: RequestFence::new(),
                cancel: CancelToken::new(),
            }),
            debouncer: Debouncer::new(config.debounce()),
            placeholder_count: config.placeholder_count,
        }
    }

    pub fn snapshot(&self) -> ArchiveSnapshot {
        self.shared.state().clone()
    }

    pub fn location(&self) -> Route {
        Route::Archive(self.shared.state().location.clone())
    }

    /// `filter`, or `"all"` when none is set.
    pub fn active_filter(&self) -> String {
        self.shared
            .state()
            .filter
            .clone()
            .unwrap_or_else(|| ALL_FILTER.to_string())
    }

    pub fn view(&self) -> ListView {
        let state = self.shared.state();
        ListView::build(state.loading, &state.documents, self.placeholder_count)
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        let tags = self.shared.state().tags.clone();
        filter_chips(&tags, &self.active_filter())
    }

    pub fn cancel_handle(&self) -> CancelToken {
        self.shared.cancel.clone()
    }

    pub fn set_search(&self, text: &str) -> DebounceTicket {
        self.shared.state().search = text.to_string();
        self.refresh()
    }

    /// Selecting the active chip clears the filter instead of re-applying it.
    pub fn toggle_filter(&self, name: &str) -> DebounceTicket {
        let next = if self.active_filter() == name {
            None
        } else {
            Some(name.to_string())
        };
        debug!("Filter toggled to {:?}", next);
        self.shared.state().filter = next;
        self.refresh()
    }

    /// Replaces both inputs, e.g. when the location is edited directly.
    pub fn navigate(&self, location: ArchiveQuery) -> DebounceTicket {
        {
            let mut state = self.shared.state();
            state.filter = location.filter().map(str::to_string);
            state.search = location.search().unwrap_or_default().to_string();
        }
        self.refresh()
    }

    /// Schedules a fetch with the current inputs after the settle delay,
    /// superseding any fetch still waiting for its delay.
    pub fn refresh(&self) -> DebounceTicket {
        let (filter, search) = {
            let state = self.shared.state();
            (state.filter.clone(), state.search.clone())
        };
        let shared = Arc::clone(&self.shared);
        self.debouncer
            .schedule(move || fetch_documents(shared, filter, search))
    }

    pub async fn load_tags(&self) {
        let generation = self.shared.tags_fence.begin();
        let tags = self.shared.api.list_tags(&self.shared.cancel).await;

        if self.shared.tags_fence.is_current(generation) && !self.shared.cancel.is_cancelled() {
            debug!("Loaded {} tags", tags.len());
            self.shared.state().tags = tags;
        }
    }

    /// Clears a pending fetch and cancels in-flight requests.
    pub fn dispose(self) {}
}

impl<A: DocumentApi + ?Sized + 'static> Drop for DocumentArchive<A> {
    fn drop(&mut self) {
        self.debouncer.cancel();
        self.shared.cancel.cancel();
    }
}

async fn fetch_documents<A: DocumentApi + ?Sized>(
    shared: Arc<Shared<A>>,
    filter: Option<String>,
    search: String,
) -> Result<()> {
    let generation = shared.documents_fence.begin();
    shared.state().loading = true;

    let search_param = Some(search.as_str()).filter(|s| !s.is_empty());
    let documents = shared
        .api
        .list(filter.as_deref(), search_param, &shared.cancel)
        .await;

    if shared.cancel.is_cancelled() {
        return Err(ArchiveError::Cancelled);
    }

    if !shared.documents_fence.is_current(generation) {
        debug!("Discarding stale document list (generation {})", generation);
        return Ok(());
    }

    let location = ArchiveQuery::new(filter.as_deref(), search_param);
    info!(
        "Loaded {} documents for {}",
        documents.len(),
        Route::Archive(location.clone())
    );

    let mut state = shared.state();
    state.documents = documents;
    state.loading = false;
    state.location = location;
    Ok(())
}
