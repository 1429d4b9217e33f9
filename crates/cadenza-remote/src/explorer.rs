//! Search orchestration: query, suggestions, and published results.
//!
//! [`Explorer`] is the one stateful object a front end needs. It owns the
//! catalog and track-order sources, the autocomplete corpus, and the
//! suggestion ticker, and publishes every search outcome as a
//! [`SearchState`] on a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use cadenza_core::{Performance, SuggestionOption, TrackOrderSource};
use cadenza_search::{
    empty_result_hint, smart_sort, suggest, CorpusIndex, EmptyResultHint, SortStrategy,
};

use crate::catalog::CatalogSource;
use crate::corpus::CorpusCache;
use crate::ticker::SuggestionTicker;

/// How long each suggestion stays on display.
pub const SUGGESTION_INTERVAL: Duration = Duration::from_secs(2);

/// The published outcome of the most recent search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub loading: bool,
    pub results: Vec<Performance>,
    pub total: usize,
    pub error: Option<String>,
    /// The error is transient; the same search may succeed later.
    pub retryable: bool,
    pub strategy: Option<SortStrategy>,
    /// The trimmed query the state belongs to.
    pub query: Option<String>,
}

impl SearchState {
    /// True once a search finished with nothing to show and no error.
    pub fn is_empty_result(&self) -> bool {
        !self.loading
            && self.error.is_none()
            && self.query.is_some()
            && self.results.is_empty()
    }
}

/// Search front end over a catalog and an optional track-order provider.
#[derive(Debug)]
pub struct Explorer<C, R> {
    catalog: C,
    resolver: R,
    corpus: CorpusCache,
    ticker: SuggestionTicker,
    query: String,
    suggestions: Vec<SuggestionOption>,
    state: watch::Sender<SearchState>,
}

impl<C, R> Explorer<C, R>
where
    C: CatalogSource,
    R: TrackOrderSource,
{
    pub fn new(catalog: C, resolver: R) -> Self {
        let (state, _rx) = watch::channel(SearchState::default());
        Self {
            catalog,
            resolver,
            corpus: CorpusCache::new(),
            ticker: SuggestionTicker::new(SUGGESTION_INTERVAL),
            query: String::new(),
            suggestions: Vec::new(),
            state,
        }
    }

    #[must_use]
    pub fn with_suggestion_interval(mut self, period: Duration) -> Self {
        self.ticker = SuggestionTicker::new(period);
        self
    }

    /// Share an existing corpus instead of the explorer's own.
    #[must_use]
    pub fn with_corpus(mut self, corpus: CorpusCache) -> Self {
        self.corpus = corpus;
        self
    }

    pub fn corpus(&self) -> &CorpusCache {
        &self.corpus
    }

    /// Load the autocomplete corpus. Failure leaves it as it was.
    pub async fn preload(&self) -> Arc<CorpusIndex> {
        self.corpus.load(&self.catalog).await
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Replace the query and recompute suggestions from the current corpus.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.suggestions = suggest(&self.query, &self.corpus.snapshot());
        if self.suggestions.is_empty() {
            self.ticker.stop();
        } else {
            self.ticker.restart(self.suggestions.clone());
        }
    }

    pub fn suggestions(&self) -> &[SuggestionOption] {
        &self.suggestions
    }

    /// The suggestion on display right now.
    pub fn current_suggestion(&self) -> Option<SuggestionOption> {
        self.ticker.current()
    }

    pub fn subscribe_suggestion(&self) -> watch::Receiver<Option<SuggestionOption>> {
        self.ticker.subscribe()
    }

    /// Take the displayed suggestion as the new query.
    ///
    /// Returns the accepted value, or `None` if nothing was on display.
    pub fn accept_suggestion(&mut self) -> Option<String> {
        let accepted = self.ticker.current()?;
        self.query.clone_from(&accepted.value);
        self.dismiss_suggestions();
        Some(accepted.value)
    }

    /// Dismiss suggestions and search for the current query.
    pub async fn submit(&mut self) {
        self.dismiss_suggestions();
        let query = self.query.clone();
        self.execute(&query).await;
    }

    /// Search the catalog for `query` and publish the ranked outcome.
    ///
    /// Blank queries are ignored. A catalog error is published as a
    /// message with an empty result list.
    pub async fn execute(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
            state.retryable = false;
            state.query = Some(query.to_string());
        });

        let outcome = match self.catalog.search(query).await {
            Ok(raw) => {
                let sorted = smart_sort(raw, query, &self.resolver).await;
                log::debug!(
                    "Search {:?}: {} results by {}",
                    query,
                    sorted.performances.len(),
                    sorted.strategy
                );
                SearchState {
                    loading: false,
                    total: sorted.performances.len(),
                    results: sorted.performances,
                    error: None,
                    retryable: false,
                    strategy: Some(sorted.strategy),
                    query: Some(query.to_string()),
                }
            }
            Err(e) => {
                let retryable = e.is_transient();
                if retryable {
                    log::warn!("Search {:?} failed: {}", query, e);
                } else {
                    log::error!("Search {:?} failed: {}", query, e);
                }
                SearchState {
                    loading: false,
                    results: Vec::new(),
                    total: 0,
                    error: Some(e.to_string()),
                    retryable,
                    strategy: None,
                    query: Some(query.to_string()),
                }
            }
        };

        self.state.send_replace(outcome);
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// A hint for the last search, if it completed with no results.
    pub fn empty_result_hint(&self) -> Option<EmptyResultHint> {
        let state = self.state.borrow();
        if !state.is_empty_result() {
            return None;
        }
        let query = state.query.as_deref()?;
        Some(empty_result_hint(query, &self.corpus.snapshot()))
    }

    fn dismiss_suggestions(&mut self) {
        self.suggestions.clear();
        self.ticker.stop();
    }
}
