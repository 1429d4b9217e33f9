//! Process-wide autocomplete corpus.
//!
//! The corpus is built once from a bulk catalog snapshot and replaced
//! wholesale, so readers always see either the previous index or the
//! complete new one.

use std::sync::Arc;

use tokio::sync::watch;

use cadenza_search::CorpusIndex;

use crate::catalog::CatalogSource;

/// Shared, atomically swapped [`CorpusIndex`].
#[derive(Debug, Clone)]
pub struct CorpusCache {
    index: Arc<watch::Sender<Arc<CorpusIndex>>>,
}

impl Default for CorpusCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CorpusCache {
    /// An empty corpus.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(CorpusIndex::new()));
        Self {
            index: Arc::new(tx),
        }
    }

    /// The index as of now.
    pub fn snapshot(&self) -> Arc<CorpusIndex> {
        Arc::clone(&self.index.borrow())
    }

    /// Watch for corpus replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<CorpusIndex>> {
        self.index.subscribe()
    }

    /// Replace the corpus with `index`.
    pub fn publish(&self, index: CorpusIndex) {
        self.index.send_replace(Arc::new(index));
    }

    /// Fetch the bulk snapshot (an empty-query search) and publish it.
    ///
    /// On failure the current corpus is left untouched and a warning is
    /// logged. The returned index is whatever is current afterwards.
    pub async fn load<C>(&self, catalog: &C) -> Arc<CorpusIndex>
    where
        C: CatalogSource + ?Sized,
    {
        match catalog.search("").await {
            Ok(performances) => {
                let index = CorpusIndex::from_performances(&performances);
                log::info!(
                    "Loaded corpus: {} labels from {} performances",
                    index.len(),
                    performances.len()
                );
                self.publish(index);
            }
            Err(e) => log::warn!("Failed to load autocomplete corpus: {}", e),
        }
        self.snapshot()
    }
}
