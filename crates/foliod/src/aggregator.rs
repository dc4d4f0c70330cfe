use std::sync::Arc;

use foliocore_index::{CatalogSource, ListRequest, SearchIndex};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Owns the [`SearchIndex`] and its one-shot catalog load.
///
/// Mounting publishes the static pages and the fallback gallery right away and
/// dispatches a single request for the first catalog page. Consumers observe the
/// index through [`SearchIndexAggregator::subscribe`]. After
/// [`SearchIndexAggregator::teardown`] (or drop) no further writes happen.
pub struct SearchIndexAggregator {
    state: Arc<watch::Sender<SearchIndex>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl SearchIndexAggregator {
    /// Mounts on the current tokio runtime.
    pub fn mount<S>(source: Arc<S>, page_size: u32) -> Self
    where
        S: CatalogSource + 'static,
    {
        Self::mount_on(&Handle::current(), source, page_size)
    }

    pub fn mount_on<S>(runtime: &Handle, source: Arc<S>, page_size: u32) -> Self
    where
        S: CatalogSource + 'static,
    {
        let mut index = SearchIndex::bootstrap();
        index.set_loading(true);

        let (tx, _rx) = watch::channel(index);
        let state = Arc::new(tx);
        let cancel = CancellationToken::new();

        let task = runtime.spawn(load_catalog(
            source,
            ListRequest::first_page(page_size),
            Arc::clone(&state),
            cancel.clone(),
        ));

        Self {
            state,
            cancel,
            task: Some(task),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchIndex> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SearchIndex {
        self.state.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stops the pending load. Returns once any in-flight write has finished, so
    /// nothing is published after this call.
    pub fn teardown(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }

        self.cancel.cancel();
        // Waits for a concurrent `send_if_modified` to release the value.
        drop(self.state.borrow());

        if let Some(task) = self.task.take() {
            task.abort();
        }
        debug!("search index aggregator torn down");
    }
}

impl Drop for SearchIndexAggregator {
    fn drop(&mut self) {
        self.teardown();
    }
}

async fn load_catalog<S>(
    source: Arc<S>,
    request: ListRequest,
    state: Arc<watch::Sender<SearchIndex>>,
    cancel: CancellationToken,
) where
    S: CatalogSource,
{
    debug!(page = request.page, page_size = request.page_size, "catalog load dispatched");

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            debug!("catalog load cancelled before it resolved");
            return;
        }
        outcome = source.list_products(request) => outcome,
    };

    let entries = match outcome {
        Ok(response) => Some(response.into_entries()),
        Err(err) => {
            warn!(error = %err, "catalog load failed, keeping current snapshot");
            None
        }
    };

    state.send_if_modified(move |index| {
        if cancel.is_cancelled() {
            debug!("late catalog result discarded after teardown");
            return false;
        }

        index.set_loading(false);
        if let Some(entries) = entries {
            let count = entries.len();
            if index.replace_catalog(entries) {
                info!(count, "catalog snapshot replaced");
            } else {
                info!("catalog load returned no entries, keeping current snapshot");
            }
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use foliocore_index::{
        gallery_fallback, menu, CatalogResponse, IndexError, ProductRecord,
    };
    use tokio::sync::oneshot;

    use super::*;

    type Reply = Result<CatalogResponse, IndexError>;

    /// Resolves only when the test sends a reply.
    struct GatedSource {
        reply: Mutex<Option<oneshot::Receiver<Reply>>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<ListRequest>>,
    }

    impl GatedSource {
        fn new() -> (Arc<Self>, oneshot::Sender<Reply>) {
            let (tx, rx) = oneshot::channel();
            let source = Arc::new(Self {
                reply: Mutex::new(Some(rx)),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            });
            (source, tx)
        }
    }

    impl CatalogSource for GatedSource {
        fn list_products(&self, request: ListRequest) -> impl Future<Output = Reply> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request);
            let reply = self.reply.lock().unwrap().take();
            async move {
                match reply {
                    Some(rx) => rx
                        .await
                        .unwrap_or_else(|_| Err(IndexError::Transport("gate dropped".into()))),
                    None => Err(IndexError::Transport("requested twice".into())),
                }
            }
        }
    }

    /// Simulates teardown landing between the response and the state write.
    struct TeardownRacingSource {
        cancel: CancellationToken,
    }

    impl CatalogSource for TeardownRacingSource {
        fn list_products(&self, _request: ListRequest) -> impl Future<Output = Reply> + Send {
            let cancel = self.cancel.clone();
            async move {
                cancel.cancel();
                Ok(CatalogResponse::Bare(vec![record("late", "Too Late")]))
            }
        }
    }

    fn record(id: &str, title: &str) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            title: title.to_string(),
            tags: None,
            image: None,
            main_image: None,
            images: None,
            price: None,
        }
    }

    async fn settled(rx: &mut watch::Receiver<SearchIndex>) -> SearchIndex {
        rx.wait_for(|index| !index.is_loading()).await.unwrap().clone()
    }

    #[tokio::test]
    async fn mount_publishes_static_data_and_loading_flag() {
        let (source, _reply) = GatedSource::new();
        let aggregator = SearchIndexAggregator::mount(Arc::clone(&source), 50);

        let index = aggregator.snapshot();
        assert_eq!(index.pages(), menu().as_slice());
        assert_eq!(index.catalog(), gallery_fallback().as_slice());
        assert!(index.is_loading());
    }

    #[tokio::test]
    async fn success_replaces_catalog_once() {
        let (source, reply) = GatedSource::new();
        let aggregator = SearchIndexAggregator::mount(Arc::clone(&source), 50);
        let mut rx = aggregator.subscribe();

        reply
            .send(Ok(CatalogResponse::Envelope {
                items: vec![record("p1", "Monochrome Mountains"), record("p2", "Salt")],
            }))
            .unwrap();

        let index = settled(&mut rx).await;
        let ids: Vec<_> = index.catalog().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);
        assert_eq!(index.pages(), menu().as_slice());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            source.requests.lock().unwrap().as_slice(),
            &[ListRequest { page: 1, page_size: 50 }]
        );
    }

    #[tokio::test]
    async fn failure_keeps_fallback() {
        let (source, reply) = GatedSource::new();
        let aggregator = SearchIndexAggregator::mount(source, 50);
        let mut rx = aggregator.subscribe();

        reply.send(Err(IndexError::Status { status: 503 })).unwrap();

        let index = settled(&mut rx).await;
        assert_eq!(index.catalog(), gallery_fallback().as_slice());
    }

    #[tokio::test]
    async fn empty_response_keeps_fallback() {
        let (source, reply) = GatedSource::new();
        let aggregator = SearchIndexAggregator::mount(source, 50);
        let mut rx = aggregator.subscribe();

        reply.send(Ok(CatalogResponse::Bare(Vec::new()))).unwrap();

        let index = settled(&mut rx).await;
        assert_eq!(index.catalog(), gallery_fallback().as_slice());
    }

    #[tokio::test]
    async fn late_result_after_teardown_is_ignored() {
        let (source, reply) = GatedSource::new();
        let mut aggregator = SearchIndexAggregator::mount(source, 50);
        let rx = aggregator.subscribe();
        let before = aggregator.snapshot();

        aggregator.teardown();
        assert!(!aggregator.is_mounted());

        let _ = reply.send(Ok(CatalogResponse::Bare(vec![record("p1", "Late")])));
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }

        assert_eq!(*rx.borrow(), before);
        assert_eq!(aggregator.snapshot(), before);
    }

    #[tokio::test]
    async fn write_is_skipped_when_teardown_races_the_response() {
        let mut index = SearchIndex::bootstrap();
        index.set_loading(true);
        let (tx, rx) = watch::channel(index.clone());
        let cancel = CancellationToken::new();
        let source = Arc::new(TeardownRacingSource {
            cancel: cancel.clone(),
        });

        load_catalog(source, ListRequest::first_page(50), Arc::new(tx), cancel).await;

        assert_eq!(*rx.borrow(), index);
    }
}
