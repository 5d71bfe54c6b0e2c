//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::FutureExt;
use insight::{FieldTag, StringListSource, SuggestionFetchError, SuggestionSource};
use insight::suggest::FetchFuture;
use insight_net::NetworkError;
use parking_lot::Mutex;
use tokio::sync::oneshot;

pub type Reply = Result<Vec<String>, SuggestionFetchError>;

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Default)]
struct Exchange {
    reply_tx: Option<oneshot::Sender<Reply>>,
    reply_rx: Option<oneshot::Receiver<Reply>>,
}

/// A source whose answers are released by the test, in any order.
///
/// Each `(tag, query)` gets one reply channel, created by whichever side
/// arrives first: the lookup asking or the test answering.
#[derive(Default)]
pub struct ScriptedSource {
    exchanges: Mutex<HashMap<(FieldTag, String), Exchange>>,
    calls: Mutex<Vec<(FieldTag, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Release the answer for `query` on `tag`.
    pub fn respond(&self, tag: FieldTag, query: &str, reply: Reply) {
        let tx = self.take(tag, query, |exchange| exchange.reply_tx.take());
        if let Some(tx) = tx {
            let _ = tx.send(reply);
        }
    }

    /// Queries received so far, in order.
    pub fn calls(&self) -> Vec<(FieldTag, String)> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn take<T>(
        &self,
        tag: FieldTag,
        query: &str,
        pick: impl FnOnce(&mut Exchange) -> Option<T>,
    ) -> Option<T> {
        let mut exchanges = self.exchanges.lock();
        let key = (tag, query.to_string());
        let exchange = exchanges.entry(key.clone()).or_insert_with(|| {
            let (tx, rx) = oneshot::channel();
            Exchange {
                reply_tx: Some(tx),
                reply_rx: Some(rx),
            }
        });
        let taken = pick(exchange);
        if exchange.reply_tx.is_none() && exchange.reply_rx.is_none() {
            exchanges.remove(&key);
        }
        taken
    }
}

impl SuggestionSource for ScriptedSource {
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture {
        self.calls.lock().push((tag, query.to_string()));
        let rx = self.take(tag, query, |exchange| exchange.reply_rx.take());
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_else(|_| {
                    Err(SuggestionFetchError::Transport(NetworkError::Connection(
                        "script dropped".to_string(),
                    )))
                }),
                None => Err(SuggestionFetchError::Transport(NetworkError::Request(
                    "query already answered".to_string(),
                ))),
            }
        }
        .boxed()
    }
}

/// A [`StringListSource`] that counts how often it is asked.
pub struct CountingSource {
    inner: StringListSource,
    calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(inner: StringListSource) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SuggestionSource for CountingSource {
    fn fetch_suggestions(&self, query: &str, tag: FieldTag) -> FetchFuture {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_suggestions(query, tag)
    }
}

/// The lists the dashboard's fields draw from.
pub fn dashboard_lists() -> StringListSource {
    StringListSource::new()
        .with_items(FieldTag::Year, ["2019", "2020", "2021", "2022", "2023"])
        .with_items(FieldTag::Sector, ["Banking", "Bakery", "Biotech", "Education"])
        .with_items(FieldTag::Location, ["Karnataka", "Kerala", "Maharashtra"])
}
