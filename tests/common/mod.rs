//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};

use blog_feed::blog::BlogViewState;
use blog_feed::config::ControllerConfig;
use blog_feed::controller::{BlogController, QueryUpdate};
use blog_feed::model::BlogPost;
use blog_feed::preferences::MemoryPreferences;
use blog_feed::query::{QueryEnvelope, QueryRequest, QuerySource, QueryStream};
use blog_feed::session::{AuthToken, SessionManager};

pub const PAGE_SIZE: usize = 10;

/// How long a test waits for a controller update before giving up.
pub const UPDATE_TIMEOUT: Duration = Duration::from_secs(2);

// -- Fixtures -----------------------------------------------------------------

pub fn post(pk: u32) -> BlogPost {
    BlogPost {
        pk,
        title: format!("Post {pk}"),
        slug: format!("post-{pk}"),
        body: format!("Body {pk}"),
        image: String::new(),
        date_updated: 1_700_000_000_000 + i64::from(pk),
        username: "mitch".to_string(),
    }
}

pub fn posts(range: std::ops::RangeInclusive<u32>) -> Vec<BlogPost> {
    range.map(post).collect()
}

pub fn batch(range: std::ops::RangeInclusive<u32>, has_more: bool) -> Vec<QueryEnvelope> {
    vec![QueryEnvelope::Batch {
        posts: posts(range),
        has_more,
    }]
}

// -- Query source mock --------------------------------------------------------

struct Scripted {
    envelopes: Vec<QueryEnvelope>,
    /// Keep the stream open after the envelopes instead of ending it.
    open: bool,
}

/// Query source that records requests and answers from a script.
///
/// Each `search` pops the next scripted response and replays it at once. When
/// the script is empty the stream stays pending until `respond` is called for
/// that request.
#[derive(Default)]
pub struct ScriptedSource {
    requests: Mutex<Vec<QueryRequest>>,
    script: Mutex<VecDeque<Scripted>>,
    gates: Mutex<Vec<Option<oneshot::Sender<Vec<QueryEnvelope>>>>>,
    cancels: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn enqueue(&self, envelopes: Vec<QueryEnvelope>) {
        self.script.lock().push_back(Scripted {
            envelopes,
            open: false,
        });
    }

    /// Like `enqueue`, but the stream never ends after the envelopes.
    pub fn enqueue_open(&self, envelopes: Vec<QueryEnvelope>) {
        self.script.lock().push_back(Scripted {
            envelopes,
            open: true,
        });
    }

    /// Release the pending request with index `index`. Returns false if its
    /// stream has already been dropped.
    pub fn respond(&self, index: usize, envelopes: Vec<QueryEnvelope>) -> bool {
        let sender = self
            .gates
            .lock()
            .get_mut(index)
            .and_then(|gate| gate.take());
        match sender {
            Some(sender) => sender.send(envelopes).is_ok(),
            None => false,
        }
    }

    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn cancel_count(&self) -> usize {
        self.cancels.load(Ordering::SeqCst)
    }
}

impl QuerySource for ScriptedSource {
    fn search(&self, request: QueryRequest) -> QueryStream {
        self.requests.lock().push(request);

        let scripted = self.script.lock().pop_front();
        if let Some(Scripted { envelopes, open }) = scripted {
            self.gates.lock().push(None);
            let replay = stream::iter(envelopes);
            return if open {
                replay.chain(stream::pending()).boxed()
            } else {
                replay.boxed()
            };
        }

        let (tx, rx) = oneshot::channel();
        self.gates.lock().push(Some(tx));
        stream::once(async move { rx.await.unwrap_or_default() })
            .flat_map(|envelopes| stream::iter(envelopes))
            .boxed()
    }

    fn cancel_requests(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

// -- Controller helpers -------------------------------------------------------

pub struct Harness {
    pub controller: BlogController,
    pub source: Arc<ScriptedSource>,
    pub session: Arc<SessionManager>,
    pub preferences: Arc<MemoryPreferences>,
}

pub fn harness() -> Harness {
    let source = ScriptedSource::new();
    let session = Arc::new(SessionManager::with_token(AuthToken::new(Some(1), "token")));
    let preferences = Arc::new(MemoryPreferences::new());
    let controller = BlogController::new(
        source.clone(),
        session.clone(),
        preferences.clone(),
        ControllerConfig {
            page_size: PAGE_SIZE,
        },
    );
    Harness {
        controller,
        source,
        session,
        preferences,
    }
}

/// Next accepted update, or panic after `UPDATE_TIMEOUT`.
pub async fn next_update(controller: &mut BlogController) -> QueryUpdate {
    tokio::time::timeout(UPDATE_TIMEOUT, controller.next_update())
        .await
        .expect("timed out waiting for a controller update")
        .expect("controller inbox closed")
}

/// Run until the outstanding query finished, or panic after `UPDATE_TIMEOUT`.
pub async fn settle(controller: &mut BlogController) {
    tokio::time::timeout(UPDATE_TIMEOUT, controller.run_until_idle())
        .await
        .expect("timed out waiting for the controller to settle");
}

pub fn drain<T>(rx: &mut mpsc::UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Ok(item) = rx.try_recv() {
        items.push(item);
    }
    items
}

/// Fields of `after` that differ from `before`.
pub fn changed_fields(before: &BlogViewState, after: &BlogViewState) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if before.blog_list != after.blog_list {
        changed.push("blog_list");
    }
    if before.search_query != after.search_query {
        changed.push("search_query");
    }
    if before.order != after.order {
        changed.push("order");
    }
    if before.filter != after.filter {
        changed.push("filter");
    }
    if before.page != after.page {
        changed.push("page");
    }
    if before.is_query_in_progress != after.is_query_in_progress {
        changed.push("is_query_in_progress");
    }
    if before.is_query_exhausted != after.is_query_exhausted {
        changed.push("is_query_exhausted");
    }
    changed
}
