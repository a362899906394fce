//! Runs the requests emitted by [`Selection::apply`] and routes results back.
//!
//! The orchestrator owns the current `Selection`. Every change goes through
//! [`Orchestrator::dispatch`] (user intent) or [`Orchestrator::handle_event`]
//! (fetch completion), both of which run the same reducer. Fetches execute as
//! tokio tasks that report over an `mpsc` channel drained by the UI loop, so
//! all state mutation stays on one task.
//!
//! A task whose request is no longer pending is aborted. That is only an
//! optimization: a result that slips through is still rejected by the tag
//! check in the reducer.

use crate::catalog::{CatalogClient, CatalogError, Category, ErrorKind, Video};
use crate::selection::{FetchRequest, FetchTag, Msg, Selection, Transition};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Completion of a fetch task.
#[derive(Debug)]
pub enum FetchEvent {
    SubcategoriesLoaded {
        tag: FetchTag,
        result: Result<Vec<String>, CatalogError>,
    },
    VideosLoaded {
        tag: FetchTag,
        result: Result<Vec<Video>, CatalogError>,
    },
    /// The task panicked before producing a result.
    TaskPanicked {
        request: FetchRequest,
        error: String,
    },
}

/// Wraps a future to catch panics and convert them to errors.
///
/// Keeps a panicking fetch from leaving its stage stuck in the loading state:
/// the panic message comes back as `Err` and is reported like any failure.
async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Owner of the browsing state and its in-flight fetches.
pub struct Orchestrator {
    client: CatalogClient,
    selection: Selection,
    events: mpsc::Sender<FetchEvent>,
    subcategories_task: Option<(FetchTag, JoinHandle<()>)>,
    videos_task: Option<(FetchTag, JoinHandle<()>)>,
}

impl Orchestrator {
    /// Create an orchestrator positioned on `category`. Call [`start`] to
    /// issue the first fetch.
    ///
    /// [`start`]: Orchestrator::start
    pub fn new(
        client: CatalogClient,
        category: &'static Category,
        events: mpsc::Sender<FetchEvent>,
    ) -> Self {
        Self {
            client,
            selection: Selection::new(category),
            events,
            subcategories_task: None,
            videos_task: None,
        }
    }

    /// Select the initial category, spawning its subcategory fetch.
    pub fn start(&mut self) {
        let category = self.selection.category();
        tracing::info!(category = category.slug, "Starting catalog session");
        self.dispatch(Msg::SelectCategory(category));
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Apply a user intent.
    pub fn dispatch(&mut self, msg: Msg) {
        let transition = self.selection.apply(msg);
        self.commit(transition);
    }

    /// Apply a fetch completion. Returns `false` when the result was stale and
    /// dropped.
    pub fn handle_event(&mut self, event: FetchEvent) -> bool {
        let msg = match event {
            FetchEvent::SubcategoriesLoaded { tag, result } => match result {
                Ok(subcategories) => Msg::SubcategoriesResolved { tag, subcategories },
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(
                        category = tag.scope.category,
                        generation = tag.generation,
                        error = %message,
                        "Subcategory fetch failed"
                    );
                    Msg::SubcategoriesFailed {
                        tag,
                        kind: e.kind(),
                        message,
                    }
                }
            },
            FetchEvent::VideosLoaded { tag, result } => match result {
                Ok(videos) => {
                    tracing::debug!(
                        category = tag.scope.category,
                        generation = tag.generation,
                        count = videos.len(),
                        "Videos loaded"
                    );
                    Msg::VideosResolved { tag, videos }
                }
                Err(e) => {
                    let message = e.to_string();
                    tracing::warn!(
                        category = tag.scope.category,
                        subcategory = tag.scope.subcategory.as_deref().unwrap_or_default(),
                        generation = tag.generation,
                        error = %message,
                        "Video fetch failed"
                    );
                    Msg::VideosFailed {
                        tag,
                        kind: e.kind(),
                        message,
                    }
                }
            },
            FetchEvent::TaskPanicked { request, error } => {
                tracing::error!(
                    category = request.tag().scope.category,
                    generation = request.tag().generation,
                    error = %error,
                    "Fetch task panicked"
                );
                let message = format!("fetch task panicked: {}", error);
                match request {
                    FetchRequest::Subcategories(tag) => Msg::SubcategoriesFailed {
                        tag,
                        kind: ErrorKind::Internal,
                        message,
                    },
                    FetchRequest::Videos(tag) => Msg::VideosFailed {
                        tag,
                        kind: ErrorKind::Internal,
                        message,
                    },
                }
            }
        };

        let applies = match &msg {
            Msg::SubcategoriesResolved { tag, .. } | Msg::SubcategoriesFailed { tag, .. } => {
                self.selection.pending_subcategories() == Some(tag)
            }
            Msg::VideosResolved { tag, .. } | Msg::VideosFailed { tag, .. } => {
                self.selection.pending_videos() == Some(tag)
            }
            _ => true,
        };

        self.dispatch(msg);
        applies
    }

    fn commit(&mut self, transition: Transition) {
        self.selection = transition.selection;
        self.reap_superseded();
        if let Some(request) = transition.fetch {
            self.spawn(request);
        }
    }

    /// Abort tasks whose request is no longer the pending one.
    fn reap_superseded(&mut self) {
        if let Some((tag, handle)) = self.subcategories_task.take() {
            if self.selection.pending_subcategories() == Some(&tag) {
                self.subcategories_task = Some((tag, handle));
            } else if !handle.is_finished() {
                handle.abort();
                tracing::debug!(
                    generation = tag.generation,
                    "Aborted superseded subcategory fetch"
                );
            }
        }
        if let Some((tag, handle)) = self.videos_task.take() {
            if self.selection.pending_videos() == Some(&tag) {
                self.videos_task = Some((tag, handle));
            } else if !handle.is_finished() {
                handle.abort();
                tracing::debug!(generation = tag.generation, "Aborted superseded video fetch");
            }
        }
    }

    fn spawn(&mut self, request: FetchRequest) {
        let client = self.client.clone();
        let tx = self.events.clone();

        match request {
            FetchRequest::Subcategories(tag) => {
                let task_tag = tag.clone();
                let handle = tokio::spawn(async move {
                    let category = task_tag.scope.category;
                    let event = match catch_task_panic(client.fetch_subcategories(category)).await {
                        Ok(result) => FetchEvent::SubcategoriesLoaded {
                            tag: task_tag,
                            result,
                        },
                        Err(error) => FetchEvent::TaskPanicked {
                            request: FetchRequest::Subcategories(task_tag),
                            error,
                        },
                    };
                    if let Err(e) = tx.send(event).await {
                        tracing::warn!(error = %e, "Failed to send subcategories (receiver dropped)");
                    }
                });
                if let Some((_, old)) = self.subcategories_task.replace((tag, handle)) {
                    old.abort();
                }
            }
            FetchRequest::Videos(tag) => {
                let task_tag = tag.clone();
                let handle = tokio::spawn(async move {
                    let category = task_tag.scope.category;
                    let subcategory = task_tag.scope.subcategory.clone().unwrap_or_default();
                    let event =
                        match catch_task_panic(client.fetch_videos(category, &subcategory)).await {
                            Ok(result) => FetchEvent::VideosLoaded {
                                tag: task_tag,
                                result,
                            },
                            Err(error) => FetchEvent::TaskPanicked {
                                request: FetchRequest::Videos(task_tag),
                                error,
                            },
                        };
                    if let Err(e) = tx.send(event).await {
                        tracing::warn!(error = %e, "Failed to send videos (receiver dropped)");
                    }
                });
                if let Some((_, old)) = self.videos_task.replace((tag, handle)) {
                    old.abort();
                }
            }
        }
    }
}

/// Abort in-flight fetches so no task outlives the session.
impl Drop for Orchestrator {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.subcategories_task.take() {
            handle.abort();
        }
        if let Some((_, handle)) = self.videos_task.take() {
            handle.abort();
        }
    }
}
