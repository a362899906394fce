//! Browsing state as a single immutable value with a pure transition function.
//!
//! [`Selection::apply`] takes a [`Msg`] and returns the next `Selection`
//! together with at most one [`FetchRequest`] the caller must run. Nothing in
//! this module performs I/O; the orchestrator executes requests and feeds the
//! outcome back in as `*Resolved` / `*Failed` messages.
//!
//! # Stale responses
//!
//! Every request carries a [`FetchTag`]: the scope it was issued for plus a
//! generation number that increases with every request. A result is applied
//! only when its tag equals the tag currently pending for that stage, so the
//! last request issued always wins, even after navigating A -> B -> A.
//!
//! # Invariants (hold after every transition)
//!
//! - `subcategory` is `None` or an element of `subcategories`
//! - `videos` is non-empty only when `subcategory` is set
//! - `selected_video` is `None` or an element of `videos`
//! - changing category clears subcategories, subcategory, videos, and the
//!   selected video before any fetch is issued

use crate::catalog::{default_category, Category, ErrorKind, Language, Video};
use std::sync::Arc;

// ============================================================================
// Fetch tagging
// ============================================================================

/// What a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    /// Category slug as the catalog service knows it. For a language this is
    /// the language's own category, never the hub.
    pub category: &'static str,
    /// `None` for subcategory requests.
    pub subcategory: Option<String>,
}

/// Identity of one issued request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub scope: Scope,
    pub generation: u64,
}

/// A request the caller must execute on behalf of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Subcategories(FetchTag),
    Videos(FetchTag),
}

impl FetchRequest {
    pub fn tag(&self) -> &FetchTag {
        match self {
            FetchRequest::Subcategories(tag) | FetchRequest::Videos(tag) => tag,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            FetchRequest::Subcategories(_) => Stage::Subcategories,
            FetchRequest::Videos(_) => Stage::Videos,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Which of the two dependent fetches failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Subcategories,
    Videos,
}

/// A failed fetch, stored in the selection for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionError {
    pub stage: Stage,
    pub kind: ErrorKind,
    pub message: String,
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let what = match self.stage {
            Stage::Subcategories => "subcategories",
            Stage::Videos => "videos",
        };
        write!(
            f,
            "Could not load {} ({}): {}",
            what,
            self.kind.label(),
            self.message
        )
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Every way the selection can change.
#[derive(Debug, Clone)]
pub enum Msg {
    SelectCategory(&'static Category),
    /// Only meaningful while the language hub is the active category.
    SelectLanguage(&'static Language),
    SubcategoriesResolved {
        tag: FetchTag,
        subcategories: Vec<String>,
    },
    SubcategoriesFailed {
        tag: FetchTag,
        kind: ErrorKind,
        message: String,
    },
    SelectSubcategory(String),
    VideosResolved {
        tag: FetchTag,
        videos: Vec<Video>,
    },
    VideosFailed {
        tag: FetchTag,
        kind: ErrorKind,
        message: String,
    },
    SelectVideo(Video),
    ClearVideo,
    /// Re-run the fetch for the current scope after an error or empty result.
    Reload,
}

/// Result of [`Selection::apply`].
#[derive(Debug, Clone)]
pub struct Transition {
    pub selection: Selection,
    pub fetch: Option<FetchRequest>,
}

impl Transition {
    fn unchanged(selection: &Selection) -> Self {
        Self {
            selection: selection.clone(),
            fetch: None,
        }
    }
}

/// Rendered state of a list region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    /// Nothing requested yet (no active subcategory).
    Idle,
    Loading,
    Failed,
    /// The fetch succeeded with zero items.
    Empty,
    Populated,
}

// ============================================================================
// Selection
// ============================================================================

/// The user's current browsing position and everything loaded for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    category: &'static Category,
    language: Option<&'static Language>,
    subcategories: Arc<Vec<String>>,
    subcategory: Option<String>,
    videos: Arc<Vec<Video>>,
    selected_video: Option<Video>,
    pending_subcategories: Option<FetchTag>,
    pending_videos: Option<FetchTag>,
    error: Option<SelectionError>,
    next_generation: u64,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(default_category())
    }
}

impl Selection {
    /// A blank selection positioned on `category`. Nothing is requested until
    /// a `SelectCategory` is applied; see [`Selection::start`].
    pub fn new(category: &'static Category) -> Self {
        Self {
            category,
            language: None,
            subcategories: Arc::new(Vec::new()),
            subcategory: None,
            videos: Arc::new(Vec::new()),
            selected_video: None,
            pending_subcategories: None,
            pending_videos: None,
            error: None,
            next_generation: 0,
        }
    }

    /// Session start: select `category` and return the first request.
    pub fn start(category: &'static Category) -> Transition {
        Self::new(category).apply(Msg::SelectCategory(category))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn category(&self) -> &'static Category {
        self.category
    }

    pub fn language(&self) -> Option<&'static Language> {
        self.language
    }

    pub fn is_language_hub(&self) -> bool {
        self.category.is_language_hub()
    }

    /// Category slug the catalog service is queried with, if any.
    pub fn effective_category(&self) -> Option<&'static str> {
        if self.is_language_hub() {
            self.language.map(|l| l.category)
        } else {
            Some(self.category.slug)
        }
    }

    pub fn subcategories(&self) -> &[String] {
        &self.subcategories
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn selected_video(&self) -> Option<&Video> {
        self.selected_video.as_ref()
    }

    pub fn error(&self) -> Option<&SelectionError> {
        self.error.as_ref()
    }

    pub fn pending_subcategories(&self) -> Option<&FetchTag> {
        self.pending_subcategories.as_ref()
    }

    pub fn pending_videos(&self) -> Option<&FetchTag> {
        self.pending_videos.as_ref()
    }

    pub fn subcategories_loading(&self) -> bool {
        self.pending_subcategories.is_some()
    }

    pub fn videos_loading(&self) -> bool {
        self.pending_videos.is_some()
    }

    fn error_in(&self, stage: Stage) -> bool {
        self.error.as_ref().is_some_and(|e| e.stage == stage)
    }

    /// State of the subcategory chip row. The hub always shows languages.
    pub fn subcategories_status(&self) -> ListStatus {
        if self.is_language_hub() {
            ListStatus::Populated
        } else if self.subcategories_loading() {
            ListStatus::Loading
        } else if self.error_in(Stage::Subcategories) {
            ListStatus::Failed
        } else if self.subcategories.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Populated
        }
    }

    /// State of the video list.
    pub fn videos_status(&self) -> ListStatus {
        if self.videos_loading() || self.subcategories_loading() {
            ListStatus::Loading
        } else if self.error.is_some() {
            ListStatus::Failed
        } else if self.subcategory.is_none() {
            ListStatus::Idle
        } else if self.videos.is_empty() {
            ListStatus::Empty
        } else {
            ListStatus::Populated
        }
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Compute the next selection for `msg`.
    pub fn apply(&self, msg: Msg) -> Transition {
        match msg {
            Msg::SelectCategory(category) => self.select_category(category),
            Msg::SelectLanguage(language) => self.select_language(language, false),
            Msg::SubcategoriesResolved { tag, subcategories } => {
                self.subcategories_resolved(tag, subcategories)
            }
            Msg::SubcategoriesFailed { tag, kind, message } => {
                self.subcategories_failed(tag, kind, message)
            }
            Msg::SelectSubcategory(label) => self.select_subcategory(label, false),
            Msg::VideosResolved { tag, videos } => self.videos_resolved(tag, videos),
            Msg::VideosFailed { tag, kind, message } => self.videos_failed(tag, kind, message),
            Msg::SelectVideo(video) => self.select_video(video),
            Msg::ClearVideo => self.clear_video(),
            Msg::Reload => self.reload(),
        }
    }

    fn issue(&mut self, category: &'static str, subcategory: Option<String>) -> FetchTag {
        let generation = self.next_generation;
        self.next_generation = self.next_generation.wrapping_add(1);
        FetchTag {
            scope: Scope {
                category,
                subcategory,
            },
            generation,
        }
    }

    /// Replace the category. All dependent state is cleared in the same step.
    fn select_category(&self, category: &'static Category) -> Transition {
        let mut next = Selection {
            next_generation: self.next_generation,
            ..Selection::new(category)
        };

        if category.is_language_hub() {
            tracing::debug!(category = category.slug, "Showing language hub");
            return Transition {
                selection: next,
                fetch: None,
            };
        }

        let tag = next.issue(category.slug, None);
        tracing::debug!(
            category = category.slug,
            generation = tag.generation,
            "Requesting subcategories"
        );
        next.pending_subcategories = Some(tag.clone());
        Transition {
            selection: next,
            fetch: Some(FetchRequest::Subcategories(tag)),
        }
    }

    /// A language behaves like a category with one implicit subcategory.
    fn select_language(&self, language: &'static Language, force: bool) -> Transition {
        if !self.is_language_hub() {
            tracing::debug!(
                language = language.slug,
                category = self.category.slug,
                "Ignoring language outside the language hub"
            );
            return Transition::unchanged(self);
        }
        if !force && self.language == Some(language) && self.error.is_none() {
            return Transition::unchanged(self);
        }

        let label = language.subcategory();
        let mut next = self.clone();
        next.language = Some(language);
        next.subcategories = Arc::new(vec![label.clone()]);
        next.subcategory = Some(label.clone());
        next.videos = Arc::new(Vec::new());
        next.selected_video = None;
        next.error = None;
        next.pending_subcategories = None;

        let tag = next.issue(language.category, Some(label));
        tracing::debug!(
            language = language.slug,
            generation = tag.generation,
            "Requesting language videos"
        );
        next.pending_videos = Some(tag.clone());
        Transition {
            selection: next,
            fetch: Some(FetchRequest::Videos(tag)),
        }
    }

    fn subcategories_resolved(&self, tag: FetchTag, subcategories: Vec<String>) -> Transition {
        if self.pending_subcategories.as_ref() != Some(&tag) {
            tracing::debug!(
                category = tag.scope.category,
                generation = tag.generation,
                "Discarding stale subcategories"
            );
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.pending_subcategories = None;
        next.error = None;
        next.subcategory = subcategories.first().cloned();
        next.subcategories = Arc::new(subcategories);

        let Some(first) = next.subcategory.clone() else {
            tracing::debug!(category = tag.scope.category, "Category has no subcategories");
            return Transition {
                selection: next,
                fetch: None,
            };
        };

        let videos_tag = next.issue(tag.scope.category, Some(first));
        next.pending_videos = Some(videos_tag.clone());
        Transition {
            selection: next,
            fetch: Some(FetchRequest::Videos(videos_tag)),
        }
    }

    fn subcategories_failed(&self, tag: FetchTag, kind: ErrorKind, message: String) -> Transition {
        if self.pending_subcategories.as_ref() != Some(&tag) {
            tracing::debug!(
                category = tag.scope.category,
                generation = tag.generation,
                "Discarding stale subcategories failure"
            );
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.pending_subcategories = None;
        next.subcategories = Arc::new(Vec::new());
        next.subcategory = None;
        next.error = Some(SelectionError {
            stage: Stage::Subcategories,
            kind,
            message,
        });
        Transition {
            selection: next,
            fetch: None,
        }
    }

    /// Switch shelf within the current category.
    ///
    /// Re-selecting the active subcategory is a no-op unless the last fetch
    /// failed, in which case it retries.
    fn select_subcategory(&self, label: String, force: bool) -> Transition {
        if !self.subcategories.contains(&label) {
            tracing::debug!(subcategory = %label, "Ignoring unknown subcategory");
            return Transition::unchanged(self);
        }
        if !force && self.subcategory.as_deref() == Some(label.as_str()) && self.error.is_none() {
            return Transition::unchanged(self);
        }
        let Some(category) = self.effective_category() else {
            return Transition::unchanged(self);
        };

        let mut next = self.clone();
        next.subcategory = Some(label.clone());
        next.videos = Arc::new(Vec::new());
        next.selected_video = None;
        next.error = None;

        let tag = next.issue(category, Some(label));
        tracing::debug!(
            category,
            subcategory = tag.scope.subcategory.as_deref().unwrap_or_default(),
            generation = tag.generation,
            "Requesting videos"
        );
        next.pending_videos = Some(tag.clone());
        Transition {
            selection: next,
            fetch: Some(FetchRequest::Videos(tag)),
        }
    }

    fn videos_resolved(&self, tag: FetchTag, videos: Vec<Video>) -> Transition {
        if self.pending_videos.as_ref() != Some(&tag) {
            tracing::debug!(
                category = tag.scope.category,
                generation = tag.generation,
                "Discarding stale videos"
            );
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.pending_videos = None;
        next.selected_video = None;
        next.videos = Arc::new(videos);
        Transition {
            selection: next,
            fetch: None,
        }
    }

    fn videos_failed(&self, tag: FetchTag, kind: ErrorKind, message: String) -> Transition {
        if self.pending_videos.as_ref() != Some(&tag) {
            tracing::debug!(
                category = tag.scope.category,
                generation = tag.generation,
                "Discarding stale videos failure"
            );
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.pending_videos = None;
        next.error = Some(SelectionError {
            stage: Stage::Videos,
            kind,
            message,
        });
        Transition {
            selection: next,
            fetch: None,
        }
    }

    /// Open a video from the current list. Videos not in the list are ignored.
    fn select_video(&self, video: Video) -> Transition {
        let Some(found) = self.videos.iter().find(|v| v.id == video.id) else {
            tracing::debug!(video_id = %video.id, "Ignoring video outside the current list");
            return Transition::unchanged(self);
        };
        let mut next = self.clone();
        next.selected_video = Some(found.clone());
        Transition {
            selection: next,
            fetch: None,
        }
    }

    fn clear_video(&self) -> Transition {
        let mut next = self.clone();
        next.selected_video = None;
        Transition {
            selection: next,
            fetch: None,
        }
    }

    /// Retry whichever stage is missing data for the current scope.
    fn reload(&self) -> Transition {
        if self.subcategories_loading() || self.videos_loading() {
            return Transition::unchanged(self);
        }

        if self.is_language_hub() {
            return match self.language {
                Some(language) => self.select_language(language, true),
                None => Transition::unchanged(self),
            };
        }

        match self.subcategory.clone() {
            Some(label) => self.select_subcategory(label, true),
            None => self.select_category(self.category),
        }
    }
}
