//! Type inspection: the shared resolution path and its two consumers.
//!
//! ```text
//!   show_type ─┐                       ┌─> display (dropdown / channel)
//!              ├─> resolve ─> service ─┤
//!   hover ─────┘      │                └─> hover
//!     │               └─> cache.write
//!     └─> gate ─> cache.lookup (hit: no service call)
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use tower_lsp_server::ls_types::{Hover, Position};

use crate::cache::LastResultCache;
use crate::config::ShowTypeSettings;
use crate::display::{TypeDisplay, display_type, format_expression_type, make_hover};
use crate::document::{DocumentFilter, TextDocument};
use crate::editor::Editor;
use crate::gate;
use crate::query::TypeQuery;
use crate::resolver::{self, MatchKind, TypeCandidate};
use crate::service::TypeService;

/// Owns the last-result cache and routes both consumers through one
/// resolution path.
///
/// All methods take `&self`; share one inspector between concurrently
/// running hover and command tasks. Concurrent resolutions race on the cache
/// and the last one to finish wins.
pub struct TypeInspector<S> {
    service: S,
    settings: ShowTypeSettings,
    filter: DocumentFilter,
    cache: LastResultCache,
    fallbacks: AtomicU64,
}

impl<S: TypeService> TypeInspector<S> {
    pub fn new(service: S, settings: ShowTypeSettings) -> Self {
        Self {
            service,
            settings,
            filter: DocumentFilter::haskell(),
            cache: LastResultCache::new(),
            fallbacks: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Give back the service, e.g. to shut it down.
    pub fn into_service(self) -> S {
        self.service
    }

    pub fn settings(&self) -> &ShowTypeSettings {
        &self.settings
    }

    pub fn cache(&self) -> &LastResultCache {
        &self.cache
    }

    /// How many resolutions fell back to the first candidate.
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.load(Ordering::Relaxed)
    }

    /// Query the service for the editor's selection and pick a candidate.
    ///
    /// On success the cache is overwritten with the result. An empty answer
    /// or a failed call yields `None` and leaves the cache alone; failures
    /// are logged here and go no further.
    pub async fn resolve(&self, editor: &Editor) -> Option<TypeCandidate> {
        let query = TypeQuery::from_editor(editor);
        let candidates = match self.service.query_types(&self.settings.command, &query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!(
                    target: "showtype::inspector",
                    "Type query for {} at {}:{} failed: {}",
                    query.uri.as_str(),
                    query.position.line,
                    query.position.character,
                    e
                );
                return None;
            }
        };

        let Some(resolution) = resolver::resolve(&editor.selection, &candidates) else {
            log::debug!(target: "showtype::inspector", "No type candidates returned");
            return None;
        };
        if resolution.kind == MatchKind::Fallback {
            let count = self.fallbacks.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!(
                target: "showtype::inspector",
                "Resolver fallback used ({} so far)",
                count
            );
        }

        let candidate = resolution.candidate;
        self.cache
            .write(candidate.range, candidate.type_string.clone());
        Some(candidate)
    }

    /// The show-type command.
    ///
    /// Resolves the current selection and displays `<text> :: <type>` where
    /// the settings say to. Returns the formatted text, or `None` when there
    /// was nothing to show.
    pub async fn show_type<D: TypeDisplay>(
        &self,
        editor: Option<&Editor>,
        display: &mut D,
    ) -> Option<String> {
        let Some(editor) = editor else {
            log::info!(target: "showtype::inspector", "Show type requested without an active editor");
            return None;
        };

        let candidate = self.resolve(editor).await?;
        let text = format_expression_type(&editor.document, &candidate.range, &candidate.type_string);
        display_type(self.settings.location, display, &text);
        Some(text)
    }

    /// The hover consumer.
    ///
    /// Answers from the cache when the selection is exactly the last resolved
    /// range; otherwise resolves afresh.
    pub async fn provide_hover(
        &self,
        editor: Option<&Editor>,
        document: &TextDocument,
        position: Position,
    ) -> Option<Hover> {
        if !self.settings.on_hover || !self.filter.matches(document) {
            return None;
        }
        if !gate::should_show_type(editor, position) {
            return None;
        }
        let editor = editor?;

        if let Some(cached) = self.cache.lookup(&editor.selection.range) {
            log::debug!(
                target: "showtype::inspector",
                "Hover served from cache for {}",
                cached.range
            );
            return Some(make_hover(document, &cached.range, &cached.type_string));
        }

        let candidate = self.resolve(editor).await?;
        if candidate.type_string.is_empty() {
            return None;
        }
        Some(make_hover(document, &candidate.range, &candidate.type_string))
    }
}
