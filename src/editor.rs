//! The editor state a type query runs against.

use tower_lsp_server::ls_types::Position;

use crate::document::TextDocument;
use crate::range::Selection;

/// The active editor: an open document and the user's selection in it.
#[derive(Debug, Clone)]
pub struct Editor {
    pub document: TextDocument,
    pub selection: Selection,
}

impl Editor {
    pub fn new(document: TextDocument, selection: Selection) -> Self {
        Self {
            document,
            selection,
        }
    }

    /// Replace the selection with one running from `anchor` to `active`.
    pub fn select(&mut self, anchor: Position, active: Position) {
        self.selection = Selection::new(anchor, active);
    }

    /// The currently selected text.
    pub fn selected_text(&self) -> &str {
        self.document.get_text(&self.selection.range)
    }
}
