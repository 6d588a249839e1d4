//! Query building for the type command.
//!
//! A type query is sent as `workspace/executeCommand` with a single argument
//! object naming the file and position.

use tower_lsp_server::ls_types::{ExecuteCommandParams, Position, Uri, WorkDoneProgressParams};

use crate::editor::Editor;

/// Default name of the remote type command.
pub const DEFAULT_TYPE_COMMAND: &str = "ghcmod:type";

/// Location descriptor for a type query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQuery {
    pub uri: Uri,
    pub position: Position,
    pub include_constraints: bool,
}

impl TypeQuery {
    /// Build the query for the editor's current selection start.
    pub fn from_editor(editor: &Editor) -> Self {
        Self {
            uri: editor.document.uri().clone(),
            position: editor.selection.start(),
            include_constraints: true,
        }
    }

    /// The command argument object as sent on the wire.
    pub fn argument(&self) -> serde_json::Value {
        serde_json::json!({
            "file": self.uri.as_str(),
            "pos": {
                "line": self.position.line,
                "character": self.position.character
            },
            "include_constraints": self.include_constraints
        })
    }

    /// Build `workspace/executeCommand` params for `command`.
    pub fn to_execute_command(&self, command: &str) -> ExecuteCommandParams {
        ExecuteCommandParams {
            command: command.to_string(),
            arguments: vec![self.argument()],
            work_done_progress_params: WorkDoneProgressParams::default(),
        }
    }
}
