//! Hover gate: decides whether a hover should show type information at all.

use tower_lsp_server::ls_types::Position;

use crate::editor::Editor;

/// Why a hover was suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    NoActiveEditor,
    OutsideSelection,
    EmptySelection,
    ActiveOutOfBounds,
    MultiLine,
}

/// Check every precondition for showing a type on hover.
///
/// The checks run in a fixed order and the first failure is reported.
pub fn check(editor: Option<&Editor>, position: Position) -> Result<(), GateRejection> {
    let Some(editor) = editor else {
        return Err(GateRejection::NoActiveEditor);
    };
    let selection = &editor.selection;
    if !selection.contains_position(position) {
        return Err(GateRejection::OutsideSelection);
    }
    if selection.is_empty() {
        return Err(GateRejection::EmptySelection);
    }
    if selection.active_out_of_bounds() {
        return Err(GateRejection::ActiveOutOfBounds);
    }
    // TODO: allow multi-line selections; the resolver already handles them
    if !selection.is_single_line() {
        return Err(GateRejection::MultiLine);
    }
    Ok(())
}

/// True iff a hover at `position` should show type information.
pub fn should_show_type(editor: Option<&Editor>, position: Position) -> bool {
    match check(editor, position) {
        Ok(()) => true,
        Err(reason) => {
            log::trace!(target: "showtype::gate", "Hover suppressed: {:?}", reason);
            false
        }
    }
}
