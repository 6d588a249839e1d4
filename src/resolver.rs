//! Range resolution.
//!
//! The analysis service answers a type query with every expression that
//! encloses the query position, innermost first. Resolution picks the one
//! that corresponds to what the user actually selected.

use crate::range::{Selection, SourceRange};

/// One `(range, type)` pair reported by the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCandidate {
    pub range: SourceRange,
    pub type_string: String,
}

impl TypeCandidate {
    pub fn new(range: SourceRange, type_string: impl Into<String>) -> Self {
        Self {
            range,
            type_string: type_string.into(),
        }
    }
}

/// How a candidate was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The candidate's range contains the selection.
    Contained,
    /// Nothing contained the selection; the first candidate was taken.
    Fallback,
}

/// The chosen candidate for a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub candidate: TypeCandidate,
    pub kind: MatchKind,
}

/// Choose the candidate that best matches `selection`.
///
/// Returns the first candidate whose range contains the selection. When none
/// does (the document moved under an in-flight query, or the service reported
/// disjoint spans) the first candidate is returned instead, trusting the
/// innermost-first ordering. Returns `None` only for an empty slice.
pub fn resolve(selection: &Selection, candidates: &[TypeCandidate]) -> Option<Resolution> {
    if let Some(candidate) = candidates
        .iter()
        .find(|candidate| candidate.range.contains(&selection.range))
    {
        return Some(Resolution {
            candidate: candidate.clone(),
            kind: MatchKind::Contained,
        });
    }

    // NOTE: unclear whether this case should yield a result at all
    let first = candidates.first()?;
    log::debug!(
        target: "showtype::resolver",
        "No candidate contains selection {}; falling back to {} :: {}",
        selection.range,
        first.range,
        first.type_string
    );
    Some(Resolution {
        candidate: first.clone(),
        kind: MatchKind::Fallback,
    })
}
