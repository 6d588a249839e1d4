//! The remote analysis service seam.

use std::future::Future;

use serde_json::Value;
use tower_lsp_server::ls_types::Range;

use crate::error::{ShowTypeError, ShowTypeResult};
use crate::query::TypeQuery;
use crate::resolver::TypeCandidate;

/// Something that can answer type queries.
///
/// Implementations return the candidates exactly as the service ordered them
/// (innermost expression first). Failures are returned, never swallowed; the
/// caller decides what to do with them.
pub trait TypeService {
    fn query_types(
        &self,
        command: &str,
        query: &TypeQuery,
    ) -> impl Future<Output = ShowTypeResult<Vec<TypeCandidate>>> + Send;
}

/// Decode an executeCommand result into candidates.
///
/// The expected shape is `[[range, "type"], ...]` with LSP ranges. A `null`
/// result means the service had nothing to say and decodes to no candidates.
pub fn parse_candidates(result: Value) -> ShowTypeResult<Vec<TypeCandidate>> {
    if result.is_null() {
        return Ok(Vec::new());
    }
    let pairs: Vec<(Range, String)> = serde_json::from_value(result)
        .map_err(|e| ShowTypeError::malformed(format!("expected [[range, type], ...]: {}", e)))?;
    Ok(pairs
        .into_iter()
        .map(|(range, type_string)| TypeCandidate::new(range.into(), type_string))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SourceRange;
    use serde_json::json;

    fn lsp_range(sl: u32, sc: u32, el: u32, ec: u32) -> Value {
        json!({
            "start": { "line": sl, "character": sc },
            "end": { "line": el, "character": ec }
        })
    }

    #[test]
    fn parses_pairs_in_order() {
        let result = json!([
            [lsp_range(2, 4, 2, 10), "Int"],
            [lsp_range(2, 0, 2, 15), "Int -> Bool"]
        ]);

        let candidates = parse_candidates(result).unwrap();
        assert_eq!(
            candidates,
            vec![
                TypeCandidate::new(SourceRange::new(2, 4, 2, 10), "Int"),
                TypeCandidate::new(SourceRange::new(2, 0, 2, 15), "Int -> Bool"),
            ]
        );
    }

    #[test]
    fn empty_array_is_no_candidates() {
        assert!(parse_candidates(json!([])).unwrap().is_empty());
    }

    #[test]
    fn null_is_no_candidates() {
        assert!(parse_candidates(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn object_result_is_malformed() {
        let err = parse_candidates(json!({ "type": "Int" })).unwrap_err();
        assert!(matches!(err, ShowTypeError::MalformedResponse { .. }));
    }

    #[test]
    fn pair_missing_type_is_malformed() {
        let err = parse_candidates(json!([[lsp_range(0, 0, 0, 1)]])).unwrap_err();
        assert!(matches!(err, ShowTypeError::MalformedResponse { .. }));
    }
}
