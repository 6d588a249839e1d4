//! Documents and document filters.

use std::path::Path;
use std::str::FromStr;

use tower_lsp_server::ls_types::{Position, Uri};

use crate::error::{ShowTypeError, ShowTypeResult};
use crate::range::SourceRange;

/// Language identifier used for Haskell sources.
pub const HASKELL_LANGUAGE_ID: &str = "haskell";

/// Guess a language id from a file extension.
pub fn language_id_for_path(path: &Path) -> Option<&'static str> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("hs") | Some("lhs") => Some(HASKELL_LANGUAGE_ID),
        _ => None,
    }
}

/// An open text document.
///
/// Positions handed to [`TextDocument::get_text`] are LSP positions, so
/// columns count UTF-16 code units.
#[derive(Debug, Clone)]
pub struct TextDocument {
    uri: Uri,
    language_id: String,
    text: String,
    line_starts: Vec<usize>,
}

impl TextDocument {
    pub fn new(uri: Uri, language_id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            uri,
            language_id: language_id.into(),
            text,
            line_starts,
        }
    }

    /// Read a document from disk, deriving its URI and language id from the path.
    pub fn open(path: &Path) -> ShowTypeResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let uri = path_to_uri(path)?;
        let language_id = language_id_for_path(path).unwrap_or("plaintext");
        Ok(Self::new(uri, language_id, text))
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// The URI scheme, e.g. `file`.
    pub fn scheme(&self) -> &str {
        self.uri
            .as_str()
            .split_once(':')
            .map(|(scheme, _)| scheme)
            .unwrap_or("")
    }

    /// Convert an LSP position to a byte offset.
    ///
    /// Columns past the end of a line clamp to the line end (before the
    /// terminator); lines past the end of the document yield `None`.
    fn offset_of(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = *self.line_starts.get(line)?;
        let line_end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        let line_text = self.text[line_start..line_end].trim_end_matches('\r');
        let column = convert_utf16_to_byte_in_line(line_text, position.character as usize)
            .unwrap_or(line_text.len());
        Some(line_start + column)
    }

    /// The text covered by `range`.
    ///
    /// Ranges that fall outside the document, or split a character, yield an
    /// empty string.
    pub fn get_text(&self, range: &SourceRange) -> &str {
        let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end))
        else {
            return "";
        };
        if start > end {
            return "";
        }
        self.text.get(start..end).unwrap_or("")
    }
}

/// Byte offsets at which each line starts.
fn compute_line_starts(text: &str) -> Vec<usize> {
    let mut line_starts = vec![0];
    line_starts.extend(
        text.bytes()
            .enumerate()
            .filter(|(_, b)| *b == b'\n')
            .map(|(i, _)| i + 1),
    );
    line_starts
}

/// Convert a UTF-16 column to a byte column within one line.
///
/// Returns `None` when the column lies beyond the end of the line.
fn convert_utf16_to_byte_in_line(line_text: &str, utf16_pos: usize) -> Option<usize> {
    let mut byte_offset = 0;
    let mut utf16_offset = 0;

    for ch in line_text.chars() {
        if utf16_offset >= utf16_pos {
            return Some(byte_offset);
        }
        utf16_offset += ch.len_utf16();
        byte_offset += ch.len_utf8();
    }

    (utf16_offset == utf16_pos).then_some(byte_offset)
}

/// Convert a filesystem path to a `file://` URI.
pub fn path_to_uri(path: &Path) -> ShowTypeResult<Uri> {
    let absolute = std::path::absolute(path)?;
    let url = url::Url::from_file_path(&absolute).map_err(|()| {
        ShowTypeError::config(format!("Cannot build URI for {}", absolute.display()))
    })?;
    Uri::from_str(url.as_str())
        .map_err(|e| ShowTypeError::config(format!("Invalid URI {}: {}", url, e)))
}

/// Selects which documents a provider applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFilter {
    pub language: String,
    pub scheme: String,
}

impl DocumentFilter {
    /// The filter hover is registered under: Haskell files on disk.
    pub fn haskell() -> Self {
        Self {
            language: HASKELL_LANGUAGE_ID.to_string(),
            scheme: "file".to_string(),
        }
    }

    pub fn matches(&self, document: &TextDocument) -> bool {
        document.language_id() == self.language && document.scheme() == self.scheme
    }
}
