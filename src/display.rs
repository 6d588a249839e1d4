//! Presenting resolved types to the user.

use serde::{Deserialize, Serialize};
use tower_lsp_server::ls_types::{Hover, HoverContents, LanguageString, MarkedString};

use crate::document::{HASKELL_LANGUAGE_ID, TextDocument};
use crate::range::SourceRange;

/// Name of the output channel the `channel` location writes to.
pub const OUTPUT_CHANNEL_NAME: &str = "Haskell Show Type";

/// Format `<source text> :: <type>`.
pub fn format_expression_type(document: &TextDocument, range: &SourceRange, type_string: &str) -> String {
    format!("{} :: {}", document.get_text(range), type_string)
}

/// Where the show-type command puts its result.
///
/// Decoded from a string: `"dropdown"`, `"channel"`, and anything else
/// meaning no display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayLocation {
    /// Transient notification message.
    #[default]
    Dropdown,
    /// Persistent output channel, cleared and revealed on each result.
    Channel,
    /// Do not display.
    Disabled,
}

impl From<&str> for DisplayLocation {
    fn from(value: &str) -> Self {
        match value {
            "dropdown" => DisplayLocation::Dropdown,
            "channel" => DisplayLocation::Channel,
            _ => DisplayLocation::Disabled,
        }
    }
}

impl From<String> for DisplayLocation {
    fn from(value: String) -> Self {
        DisplayLocation::from(value.as_str())
    }
}

impl From<DisplayLocation> for String {
    fn from(value: DisplayLocation) -> Self {
        match value {
            DisplayLocation::Dropdown => "dropdown",
            DisplayLocation::Channel => "channel",
            DisplayLocation::Disabled => "none",
        }
        .to_string()
    }
}

/// A named, append-only text panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChannel {
    name: String,
    lines: Vec<String>,
    visible: bool,
}

impl OutputChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
            visible: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn append_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Reveal the channel without taking focus.
    pub fn show(&mut self) {
        self.visible = true;
    }
}

/// The host's display surface.
pub trait TypeDisplay {
    /// Show a transient notification.
    fn show_information_message(&mut self, message: &str);

    /// The show-type output channel.
    fn output_channel(&mut self) -> &mut OutputChannel;

    /// Called after the output channel changed so the host can render it.
    fn channel_updated(&mut self) {}
}

/// Send `text` to the surface selected by `location`.
///
/// Returns `false` when the location disables display.
pub fn display_type(location: DisplayLocation, display: &mut impl TypeDisplay, text: &str) -> bool {
    match location {
        DisplayLocation::Dropdown => {
            display.show_information_message(text);
            true
        }
        DisplayLocation::Channel => {
            let channel = display.output_channel();
            channel.clear();
            channel.append_line(text);
            channel.show();
            display.channel_updated();
            true
        }
        DisplayLocation::Disabled => false,
    }
}

/// Build the hover shown for a resolved type.
pub fn make_hover(document: &TextDocument, range: &SourceRange, type_string: &str) -> Hover {
    Hover {
        contents: HoverContents::Scalar(MarkedString::LanguageString(LanguageString {
            language: HASKELL_LANGUAGE_ID.to_string(),
            value: format_expression_type(document, range, type_string),
        })),
        range: Some((*range).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tower_lsp_server::ls_types::Uri;

    #[derive(Default)]
    struct RecordingDisplay {
        messages: Vec<String>,
        channel: Option<OutputChannel>,
        renders: usize,
    }

    impl TypeDisplay for RecordingDisplay {
        fn show_information_message(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }

        fn output_channel(&mut self) -> &mut OutputChannel {
            self.channel
                .get_or_insert_with(|| OutputChannel::new(OUTPUT_CHANNEL_NAME))
        }

        fn channel_updated(&mut self) {
            self.renders += 1;
        }
    }

    fn doc() -> TextDocument {
        let uri: Uri = "file:///project/Main.hs".parse().unwrap();
        TextDocument::new(uri, "haskell", "main = print (length xs)\n")
    }

    #[test]
    fn formats_source_text_and_type() {
        let text = format_expression_type(&doc(), &SourceRange::new(0, 14, 0, 20), "[a] -> Int");
        assert_eq!(text, "length :: [a] -> Int");
    }

    #[rstest]
    #[case::dropdown("dropdown", DisplayLocation::Dropdown)]
    #[case::channel("channel", DisplayLocation::Channel)]
    #[case::empty("", DisplayLocation::Disabled)]
    #[case::unknown("statusbar", DisplayLocation::Disabled)]
    #[case::case_sensitive("Channel", DisplayLocation::Disabled)]
    fn decodes_location(#[case] raw: &str, #[case] expected: DisplayLocation) {
        assert_eq!(DisplayLocation::from(raw), expected);
        let decoded: DisplayLocation = serde_json::from_value(serde_json::json!(raw)).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn dropdown_shows_message() {
        let mut display = RecordingDisplay::default();
        assert!(display_type(DisplayLocation::Dropdown, &mut display, "x :: Int"));
        assert_eq!(display.messages, vec!["x :: Int"]);
        assert!(display.channel.is_none());
    }

    #[test]
    fn channel_replaces_previous_content_and_reveals() {
        let mut display = RecordingDisplay::default();
        display_type(DisplayLocation::Channel, &mut display, "x :: Int");
        display_type(DisplayLocation::Channel, &mut display, "y :: Bool");

        let channel = display.channel.as_ref().unwrap();
        assert_eq!(channel.name(), OUTPUT_CHANNEL_NAME);
        assert_eq!(channel.lines(), ["y :: Bool".to_string()]);
        assert!(channel.is_visible());
        assert_eq!(display.renders, 2);
        assert!(display.messages.is_empty());
    }

    #[test]
    fn disabled_shows_nothing() {
        let mut display = RecordingDisplay::default();
        assert!(!display_type(DisplayLocation::Disabled, &mut display, "x :: Int"));
        assert!(display.messages.is_empty());
        assert!(display.channel.is_none());
    }

    #[test]
    fn hover_is_language_tagged() {
        let range = SourceRange::new(0, 14, 0, 20);
        let hover = make_hover(&doc(), &range, "[a] -> Int");

        match hover.contents {
            HoverContents::Scalar(MarkedString::LanguageString(ls)) => {
                assert_eq!(ls.language, "haskell");
                assert_eq!(ls.value, "length :: [a] -> Int");
            }
            other => panic!("Expected language string, got {:?}", other),
        }
        assert_eq!(hover.range, Some(range.into()));
    }
}
