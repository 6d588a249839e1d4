use serde::{Deserialize, Serialize};

use crate::display::DisplayLocation;

/// One configuration layer as written in `showtype.toml`.
///
/// Every field is optional so layers can be merged; see
/// [`merge_settings`](super::merge_settings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShowTypeToml {
    pub server: Option<ServerSection>,
    pub show_type: Option<ShowTypeSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerSection {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShowTypeSection {
    pub command: Option<String>,
    pub location: Option<DisplayLocation>,
    pub on_hover: Option<bool>,
}

/// How to reach the language server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub command: String,
    pub args: Vec<String>,
    pub request_timeout_ms: u64,
}

/// Behaviour of the show-type command and hover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowTypeSettings {
    /// Name of the remote type command.
    pub command: String,
    pub location: DisplayLocation,
    pub on_hover: bool,
}

/// Fully resolved settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub server: ServerSettings,
    pub show_type: ShowTypeSettings,
}
