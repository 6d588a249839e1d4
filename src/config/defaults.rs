//! Default configuration values for showtype.

use super::settings::{
    ServerSection, ServerSettings, ShowTypeSection, ShowTypeSettings, ShowTypeToml,
};
use crate::display::DisplayLocation;
use crate::query::DEFAULT_TYPE_COMMAND;

pub const DEFAULT_SERVER_COMMAND: &str = "hie-wrapper";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_SERVER_COMMAND.to_string(),
            args: vec!["--lsp".to_string()],
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl Default for ShowTypeSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_TYPE_COMMAND.to_string(),
            location: DisplayLocation::Dropdown,
            on_hover: true,
        }
    }
}

/// The defaults expressed as a configuration layer.
///
/// Used as the lowest-precedence layer and by `showtype config` to print a
/// template.
pub fn default_settings() -> ShowTypeToml {
    let server = ServerSettings::default();
    let show_type = ShowTypeSettings::default();
    ShowTypeToml {
        server: Some(ServerSection {
            command: Some(server.command),
            args: Some(server.args),
            request_timeout_ms: Some(server.request_timeout_ms),
        }),
        show_type: Some(ShowTypeSection {
            command: Some(show_type.command),
            location: Some(show_type.location),
            on_hover: Some(show_type.on_hover),
        }),
    }
}
