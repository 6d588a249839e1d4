pub mod defaults;
pub mod settings;
pub mod user;

use std::fs;
use std::path::Path;

pub use defaults::default_settings;
pub use settings::{
    ServerSection, ServerSettings, Settings, ShowTypeSection, ShowTypeSettings, ShowTypeToml,
};
pub use user::{load_user_config, user_config_path};

/// File name of the project-level configuration.
pub const PROJECT_CONFIG_FILE: &str = "showtype.toml";

/// Merge a list of layers, later layers taking precedence.
pub fn merge_all(configs: &[Option<ShowTypeToml>]) -> Option<ShowTypeToml> {
    configs.iter().cloned().reduce(merge_settings).flatten()
}

/// Merge two layers, preferring values from `primary` over `fallback`
pub fn merge_settings(
    fallback: Option<ShowTypeToml>,
    primary: Option<ShowTypeToml>,
) -> Option<ShowTypeToml> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(settings), None) => Some(settings),
        (None, Some(settings)) => Some(settings),
        (Some(fallback), Some(primary)) => Some(ShowTypeToml {
            server: merge_server(fallback.server, primary.server),
            show_type: merge_show_type(fallback.show_type, primary.show_type),
        }),
    }
}

fn merge_server(
    fallback: Option<ServerSection>,
    primary: Option<ServerSection>,
) -> Option<ServerSection> {
    match (fallback, primary) {
        (Some(fallback), Some(primary)) => Some(ServerSection {
            command: primary.command.or(fallback.command),
            args: primary.args.or(fallback.args),
            request_timeout_ms: primary.request_timeout_ms.or(fallback.request_timeout_ms),
        }),
        (fallback, primary) => primary.or(fallback),
    }
}

fn merge_show_type(
    fallback: Option<ShowTypeSection>,
    primary: Option<ShowTypeSection>,
) -> Option<ShowTypeSection> {
    match (fallback, primary) {
        (Some(fallback), Some(primary)) => Some(ShowTypeSection {
            command: primary.command.or(fallback.command),
            location: primary.location.or(fallback.location),
            on_hover: primary.on_hover.or(fallback.on_hover),
        }),
        (fallback, primary) => primary.or(fallback),
    }
}

impl From<ShowTypeToml> for Settings {
    /// Resolve a merged layer, filling anything still unset from the defaults.
    fn from(layer: ShowTypeToml) -> Self {
        let mut settings = Settings::default();
        if let Some(server) = layer.server {
            if let Some(command) = server.command {
                settings.server.command = command;
            }
            if let Some(args) = server.args {
                settings.server.args = args;
            }
            if let Some(timeout) = server.request_timeout_ms {
                settings.server.request_timeout_ms = timeout;
            }
        }
        if let Some(show_type) = layer.show_type {
            if let Some(command) = show_type.command {
                settings.show_type.command = command;
            }
            if let Some(location) = show_type.location {
                settings.show_type.location = location;
            }
            if let Some(on_hover) = show_type.on_hover {
                settings.show_type.on_hover = on_hover;
            }
        }
        settings
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }

    /// Forward the event to the log.
    pub fn log(&self) {
        match self.kind {
            SettingsEventKind::Info => log::info!(target: "showtype::config", "{}", self.message),
            SettingsEventKind::Warning => {
                log::warn!(target: "showtype::config", "{}", self.message)
            }
        }
    }
}

#[derive(Debug)]
pub struct SettingsLoadOutcome {
    pub settings: Settings,
    pub events: Vec<SettingsEvent>,
}

/// Load settings from every layer.
///
/// Precedence, lowest first: programmed defaults, user config, the project
/// config (`explicit_path` if given, else `root_path/showtype.toml`), then
/// `overrides`. Broken files are reported as warnings and skipped.
pub fn load_settings(
    root_path: Option<&Path>,
    explicit_path: Option<&Path>,
    overrides: Option<ShowTypeToml>,
) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let defaults = Some(default_settings());
    let user_config = load_user_config_with_events(&mut events);
    let project_path = explicit_path
        .map(Path::to_path_buf)
        .or_else(|| root_path.map(|root| root.join(PROJECT_CONFIG_FILE)));
    let project_settings = project_path
        .as_deref()
        .and_then(|path| load_toml_settings(path, explicit_path.is_some(), &mut events));

    let merged = merge_all(&[defaults, user_config, project_settings, overrides]);
    let settings = merged.map(Settings::from).unwrap_or_default();

    SettingsLoadOutcome { settings, events }
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<ShowTypeToml> {
    match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(settings)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_toml_settings(
    config_path: &Path,
    required: bool,
    events: &mut Vec<SettingsEvent>,
) -> Option<ShowTypeToml> {
    if !config_path.exists() {
        if required {
            events.push(SettingsEvent::warning(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }
        return None;
    }

    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        config_path.display()
    )));

    match fs::read_to_string(config_path) {
        Ok(contents) => match toml::from_str::<ShowTypeToml>(&contents) {
            Ok(settings) => Some(settings),
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {}: {}",
                    config_path.display(),
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {}: {}",
                config_path.display(),
                err
            )));
            None
        }
    }
}
