use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::io::BufReader;

use showtype::config::{self, ServerSection, ShowTypeSection, ShowTypeToml};
use showtype::display::DisplayLocation;
use showtype::document::{TextDocument, path_to_uri};
use showtype::error::{ShowTypeError, ShowTypeResult};
use showtype::lsp::LanguageServerClient;
use showtype::session::{self, ConsoleDisplay};
use showtype::{Editor, Selection, Settings, TypeInspector};

/// Show the type of a Haskell expression using a language server
#[derive(Parser)]
#[command(name = "showtype")]
#[command(version)]
#[command(about = "Show the type of a Haskell expression using a language server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Language server executable (default: hie-wrapper)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Argument passed to the language server; repeat for several
    #[arg(long = "server-arg", global = true, allow_hyphen_values = true)]
    server_args: Vec<String>,

    /// Where to show the result: dropdown, channel, or anything else for nothing
    #[arg(long, global = true)]
    location: Option<String>,

    /// Config file to use instead of <project>/showtype.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the type of one selection and exit
    Type {
        /// Haskell source file
        file: PathBuf,

        /// Zero-based selection as LINE:CHAR-LINE:CHAR
        #[arg(long, short)]
        selection: String,
    },
    /// Read select/hover/show/quit events from stdin
    Session {
        /// Haskell source file
        file: PathBuf,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

async fn run(cli: Cli) -> ShowTypeResult<()> {
    let overrides = cli_overrides(&cli);

    match cli.command {
        Commands::Config => {
            let template = toml::to_string_pretty(&config::default_settings())
                .map_err(|e| ShowTypeError::config(e.to_string()))?;
            print!("{}", template);
            Ok(())
        }
        Commands::Type { file, selection } => {
            let selection = session::parse_selection(&selection)?;
            let (settings, mut editor, root) =
                prepare(&file, cli.config.as_deref(), overrides)?;
            editor.selection = selection;

            let client = start_client(&settings, &root, &editor.document).await?;
            let inspector = TypeInspector::new(client, settings.show_type);
            let mut display = ConsoleDisplay::new(std::io::stdout());

            if inspector.show_type(Some(&editor), &mut display).await.is_none() {
                eprintln!("No type information for {}", editor.selection.range);
            }
            shutdown(inspector.into_service()).await;
            Ok(())
        }
        Commands::Session { file } => {
            let (settings, mut editor, root) =
                prepare(&file, cli.config.as_deref(), overrides)?;

            let client = start_client(&settings, &root, &editor.document).await?;
            let inspector = TypeInspector::new(client, settings.show_type);
            let mut display = ConsoleDisplay::new(std::io::stdout());
            let input = BufReader::new(tokio::io::stdin());

            let result = session::run_session(&inspector, &mut editor, input, &mut display).await;
            shutdown(inspector.into_service()).await;
            let handled = result?;
            log::info!(target: "showtype::session", "Session ended after {} events", handled);
            Ok(())
        }
    }
}

/// Settings layer built from command-line flags.
fn cli_overrides(cli: &Cli) -> Option<ShowTypeToml> {
    let server = (cli.server.is_some() || !cli.server_args.is_empty()).then(|| ServerSection {
        command: cli.server.clone(),
        args: (!cli.server_args.is_empty()).then(|| cli.server_args.clone()),
        request_timeout_ms: None,
    });
    let show_type = cli.location.as_deref().map(|location| ShowTypeSection {
        location: Some(DisplayLocation::from(location)),
        ..ShowTypeSection::default()
    });

    (server.is_some() || show_type.is_some()).then_some(ShowTypeToml { server, show_type })
}

/// Load settings for `file`'s project and open it in an editor.
fn prepare(
    file: &Path,
    explicit_config: Option<&Path>,
    overrides: Option<ShowTypeToml>,
) -> ShowTypeResult<(Settings, Editor, PathBuf)> {
    let root = match file.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let outcome = config::load_settings(Some(&root), explicit_config, overrides);
    for event in &outcome.events {
        event.log();
    }

    let document = TextDocument::open(file)?;
    Ok((outcome.settings, Editor::new(document, Selection::default()), root))
}

async fn start_client(
    settings: &Settings,
    root: &Path,
    document: &TextDocument,
) -> ShowTypeResult<LanguageServerClient> {
    let root_uri = path_to_uri(root)?;
    let client = LanguageServerClient::start(&settings.server, Some(&root_uri)).await?;
    client.did_open(document).await?;
    Ok(client)
}

async fn shutdown(client: LanguageServerClient) {
    if let Err(e) = client.shutdown().await {
        log::warn!(target: "showtype::lsp", "Language server shutdown failed: {}", e);
    }
}
