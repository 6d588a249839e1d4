//! End-to-end behaviour of the show-type and hover consumers through the
//! public API, with an in-memory type service.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use showtype::display::OUTPUT_CHANNEL_NAME;
use showtype::query::TypeQuery;
use showtype::{
    DisplayLocation, Editor, OutputChannel, Selection, ShowTypeError, ShowTypeResult,
    ShowTypeSettings, SourceRange, TextDocument, TypeCandidate, TypeDisplay, TypeInspector,
    TypeService,
};
use tower_lsp_server::ls_types::{HoverContents, MarkedString, Position, Uri};

const SOURCE: &str = "module Main where\n\nmain = print (succ 41 > 3)\n";

/// Answers every query with the same candidates and records what it was asked.
struct CannedService {
    candidates: Vec<TypeCandidate>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<TypeQuery>>,
}

impl CannedService {
    fn new(candidates: Vec<TypeCandidate>) -> Self {
        Self {
            candidates,
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Vec::new())
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TypeService for CannedService {
    async fn query_types(
        &self,
        _command: &str,
        query: &TypeQuery,
    ) -> ShowTypeResult<Vec<TypeCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            return Err(ShowTypeError::ConnectionClosed);
        }
        Ok(self.candidates.clone())
    }
}

#[derive(Default)]
struct Panel {
    messages: Vec<String>,
    channel: Option<OutputChannel>,
}

impl TypeDisplay for Panel {
    fn show_information_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn output_channel(&mut self) -> &mut OutputChannel {
        self.channel
            .get_or_insert_with(|| OutputChannel::new(OUTPUT_CHANNEL_NAME))
    }
}

fn document() -> TextDocument {
    let uri: Uri = "file:///project/app/Main.hs".parse().unwrap();
    TextDocument::new(uri, "haskell", SOURCE)
}

fn editor(anchor: (u32, u32), active: (u32, u32)) -> Editor {
    Editor::new(
        document(),
        Selection::new(Position::new(anchor.0, anchor.1), Position::new(active.0, active.1)),
    )
}

fn nested_candidates() -> Vec<TypeCandidate> {
    vec![
        TypeCandidate::new(SourceRange::new(2, 19, 2, 21), "Integer"),
        TypeCandidate::new(SourceRange::new(2, 14, 2, 21), "Integer"),
        TypeCandidate::new(SourceRange::new(2, 14, 2, 25), "Bool"),
        TypeCandidate::new(SourceRange::new(2, 7, 2, 26), "IO ()"),
    ]
}

fn hover_value(contents: &HoverContents) -> &str {
    match contents {
        HoverContents::Scalar(MarkedString::LanguageString(ls)) => &ls.value,
        other => panic!("Unexpected hover contents {:?}", other),
    }
}

#[tokio::test]
async fn command_picks_innermost_enclosing_expression() {
    let inspector = TypeInspector::new(
        CannedService::new(nested_candidates()),
        ShowTypeSettings::default(),
    );
    let mut panel = Panel::default();

    // `41 > 3` is not a subexpression; the smallest enclosing one is `succ 41 > 3`
    let shown = inspector
        .show_type(Some(&editor((2, 19), (2, 25))), &mut panel)
        .await;

    assert_eq!(shown.as_deref(), Some("succ 41 > 3 :: Bool"));
    assert_eq!(panel.messages, vec!["succ 41 > 3 :: Bool"]);
    assert_eq!(inspector.fallback_count(), 0);
}

#[tokio::test]
async fn query_is_sent_for_selection_start() {
    let inspector = TypeInspector::new(
        CannedService::new(nested_candidates()),
        ShowTypeSettings::default(),
    );

    // Selected backwards from the closing paren
    inspector.resolve(&editor((2, 25), (2, 14))).await;

    let queries = inspector.service().queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].position, Position::new(2, 14));
    assert_eq!(queries[0].uri.as_str(), "file:///project/app/Main.hs");
    assert!(queries[0].include_constraints);
}

#[tokio::test]
async fn channel_location_replaces_channel_contents() {
    let settings = ShowTypeSettings {
        location: DisplayLocation::Channel,
        ..ShowTypeSettings::default()
    };
    let inspector = TypeInspector::new(CannedService::new(nested_candidates()), settings);
    let mut panel = Panel::default();

    inspector
        .show_type(Some(&editor((2, 14), (2, 21))), &mut panel)
        .await;
    inspector
        .show_type(Some(&editor((2, 7), (2, 26))), &mut panel)
        .await;

    let channel = panel.channel.unwrap();
    assert_eq!(channel.name(), "Haskell Show Type");
    assert_eq!(channel.lines(), ["print (succ 41 > 3) :: IO ()".to_string()]);
    assert!(panel.messages.is_empty());
}

#[tokio::test]
async fn disabled_location_still_resolves() {
    let settings = ShowTypeSettings {
        location: DisplayLocation::from("statusbar"),
        ..ShowTypeSettings::default()
    };
    let inspector = TypeInspector::new(CannedService::new(nested_candidates()), settings);
    let mut panel = Panel::default();

    let shown = inspector
        .show_type(Some(&editor((2, 14), (2, 21))), &mut panel)
        .await;

    assert_eq!(shown.as_deref(), Some("succ 41 :: Integer"));
    assert!(panel.messages.is_empty());
    assert!(panel.channel.is_none());
}

#[tokio::test]
async fn hover_after_command_uses_cache() {
    let inspector = TypeInspector::new(
        CannedService::new(nested_candidates()),
        ShowTypeSettings::default(),
    );
    let editor = editor((2, 14), (2, 21));

    inspector.show_type(Some(&editor), &mut Panel::default()).await;
    let hover = inspector
        .provide_hover(Some(&editor), &editor.document, Position::new(2, 17))
        .await
        .unwrap();

    assert_eq!(hover_value(&hover.contents), "succ 41 :: Integer");
    assert_eq!(hover.range, Some(SourceRange::new(2, 14, 2, 21).into()));
    assert_eq!(inspector.service().calls(), 1);
}

#[tokio::test]
async fn hover_is_scoped_to_haskell_files() {
    let inspector = TypeInspector::new(
        CannedService::new(nested_candidates()),
        ShowTypeSettings::default(),
    );
    let editor = editor((2, 14), (2, 21));
    let untitled: Uri = "untitled:Untitled-1".parse().unwrap();
    let scratch = TextDocument::new(untitled, "haskell", SOURCE);

    let hover = inspector
        .provide_hover(Some(&editor), &scratch, Position::new(2, 17))
        .await;

    assert!(hover.is_none());
    assert_eq!(inspector.service().calls(), 0);
}

#[tokio::test]
async fn hover_can_be_switched_off() {
    let settings = ShowTypeSettings {
        on_hover: false,
        ..ShowTypeSettings::default()
    };
    let inspector = TypeInspector::new(CannedService::new(nested_candidates()), settings);
    let editor = editor((2, 14), (2, 21));

    let hover = inspector
        .provide_hover(Some(&editor), &editor.document, Position::new(2, 17))
        .await;

    assert!(hover.is_none());
    assert_eq!(inspector.service().calls(), 0);
}

#[tokio::test]
async fn failures_degrade_to_nothing_shown() {
    let inspector = TypeInspector::new(CannedService::failing(), ShowTypeSettings::default());
    let editor = editor((2, 14), (2, 21));
    let mut panel = Panel::default();

    assert_eq!(inspector.show_type(Some(&editor), &mut panel).await, None);
    assert!(
        inspector
            .provide_hover(Some(&editor), &editor.document, Position::new(2, 17))
            .await
            .is_none()
    );
    assert!(panel.messages.is_empty());
    assert_eq!(inspector.cache().read(), (SourceRange::default(), String::new()));
}

#[tokio::test]
async fn concurrent_consumers_share_one_inspector() {
    let inspector = Arc::new(TypeInspector::new(
        CannedService::new(nested_candidates()),
        ShowTypeSettings::default(),
    ));

    let mut tasks = Vec::new();
    for (anchor, active) in [((2, 14), (2, 21)), ((2, 14), (2, 25)), ((2, 7), (2, 26))] {
        let inspector = inspector.clone();
        tasks.push(tokio::spawn(async move {
            inspector.resolve(&editor(anchor, active)).await
        }));
    }
    let mut resolved = Vec::new();
    for task in tasks {
        resolved.push(task.await.unwrap().unwrap());
    }

    // Whichever finished last owns the cache; it is always a whole pair.
    let (range, type_string) = inspector.cache().read();
    assert!(
        resolved
            .iter()
            .any(|c| c.range == range && c.type_string == type_string),
        "cache holds ({}, {}) which no task produced",
        range,
        type_string
    );
}
