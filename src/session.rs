//! Line-driven host emulation.
//!
//! A session holds one [`Editor`] and reacts to events read one per line:
//!
//! ```text
//! select 2:14 2:21   # anchor, active (zero-based line:character)
//! hover 2:16
//! show
//! quit
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tower_lsp_server::ls_types::{Hover, HoverContents, MarkedString, Position};

use crate::display::{OUTPUT_CHANNEL_NAME, OutputChannel, TypeDisplay};
use crate::editor::Editor;
use crate::error::{ShowTypeError, ShowTypeResult};
use crate::inspector::TypeInspector;
use crate::range::Selection;
use crate::service::TypeService;

/// One host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Select { anchor: Position, active: Position },
    Hover(Position),
    ShowType,
    Quit,
}

/// Parse a zero-based `line:character` pair.
pub fn parse_position(text: &str) -> ShowTypeResult<Position> {
    let (line, character) = text
        .split_once(':')
        .ok_or_else(|| ShowTypeError::invalid_event(format!("expected L:C, got '{}'", text)))?;
    let parse = |part: &str| {
        part.trim().parse::<u32>().map_err(|e| {
            ShowTypeError::invalid_event(format!("bad number '{}' in '{}': {}", part, text, e))
        })
    };
    Ok(Position::new(parse(line)?, parse(character)?))
}

/// Parse `L:C-L:C` into a selection anchored at the first position.
pub fn parse_selection(text: &str) -> ShowTypeResult<Selection> {
    let (anchor, active) = text.split_once('-').ok_or_else(|| {
        ShowTypeError::invalid_event(format!("expected L:C-L:C, got '{}'", text))
    })?;
    Ok(Selection::new(parse_position(anchor)?, parse_position(active)?))
}

/// Parse one input line. Blank and comment lines yield `None`.
pub fn parse_event(line: &str) -> ShowTypeResult<Option<SessionEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let event = match (keyword, args.as_slice()) {
        ("select", [anchor, active]) => SessionEvent::Select {
            anchor: parse_position(anchor)?,
            active: parse_position(active)?,
        },
        ("select", [range]) => {
            let selection = parse_selection(range)?;
            SessionEvent::Select {
                anchor: selection.anchor,
                active: selection.active,
            }
        }
        ("hover", [position]) => SessionEvent::Hover(parse_position(position)?),
        ("show", []) => SessionEvent::ShowType,
        ("quit" | "exit", []) => SessionEvent::Quit,
        _ => {
            return Err(ShowTypeError::invalid_event(format!(
                "unrecognized event '{}'",
                line
            )));
        }
    };
    Ok(Some(event))
}

/// Text of a language-tagged hover.
pub fn hover_text(hover: &Hover) -> Option<&str> {
    match &hover.contents {
        HoverContents::Scalar(MarkedString::LanguageString(ls)) => Some(&ls.value),
        HoverContents::Scalar(MarkedString::String(s)) => Some(s),
        _ => None,
    }
}

/// A [`TypeDisplay`] that prints to a writer.
///
/// Messages are printed as-is. Channel updates print every channel line
/// prefixed with the channel name.
pub struct ConsoleDisplay<W> {
    out: W,
    channel: OutputChannel,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            channel: OutputChannel::new(OUTPUT_CHANNEL_NAME),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Print a line, logging instead of failing when the writer is gone.
    pub fn print_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
            log::warn!(target: "showtype::session", "Failed to write output: {}", e);
        }
    }
}

impl<W: Write> TypeDisplay for ConsoleDisplay<W> {
    fn show_information_message(&mut self, message: &str) {
        self.print_line(message);
    }

    fn output_channel(&mut self) -> &mut OutputChannel {
        &mut self.channel
    }

    fn channel_updated(&mut self) {
        if !self.channel.is_visible() {
            return;
        }
        let lines: Vec<String> = self
            .channel
            .lines()
            .iter()
            .map(|line| format!("[{}] {}", self.channel.name(), line))
            .collect();
        for line in lines {
            self.print_line(&line);
        }
    }
}

/// Drive `inspector` from events read off `input` until `quit` or EOF.
///
/// Unparseable lines are logged and skipped. Returns the number of events
/// handled.
pub async fn run_session<S, R, W>(
    inspector: &TypeInspector<S>,
    editor: &mut Editor,
    input: R,
    display: &mut ConsoleDisplay<W>,
) -> ShowTypeResult<usize>
where
    S: TypeService,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let event = match parse_event(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                log::warn!(target: "showtype::session", "Skipping input: {}", e);
                continue;
            }
        };
        handled += 1;
        log::debug!(target: "showtype::session", "Event: {:?}", event);

        match event {
            SessionEvent::Select { anchor, active } => editor.select(anchor, active),
            SessionEvent::Hover(position) => {
                let hover = inspector
                    .provide_hover(Some(&*editor), &editor.document, position)
                    .await;
                match hover.as_ref().and_then(hover_text) {
                    Some(text) => display.print_line(text),
                    None => log::info!(
                        target: "showtype::session",
                        "No hover at {}:{}",
                        position.line,
                        position.character
                    ),
                }
            }
            SessionEvent::ShowType => {
                if inspector.show_type(Some(&*editor), display).await.is_none() {
                    log::info!(target: "showtype::session", "No type for {}", editor.selection.range);
                }
            }
            SessionEvent::Quit => break,
        }
    }

    Ok(handled)
}
