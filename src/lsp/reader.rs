//! Reader task for the language server's stdout.
//!
//! The reader task:
//! - Routes responses to waiting requesters
//! - Answers server-to-client requests with a `null` result so the server
//!   never blocks on us
//! - Logs notifications
//! - Fails every pending request on EOF or read error

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::connection::{MessageReader, write_message};
use super::response_router::ResponseRouter;

/// Handle to a running reader task; dropping it stops the task.
pub(crate) struct ReaderTaskHandle {
    _join_handle: JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl Drop for ReaderTaskHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

/// Spawn a reader task.
///
/// `writer` is the server's stdin, used only to answer server requests.
pub(crate) fn spawn_reader_task<R, W>(
    reader: MessageReader<R>,
    router: Arc<ResponseRouter>,
    writer: Arc<Mutex<W>>,
) -> ReaderTaskHandle
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let cancel_token = CancellationToken::new();
    let join_handle = tokio::spawn(reader_loop(reader, router, writer, cancel_token.clone()));

    ReaderTaskHandle {
        _join_handle: join_handle,
        cancel_token,
    }
}

async fn reader_loop<R, W>(
    mut reader: MessageReader<R>,
    router: Arc<ResponseRouter>,
    writer: Arc<Mutex<W>>,
    cancel_token: CancellationToken,
) where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                debug!(target: "showtype::lsp::reader", "Reader task cancelled, shutting down");
                break;
            }

            result = reader.read_message() => {
                match result {
                    Ok(Some(message)) => {
                        if let Some(reply) = handle_message(message, &router) {
                            let mut writer = writer.lock().await;
                            if let Err(e) = write_message(&mut *writer, &reply).await {
                                warn!(target: "showtype::lsp::reader", "Failed to answer server request: {}", e);
                            }
                        }
                    }
                    Ok(None) => {
                        debug!(target: "showtype::lsp::reader", "Language server closed stdout");
                        router.fail_all();
                        break;
                    }
                    Err(e) => {
                        warn!(
                            target: "showtype::lsp::reader",
                            "Reader error: {}, failing pending requests",
                            e
                        );
                        router.fail_all();
                        break;
                    }
                }
            }
        }
    }
}

/// Handle one incoming message, returning a reply to send if it needs one.
fn handle_message(message: Value, router: &ResponseRouter) -> Option<Value> {
    let method = message
        .get("method")
        .and_then(|m| m.as_str())
        .map(str::to_owned);
    let id = message.get("id").cloned();
    match (method, id) {
        (Some(method), Some(id)) => {
            debug!(
                target: "showtype::lsp::reader",
                "Answering server request {} with null",
                method
            );
            Some(serde_json::json!({
                "jsonrpc": "2.0",
                "id": id,
                "result": null
            }))
        }
        (None, Some(_)) => {
            if !router.route(message) {
                debug!(
                    target: "showtype::lsp::reader",
                    "Response for unknown request ID, dropping"
                );
            }
            None
        }
        (Some(method), None) => {
            let text = message
                .pointer("/params/message")
                .and_then(|m| m.as_str())
                .unwrap_or("");
            debug!(target: "showtype::lsp::reader", "Notification {} {}", method, text);
            None
        }
        (None, None) => {
            warn!(target: "showtype::lsp::reader", "Ignoring message without method or id");
            None
        }
    }
}
