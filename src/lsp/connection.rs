//! Connection to a language server process over stdio.
//!
//! Messages use LSP base protocol framing: `Content-Length: N\r\n\r\n{json}`.
//! Responses are read by a background task (see [`super::reader`]) and routed
//! to callers by request ID, so several requests may be in flight at once.

use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::Mutex;

use super::reader::{ReaderTaskHandle, spawn_reader_task};
use super::request_id::RequestId;
use super::response_router::ResponseRouter;
use crate::error::{ShowTypeError, ShowTypeResult};

/// Largest message body accepted from a server.
pub(crate) const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// Writes a JSON-RPC message with LSP base protocol framing.
pub(crate) async fn write_message<W>(writer: &mut W, message: &Value) -> ShowTypeResult<()>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_string(message)?;
    let header = format!("Content-Length: {}\r\n\r\n", body.len());
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads framed JSON-RPC messages from a byte stream.
pub(crate) struct MessageReader<R> {
    inner: BufReader<R>,
}

impl<R: AsyncRead + Unpin> MessageReader<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: BufReader::new(reader),
        }
    }

    /// Read the next message.
    ///
    /// Returns `Ok(None)` on a clean EOF between messages.
    pub(crate) async fn read_message(&mut self) -> ShowTypeResult<Option<Value>> {
        let mut content_length: Option<usize> = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            let read = self.inner.read_line(&mut line).await?;
            if read == 0 {
                if saw_header {
                    return Err(ShowTypeError::protocol("EOF inside message header"));
                }
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if saw_header {
                    break;
                }
                continue;
            }
            saw_header = true;

            let Some((name, value)) = line.split_once(':') else {
                return Err(ShowTypeError::protocol(format!("Malformed header: {:?}", line)));
            };
            if name.trim().eq_ignore_ascii_case("content-length") {
                let length = value.trim().parse::<usize>().map_err(|e| {
                    ShowTypeError::protocol(format!("Invalid Content-Length value: {}", e))
                })?;
                content_length = Some(length);
            }
        }

        let length = content_length
            .ok_or_else(|| ShowTypeError::protocol("Missing Content-Length header"))?;
        if length > MAX_CONTENT_LENGTH {
            return Err(ShowTypeError::protocol(format!(
                "Content-Length {} exceeds limit of {} bytes",
                length, MAX_CONTENT_LENGTH
            )));
        }
        let mut body = vec![0u8; length];
        self.inner.read_exact(&mut body).await?;
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// A running language server and the plumbing to talk to it.
pub struct ServerConnection {
    command: String,
    child: Mutex<Child>,
    stdin: Arc<Mutex<ChildStdin>>,
    router: Arc<ResponseRouter>,
    next_request_id: AtomicI64,
    _reader: ReaderTaskHandle,
}

impl std::fmt::Debug for ServerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConnection")
            .field("command", &self.command)
            .field("next_request_id", &self.next_request_id.load(Ordering::SeqCst))
            .field("pending", &self.router.pending_count())
            .finish()
    }
}

impl ServerConnection {
    /// Spawn `command` with `args` and start reading its stdout.
    pub async fn spawn(command: &str, args: &[String]) -> ShowTypeResult<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ShowTypeError::spawn(command, e))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ShowTypeError::protocol(format!("Failed to obtain stdin for {}", command)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ShowTypeError::protocol(format!("Failed to obtain stdout for {}", command)))?;

        let stdin = Arc::new(Mutex::new(stdin));
        let router = Arc::new(ResponseRouter::new());
        let reader = spawn_reader_task(MessageReader::new(stdout), router.clone(), stdin.clone());

        log::debug!(target: "showtype::lsp", "Spawned language server '{}'", command);

        Ok(Self {
            command: command.to_string(),
            child: Mutex::new(child),
            stdin,
            router,
            next_request_id: AtomicI64::new(1),
            _reader: reader,
        })
    }

    /// Send a request and wait up to `timeout` for its result.
    ///
    /// A JSON-RPC error object becomes [`ShowTypeError::Remote`].
    pub async fn request(&self, method: &str, params: Value, timeout: Duration) -> ShowTypeResult<Value> {
        let id = RequestId::new(self.next_request_id.fetch_add(1, Ordering::SeqCst));
        let rx = self.router.register(id)?;

        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id.as_i64(),
            "method": method,
            "params": params
        });
        if let Err(e) = self.write(&request).await {
            self.router.remove(id);
            return Err(e);
        }

        let response = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(ShowTypeError::ConnectionClosed),
            Err(_) => {
                self.router.remove(id);
                return Err(ShowTypeError::timeout(method, duration_millis(timeout)));
            }
        };

        if let Some(error) = response.get("error") {
            return Err(ShowTypeError::from_rpc_error(error));
        }
        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Send a notification.
    pub async fn notify(&self, method: &str, params: Value) -> ShowTypeResult<()> {
        let notification = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params
        });
        self.write(&notification).await
    }

    async fn write(&self, message: &Value) -> ShowTypeResult<()> {
        let mut stdin = self.stdin.lock().await;
        write_message(&mut *stdin, message).await
    }

    /// Wait up to `timeout` for the process to exit, killing it otherwise.
    pub async fn wait_for_exit(&self, timeout: Duration) -> ShowTypeResult<()> {
        let mut child = self.child.lock().await;
        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(status) => {
                log::debug!(target: "showtype::lsp", "'{}' exited: {}", self.command, status?);
                Ok(())
            }
            Err(_) => {
                log::warn!(target: "showtype::lsp", "'{}' did not exit, killing it", self.command);
                child.kill().await?;
                Ok(())
            }
        }
    }
}
