//! LSP client session used to answer type queries.

use std::time::Duration;

use serde_json::{Value, json};
use tower_lsp_server::ls_types::{ExecuteCommandParams, Uri};

use super::connection::ServerConnection;
use crate::config::ServerSettings;
use crate::document::TextDocument;
use crate::error::ShowTypeResult;
use crate::query::TypeQuery;
use crate::resolver::TypeCandidate;
use crate::service::{TypeService, parse_candidates};

/// How long to wait for the server to exit after `exit`.
const EXIT_GRACE: Duration = Duration::from_secs(2);

/// An initialized LSP session with a language server.
#[derive(Debug)]
pub struct LanguageServerClient {
    connection: ServerConnection,
    timeout: Duration,
}

impl LanguageServerClient {
    /// Spawn the configured server and complete the initialize handshake.
    pub async fn start(settings: &ServerSettings, root_uri: Option<&Uri>) -> ShowTypeResult<Self> {
        let connection = ServerConnection::spawn(&settings.command, &settings.args).await?;
        let client = Self {
            connection,
            timeout: Duration::from_millis(settings.request_timeout_ms),
        };
        client.initialize(root_uri).await?;
        Ok(client)
    }

    async fn initialize(&self, root_uri: Option<&Uri>) -> ShowTypeResult<Value> {
        let params = json!({
            "processId": std::process::id(),
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION")
            },
            "rootUri": root_uri.map(|uri| uri.as_str()),
            "capabilities": {}
        });
        let result = self
            .connection
            .request("initialize", params, self.timeout)
            .await?;
        self.connection.notify("initialized", json!({})).await?;
        log::info!(
            target: "showtype::lsp",
            "Language server initialized: {}",
            result
                .pointer("/serverInfo/name")
                .and_then(|n| n.as_str())
                .unwrap_or("<unnamed>")
        );
        Ok(result)
    }

    /// Tell the server about an open document.
    pub async fn did_open(&self, document: &TextDocument) -> ShowTypeResult<()> {
        self.connection
            .notify(
                "textDocument/didOpen",
                json!({
                    "textDocument": {
                        "uri": document.uri().as_str(),
                        "languageId": document.language_id(),
                        "version": 1,
                        "text": document.text()
                    }
                }),
            )
            .await
    }

    /// Send `workspace/executeCommand` and return the raw result.
    pub async fn execute_command(&self, params: ExecuteCommandParams) -> ShowTypeResult<Value> {
        let params = serde_json::to_value(params)?;
        self.connection
            .request("workspace/executeCommand", params, self.timeout)
            .await
    }

    /// Run the shutdown/exit sequence and wait for the process to go away.
    pub async fn shutdown(self) -> ShowTypeResult<()> {
        self.connection
            .request("shutdown", Value::Null, self.timeout)
            .await?;
        self.connection.notify("exit", Value::Null).await?;
        self.connection.wait_for_exit(EXIT_GRACE).await
    }
}

impl TypeService for LanguageServerClient {
    async fn query_types(
        &self,
        command: &str,
        query: &TypeQuery,
    ) -> ShowTypeResult<Vec<TypeCandidate>> {
        let result = self.execute_command(query.to_execute_command(command)).await?;
        parse_candidates(result)
    }
}
