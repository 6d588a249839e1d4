//! JSON-RPC request ID type for language server communication.

/// JSON-RPC request ID.
///
/// LSP allows numeric or string IDs; only numeric ones are generated here, so
/// responses with string IDs never match a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RequestId(i64);

impl RequestId {
    #[inline]
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }

    /// Extract the numeric "id" field of a JSON-RPC message, if any.
    pub(crate) fn from_json(message: &serde_json::Value) -> Option<Self> {
        message.get("id")?.as_i64().map(Self)
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
