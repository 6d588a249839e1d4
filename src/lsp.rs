pub mod client;
pub mod connection;
mod reader;
mod request_id;
mod response_router;

pub use client::LanguageServerClient;
pub use connection::ServerConnection;
