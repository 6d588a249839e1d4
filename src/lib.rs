//! Show the type of the selected Haskell expression.
//!
//! The library is host-agnostic: a host supplies the active [`Editor`], a
//! [`TypeDisplay`] surface, and a [`TypeService`] that answers type queries.
//! [`lsp::LanguageServerClient`] is a ready-made service backed by a
//! language server speaking LSP over stdio.

pub mod cache;
pub mod config;
pub mod display;
pub mod document;
pub mod editor;
pub mod error;
pub mod gate;
pub mod inspector;
pub mod lsp;
pub mod query;
pub mod range;
pub mod resolver;
pub mod service;
pub mod session;

pub use cache::LastResultCache;
pub use config::{Settings, ShowTypeSettings};
pub use display::{DisplayLocation, OutputChannel, TypeDisplay};
pub use document::{DocumentFilter, TextDocument};
pub use editor::Editor;
pub use error::{ShowTypeError, ShowTypeResult};
pub use inspector::TypeInspector;
pub use range::{Selection, SourceRange};
pub use resolver::{MatchKind, Resolution, TypeCandidate};
pub use service::TypeService;
