// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod utils;
pub mod view;
pub mod workflow;

pub use api::{CancelToken, DocumentApi, HttpDocumentClient};
pub use config::{ApiConfig, ArchiveConfig, Config};
pub use error::{ArchiveError, Result};
pub use models::{Document, DocumentId, DocumentPayload, OcrExtraction, SelectedFile, Tag};
pub use routes::{ArchiveQuery, Route};
pub use utils::{ActivitySpinner, Validator};
pub use view::{DocumentCard, FilterChip, ListView};
pub use workflow::{
    ArchiveSnapshot, DebounceOutcome, DebounceTicket, Debouncer, DocumentArchive, DocumentForm,
    FormDraft, FormField, FormPhase, FormTab, RequestFence,
};
