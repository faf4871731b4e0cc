// file: src/workflow/mod.rs
// description: stateful sessions driving the document API
// reference: internal module structure

pub mod archive;
pub mod debounce;
pub mod fence;
pub mod form;

pub use archive::{ArchiveSnapshot, DocumentArchive};
pub use debounce::{DebounceOutcome, DebounceTicket, Debouncer};
pub use fence::RequestFence;
pub use form::{DocumentForm, FormDraft, FormField, FormPhase, FormTab};
