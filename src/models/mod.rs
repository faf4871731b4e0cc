// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod document;
pub mod file;
pub mod tag;

pub use document::{Document, DocumentId, DocumentPayload, parse_expiry_date};
pub use file::{OcrExtraction, SelectedFile, mime_for_name};
pub use tag::Tag;
