// file: src/api/mod.rs
// description: remote document API seam and its implementations
// reference: internal module structure

pub mod cancel;
pub mod client;
#[cfg(test)]
pub(crate) mod fake;

pub use cancel::CancelToken;
pub use client::HttpDocumentClient;

use crate::error::Result;
use crate::models::{Document, DocumentPayload, OcrExtraction, SelectedFile, Tag};
use async_trait::async_trait;

/// One network round trip per call; no retries, no caching.
///
/// Read paths never fail: a transport error, a non-success status and a
/// cancelled request all resolve to an empty list or `None`. Mutations report
/// every failure through `Err`.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    async fn list(
        &self,
        filter: Option<&str>,
        search: Option<&str>,
        cancel: &CancelToken,
    ) -> Vec<Document>;

    async fn list_tags(&self, cancel: &CancelToken) -> Vec<Tag>;

    async fn get_by_id(&self, id: &str, cancel: &CancelToken) -> Option<Document>;

    async fn create(&self, payload: &DocumentPayload, cancel: &CancelToken) -> Result<Document>;

    async fn update(
        &self,
        id: &str,
        payload: &DocumentPayload,
        cancel: &CancelToken,
    ) -> Result<Document>;

    async fn ocr_extract(&self, file: &SelectedFile, cancel: &CancelToken)
    -> Result<OcrExtraction>;

    async fn delete_by_id(&self, id: &str, cancel: &CancelToken) -> Result<()>;
}
