use super::{CancelToken, DocumentApi};
use crate::error::{ArchiveError, Result};
use crate::models::{Document, DocumentId, DocumentPayload, OcrExtraction, SelectedFile, Tag};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List {
        filter: Option<String>,
        search: Option<String>,
    },
    ListTags,
    GetById(String),
    Create(DocumentPayload),
    Update(String, DocumentPayload),
    Ocr(String),
    Delete(String),
}

/// In-memory `DocumentApi` that records every call.
#[derive(Default)]
pub struct FakeApi {
    pub documents: Mutex<HashMap<String, Document>>,
    pub tags: Mutex<Vec<Tag>>,
    pub calls: Mutex<Vec<Call>>,
    pub ocr_result: Mutex<Option<OcrExtraction>>,
    pub fail_mutations_with: Mutex<Option<(u16, String)>>,
    /// Per-call latency for list requests, consumed front to back.
    pub list_delays: Mutex<Vec<Duration>>,
    pub ocr_delay: Mutex<Option<Duration>>,
    next_id: AtomicUsize,
}

impl FakeApi {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        let fake = Self::default();
        {
            let mut store = fake.documents.lock().unwrap();
            for doc in documents {
                let id = doc.id.clone().expect("seed documents need ids");
                store.insert(id.to_string(), doc);
            }
        }
        fake
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn mutation_failure(&self) -> Option<ArchiveError> {
        self.fail_mutations_with
            .lock()
            .unwrap()
            .clone()
            .map(|(status, message)| ArchiveError::status(status, message))
    }

    fn store(&self, id: String, payload: &DocumentPayload) -> Document {
        let document = Document {
            id: Some(DocumentId::new(id.clone())),
            title: payload.title.clone(),
            content: payload.content.clone().unwrap_or_default(),
            file_name: payload.file_name.clone(),
            file_size: payload.file_size,
            file_path: payload.file_path.clone().unwrap_or_default(),
            performers: payload.performers.clone(),
            tags: payload.tags.clone(),
            expiry_date: crate::models::parse_expiry_date(&payload.expiry_date),
            created_by: payload.created_by.clone(),
            is_blocked: payload.is_blocked,
        };
        self.documents.lock().unwrap().insert(id, document.clone());
        document
    }
}

#[async_trait]
impl DocumentApi for FakeApi {
    async fn list(
        &self,
        filter: Option<&str>,
        search: Option<&str>,
        cancel: &CancelToken,
    ) -> Vec<Document> {
        self.record(Call::List {
            filter: filter.map(str::to_string),
            search: search.map(str::to_string),
        });

        let delay = {
            let mut delays = self.list_delays.lock().unwrap();
            if delays.is_empty() { None } else { Some(delays.remove(0)) }
        };

        let lookup = async {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let mut matching: Vec<Document> = self
                .documents
                .lock()
                .unwrap()
                .values()
                .filter(|d| filter.is_none_or(|f| f.is_empty() || d.tags.iter().any(|t| t == f)))
                .filter(|d| search.is_none_or(|s| d.title.contains(s) || d.content.contains(s)))
                .cloned()
                .collect();
            matching.sort_by(|a, b| a.title.cmp(&b.title));
            Ok(matching)
        };

        cancel.guard(lookup).await.unwrap_or_default()
    }

    async fn list_tags(&self, _cancel: &CancelToken) -> Vec<Tag> {
        self.record(Call::ListTags);
        self.tags.lock().unwrap().clone()
    }

    async fn get_by_id(&self, id: &str, _cancel: &CancelToken) -> Option<Document> {
        self.record(Call::GetById(id.to_string()));
        self.documents.lock().unwrap().get(id).cloned()
    }

    async fn create(&self, payload: &DocumentPayload, _cancel: &CancelToken) -> Result<Document> {
        self.record(Call::Create(payload.clone()));
        if let Some(err) = self.mutation_failure() {
            return Err(err);
        }
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(self.store(id, payload))
    }

    async fn update(
        &self,
        id: &str,
        payload: &DocumentPayload,
        _cancel: &CancelToken,
    ) -> Result<Document> {
        self.record(Call::Update(id.to_string(), payload.clone()));
        if let Some(err) = self.mutation_failure() {
            return Err(err);
        }
        Ok(self.store(id.to_string(), payload))
    }

    async fn ocr_extract(
        &self,
        file: &SelectedFile,
        cancel: &CancelToken,
    ) -> Result<OcrExtraction> {
        self.record(Call::Ocr(file.name.clone()));
        let delay = *self.ocr_delay.lock().unwrap();
        let result = self.ocr_result.lock().unwrap().clone();

        cancel
            .guard(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result.ok_or_else(|| {
                    ArchiveError::status(500, "OCR request failed with status: 500")
                })
            })
            .await
    }

    async fn delete_by_id(&self, id: &str, _cancel: &CancelToken) -> Result<()> {
        self.record(Call::Delete(id.to_string()));
        if let Some(err) = self.mutation_failure() {
            return Err(err);
        }
        self.documents
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ArchiveError::status(404, "Delete request failed with status: 404"))
    }
}
