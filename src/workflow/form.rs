// file: src/workflow/form.rs
// description: create/edit session: file selection, OCR, field editing, submit and delete
// reference: async state machine over the document API seam

use crate::api::{CancelToken, DocumentApi};
use crate::error::{ArchiveError, Result};
use crate::models::{Document, DocumentId, DocumentPayload, SelectedFile};
use crate::routes::Route;
use crate::utils::{Validator, join_list, split_list};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    SelectingFile,
    OcrPending,
    OcrDone,
    OcrFailed,
    Editing,
    Submitting,
    SubmitFailed,
    NavigatedAway,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormTab {
    #[default]
    Main,
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Tags,
    Performers,
    CreatedBy,
    FileName,
    ExpiryDate,
}

impl FormField {
    /// Every field must be non-blank before a submission is attempted.
    pub const REQUIRED: [FormField; 6] = [
        FormField::Performers,
        FormField::CreatedBy,
        FormField::FileName,
        FormField::ExpiryDate,
        FormField::Tags,
        FormField::Title,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Tags => "tags",
            Self::Performers => "performers",
            Self::CreatedBy => "created_by",
            Self::FileName => "fileName",
            Self::ExpiryDate => "expiryDate",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FormField {
    type Err = ArchiveError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "title" => Ok(Self::Title),
            "tags" => Ok(Self::Tags),
            "performers" => Ok(Self::Performers),
            "created_by" => Ok(Self::CreatedBy),
            "fileName" => Ok(Self::FileName),
            "expiryDate" => Ok(Self::ExpiryDate),
            other => Err(ArchiveError::Validation(format!("Unknown form field: {}", other))),
        }
    }
}

/// Field values as the user edits them. Tags and performers stay
/// comma-joined text until submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDraft {
    pub title: String,
    pub tags: String,
    pub performers: String,
    pub created_by: String,
    pub file_name: String,
    pub file_size: u64,
    pub expiry_date: String,
    pub is_blocked: bool,
}

impl FormDraft {
    pub fn from_document(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            tags: join_list(&document.tags),
            performers: join_list(&document.performers),
            created_by: document.created_by.clone(),
            file_name: document.file_name.clone(),
            file_size: document.file_size,
            expiry_date: document
                .expiry_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            is_blocked: document.is_blocked,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Tags => &self.tags,
            FormField::Performers => &self.performers,
            FormField::CreatedBy => &self.created_by,
            FormField::FileName => &self.file_name,
            FormField::ExpiryDate => &self.expiry_date,
        }
    }

    fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Title => self.title = value,
            FormField::Tags => self.tags = value,
            FormField::Performers => self.performers = value,
            FormField::CreatedBy => self.created_by = value,
            FormField::FileName => self.file_name = value,
            FormField::ExpiryDate => self.expiry_date = value,
        }
    }

    fn validate(&self) -> Result<()> {
        Validator::validate_required(
            FormField::REQUIRED
                .iter()
                .map(|field| (field.name(), self.get(*field))),
        )?;
        Validator::validate_expiry_date(&self.expiry_date)
    }

    pub fn to_payload(&self, content: Option<String>, file_path: Option<String>) -> DocumentPayload {
        DocumentPayload {
            title: self.title.clone(),
            tags: split_list(&self.tags),
            performers: split_list(&self.performers),
            created_by: self.created_by.clone(),
            file_name: self.file_name.clone(),
            file_size: self.file_size,
            expiry_date: self.expiry_date.trim().to_string(),
            is_blocked: self.is_blocked,
            file_path,
            content,
        }
    }
}

/// One create or edit session. The cancel token is armed on construction and
/// fired when the session ends (navigation or drop); every request issued by
/// the session observes it.
pub struct DocumentForm<A: DocumentApi + ?Sized> {
    api: Arc<A>,
    document_id: Option<DocumentId>,
    draft: FormDraft,
    phase: FormPhase,
    tab: FormTab,
    file: Option<SelectedFile>,
    preview: Option<String>,
    ocr_text: Option<String>,
    file_path: Option<String>,
    last_error: Option<String>,
    cancel: CancelToken,
}

impl<A: DocumentApi + ?Sized> DocumentForm<A> {
    pub fn create(api: Arc<A>) -> Self {
        Self::with_token(api, None, CancelToken::new())
    }

    pub fn edit(api: Arc<A>, document: &Document) -> Self {
        Self::with_token(api, Some(document), CancelToken::new())
    }

    /// Loads `/documents/edit/:id`. A missing document is `ArchiveError::NotFound`.
    pub async fn open_edit(api: Arc<A>, id: &str) -> Result<Self> {
        Validator::validate_document_id(id)?;

        let cancel = CancelToken::new();
        match api.get_by_id(id, &cancel).await {
            Some(document) => Ok(Self::with_token(api, Some(&document), cancel)),
            None => Err(ArchiveError::NotFound(id.to_string())),
        }
    }

    fn with_token(api: Arc<A>, document: Option<&Document>, cancel: CancelToken) -> Self {
        Self {
            api,
            document_id: document.and_then(|d| d.id.clone()),
            draft: document.map(FormDraft::from_document).unwrap_or_default(),
            phase: FormPhase::Idle,
            tab: FormTab::Main,
            file: None,
            preview: None,
            ocr_text: document.map(|d| d.content.clone()).filter(|c| !c.is_empty()),
            file_path: document.map(|d| d.file_path.clone()).filter(|p| !p.is_empty()),
            last_error: None,
            cancel,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn document_id(&self) -> Option<&DocumentId> {
        self.document_id.as_ref()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.document_id.is_some()
    }

    pub fn is_ocr_working(&self) -> bool {
        self.phase == FormPhase::OcrPending
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn ocr_text(&self) -> Option<&str> {
        self.ocr_text.as_deref()
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn tab(&self) -> FormTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: FormTab) {
        self.tab = tab;
    }

    pub fn cancel_handle(&self) -> CancelToken {
        self.cancel.clone()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.phase == FormPhase::NavigatedAway {
            Err(ArchiveError::SessionClosed)
        } else {
            Ok(())
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.draft.set(field, value.into());
        self.phase = FormPhase::Editing;
        Ok(())
    }

    pub fn toggle_blocked(&mut self) -> Result<()> {
        self.ensure_open()?;
        self.draft.is_blocked = !self.draft.is_blocked;
        self.phase = FormPhase::Editing;
        Ok(())
    }

    /// Captures name and size, builds an image preview, then sends the file to
    /// OCR regardless of its type. An OCR failure is logged and leaves the
    /// form usable; only a closed session is an error here.
    pub async fn select_file(&mut self, file: SelectedFile) -> Result<()> {
        self.ensure_open()?;
        self.phase = FormPhase::SelectingFile;

        self.draft.file_name = file.name.clone();
        self.draft.file_size = file.size;
        self.preview = file.preview_data_url();

        self.phase = FormPhase::OcrPending;
        debug!("Sending {} for OCR", file.name);
        let outcome = self.api.ocr_extract(&file, &self.cancel).await;
        self.file = Some(file);

        match outcome {
            Ok(extraction) => {
                info!(
                    "OCR extracted {} characters",
                    extraction.content.chars().count()
                );
                self.ocr_text = Some(extraction.content);
                self.file_path = Some(extraction.file_path);
                self.phase = FormPhase::OcrDone;
            }
            Err(e) if e.is_cancelled() => {
                debug!("OCR request cancelled");
                self.phase = FormPhase::OcrFailed;
            }
            Err(e) => {
                error!("Error processing file for OCR: {}", e);
                self.phase = FormPhase::OcrFailed;
            }
        }

        Ok(())
    }

    /// Creates or updates depending on whether the session has an id. On
    /// success the session ends and the archive route is returned; on failure
    /// the message is kept in `last_error` and the form stays open.
    pub async fn submit(&mut self) -> Result<Route> {
        self.ensure_open()?;

        if let Err(e) = self.draft.validate() {
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        self.phase = FormPhase::Submitting;
        self.last_error = None;

        let payload = self
            .draft
            .to_payload(self.ocr_text.clone(), self.file_path.clone());

        let result = match &self.document_id {
            Some(id) => self.api.update(id.as_str(), &payload, &self.cancel).await,
            None => self.api.create(&payload, &self.cancel).await,
        };

        match result {
            Ok(saved) => {
                if self.document_id.is_none() {
                    self.document_id = saved.id;
                }
                Ok(self.end_session())
            }
            Err(e) => {
                error!("Error saving document: {}", e);
                self.last_error = Some(format!("Failed to save document: {}", e));
                self.phase = FormPhase::SubmitFailed;
                Err(e)
            }
        }
    }

    /// An unsaved document has nothing to delete; the session just ends.
    pub async fn delete(&mut self) -> Result<Route> {
        self.ensure_open()?;

        let Some(id) = self.document_id.clone() else {
            return Ok(self.end_session());
        };

        match self.api.delete_by_id(id.as_str(), &self.cancel).await {
            Ok(()) => Ok(self.end_session()),
            Err(e) => {
                error!("Error deleting document: {}", e);
                self.last_error = Some(format!("Failed to delete document: {}", e));
                Err(e)
            }
        }
    }

    /// Back navigation without saving.
    pub fn close(&mut self) -> Route {
        self.end_session()
    }

    fn end_session(&mut self) -> Route {
        self.phase = FormPhase::NavigatedAway;
        self.cancel.cancel();
        Route::archive()
    }
}

impl<A: DocumentApi + ?Sized> Drop for DocumentForm<A> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
