// file: src/view/card.rs
// description: per-document summary shown in the archive grid

use crate::models::Document;
use crate::routes::Route;
use crate::utils::{format_date, format_file_size, join_list};
use colored::Colorize;

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentCard {
    pub title: String,
    pub performers: String,
    pub expiry: String,
    pub tags: String,
    pub file: String,
    /// Server-side path of the uploaded file; `None` when nothing was uploaded.
    pub download: Option<String>,
    pub is_blocked: bool,
    /// `None` for records without an id, which cannot be opened for editing.
    pub edit_route: Option<Route>,
}

impl From<&Document> for DocumentCard {
    fn from(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            performers: join_list(&document.performers),
            expiry: format_date(document.expiry_date),
            tags: join_list(&document.tags),
            file: format!(
                "{} ({})",
                document.file_name,
                format_file_size(document.file_size)
            ),
            download: Some(document.file_path.clone()).filter(|p| !p.is_empty()),
            is_blocked: document.is_blocked,
            edit_route: document.id.clone().map(Route::EditDocument),
        }
    }
}

impl DocumentCard {
    pub fn render(&self) -> String {
        let lock = if self.is_blocked { " [locked]" } else { "" };
        let mut out = format!("{}{}\n", self.title.bold(), lock.red());
        out.push_str(&format!("  Performers: {}\n", self.performers));
        out.push_str(&format!("  Expires:    {}\n", self.expiry));
        out.push_str(&format!("  Tags:       {}\n", self.tags));
        out.push_str(&format!("  File:       {}\n", self.file));
        if let Some(path) = &self.download {
            out.push_str(&format!("  Download:   {}\n", path.underline()));
        }
        if let Some(route) = &self.edit_route {
            out.push_str(&format!("  Edit:       {}\n", route.to_string().dimmed()));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentId;
    use chrono::NaiveDate;

    #[test]
    fn test_card_from_document() {
        let document = Document {
            id: Some(DocumentId::new("42")),
            title: "Lease".to_string(),
            content: String::new(),
            file_name: "lease.pdf".to_string(),
            file_size: 1536,
            file_path: "uploads/lease.pdf".to_string(),
            performers: vec!["Alice".to_string(), "Bob".to_string()],
            tags: vec!["contracts".to_string()],
            expiry_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            created_by: "clerk".to_string(),
            is_blocked: true,
        };

        let card = DocumentCard::from(&document);
        assert_eq!(card.performers, "Alice, Bob");
        assert_eq!(card.expiry, "6/30/2025");
        assert_eq!(card.file, "lease.pdf (1.5 KB)");
        assert_eq!(card.download.as_deref(), Some("uploads/lease.pdf"));
        assert_eq!(
            card.edit_route.as_ref().map(|r| r.to_string()).as_deref(),
            Some("/documents/edit/42")
        );

        colored::control::set_override(false);
        let rendered = card.render();
        assert!(rendered.starts_with("Lease [locked]\n"));
        assert!(rendered.contains("Expires:    6/30/2025"));
        assert!(rendered.contains("Download:   uploads/lease.pdf"));
    }

    #[test]
    fn test_missing_expiry_renders_placeholder() {
        let document = Document {
            id: None,
            title: "Draft".to_string(),
            content: String::new(),
            file_name: String::new(),
            file_size: 0,
            file_path: String::new(),
            performers: vec![],
            tags: vec![],
            expiry_date: None,
            created_by: String::new(),
            is_blocked: false,
        };

        let card = DocumentCard::from(&document);
        assert_eq!(card.expiry, "N/A");
        assert!(card.download.is_none());
        assert!(card.edit_route.is_none());

        colored::control::set_override(false);
        assert!(!card.render().contains("Download:"));
    }
}
