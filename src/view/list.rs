// file: src/view/list.rs
// description: archive list rendering: loading placeholders, empty state, cards, filter chips

use crate::models::{Document, Tag};
use crate::view::card::DocumentCard;
use colored::Colorize;

pub const EMPTY_TITLE: &str = "No documents found";
pub const EMPTY_HINT: &str = "Try changing the filter or search term.";

/// Label of the active chip when no filter is set.
pub const ALL_FILTER: &str = "all";

#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    /// Fixed count, unrelated to how many results will arrive.
    Loading { placeholders: usize },
    Empty,
    Cards(Vec<DocumentCard>),
}

impl ListView {
    pub fn build(loading: bool, documents: &[Document], placeholders: usize) -> Self {
        if loading {
            Self::Loading { placeholders }
        } else if documents.is_empty() {
            Self::Empty
        } else {
            Self::Cards(documents.iter().map(DocumentCard::from).collect())
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Loading { placeholders } => {
                let mut out = String::new();
                for _ in 0..*placeholders {
                    out.push_str(&format!("{}\n", "░░░░░░░░░░░░░░░░░░░░".dimmed()));
                }
                out
            }
            Self::Empty => format!("{}\n{}\n", EMPTY_TITLE.bold(), EMPTY_HINT.dimmed()),
            Self::Cards(cards) => cards
                .iter()
                .map(DocumentCard::render)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub name: String,
    pub active: bool,
}

pub fn filter_chips(tags: &[Tag], active_filter: &str) -> Vec<FilterChip> {
    tags.iter()
        .map(|tag| FilterChip {
            name: tag.name.clone(),
            active: tag.name == active_filter,
        })
        .collect()
}

pub fn render_chips(chips: &[FilterChip]) -> String {
    chips
        .iter()
        .map(|chip| {
            if chip.active {
                format!("[{}]", chip.name).reversed().to_string()
            } else {
                format!("({})", chip.name)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentId;

    fn document(id: &str) -> Document {
        Document {
            id: Some(DocumentId::new(id)),
            title: format!("doc {id}"),
            content: String::new(),
            file_name: "f.pdf".to_string(),
            file_size: 10,
            file_path: String::new(),
            performers: vec![],
            tags: vec![],
            expiry_date: None,
            created_by: String::new(),
            is_blocked: false,
        }
    }

    #[test]
    fn test_loading_shows_fixed_placeholders() {
        let view = ListView::build(true, &[document("1")], 8);
        assert_eq!(view, ListView::Loading { placeholders: 8 });
        assert_eq!(view.render().lines().count(), 8);
    }

    #[test]
    fn test_empty_state() {
        colored::control::set_override(false);
        let view = ListView::build(false, &[], 8);
        assert_eq!(view, ListView::Empty);
        assert_eq!(
            view.render(),
            "No documents found\nTry changing the filter or search term.\n"
        );
    }

    #[test]
    fn test_cards_in_order() {
        let view = ListView::build(false, &[document("1"), document("2")], 8);
        match view {
            ListView::Cards(cards) => {
                let titles: Vec<_> = cards.iter().map(|c| c.title.as_str()).collect();
                assert_eq!(titles, vec!["doc 1", "doc 2"]);
            }
            other => panic!("expected cards, got {other:?}"),
        }
    }

    #[test]
    fn test_chip_matching_active_filter() {
        let tags = vec![Tag::new("1", "all"), Tag::new("2", "hr")];
        let chips = filter_chips(&tags, ALL_FILTER);
        assert!(chips[0].active);
        assert!(!chips[1].active);
    }
}
