// file: src/view/mod.rs
// description: presentation of archive state for terminal output
// reference: internal module structure

pub mod card;
pub mod list;

pub use card::DocumentCard;
pub use list::{ALL_FILTER, FilterChip, ListView, filter_chips, render_chips};
