// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod format;
pub mod logging;
pub mod progress;
pub mod validation;

pub use format::{format_date, format_file_size, format_kilobytes, join_list, split_list};
pub use progress::ActivitySpinner;
pub use validation::Validator;
