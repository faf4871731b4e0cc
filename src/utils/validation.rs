// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{ArchiveError, Result};
use crate::models::parse_expiry_date;

pub struct Validator;

impl Validator {
    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ArchiveError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// Collects the names of all blank fields into one error.
    pub fn validate_required<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<()> {
        let missing: Vec<&str> = fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ArchiveError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub fn validate_expiry_date(value: &str) -> Result<()> {
        parse_expiry_date(value).map(|_| ()).ok_or_else(|| {
            ArchiveError::Validation(format!(
                "Invalid expiry date (expected YYYY-MM-DD): {}",
                value
            ))
        })
    }

    pub fn validate_document_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(ArchiveError::Validation(
                "Document id cannot be empty".to_string(),
            ));
        }

        if id.contains('/') || id.contains('?') || id.contains('#') {
            return Err(ArchiveError::Validation(format!(
                "Document id contains reserved characters: {}",
                id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://example.com").is_ok());
        assert!(Validator::validate_url("http://localhost:5000").is_ok());
        assert!(Validator::validate_url("localhost:5000").is_err());
        assert!(Validator::validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_required_lists_every_blank_field() {
        let err = Validator::validate_required([("title", "x"), ("tags", "  "), ("performers", "")])
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required fields: tags, performers"
        );
        assert!(Validator::validate_required([("title", "x")]).is_ok());
    }

    #[test]
    fn test_validate_expiry_date() {
        assert!(Validator::validate_expiry_date("2025-01-31").is_ok());
        assert!(Validator::validate_expiry_date("2025-02-31").is_err());
        assert!(Validator::validate_expiry_date("tomorrow").is_err());
    }

    #[test]
    fn test_validate_document_id() {
        assert!(Validator::validate_document_id("665f1c2e9b1d").is_ok());
        assert!(Validator::validate_document_id("").is_err());
        assert!(Validator::validate_document_id("../etc").is_err());
    }
}
