//! Structural and path-safety checks on incoming submissions.
//!
//! # Responsibilities
//! - Required fields and length bounds
//! - Reject traversal and absolute paths
//! - Enforce the excluded / allowed folder lists
//!
//! # Design Decisions
//! - Checks run in a fixed order and stop at the first failure
//! - The excluded list is consulted before the allowed list
//! - Pure function of input and static configuration

use thiserror::Error;

use crate::config::SubmissionConfig;
use crate::submission::types::{Submission, SubmissionRequest};

/// Validation failure. `Display` is the message returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Description too long")]
    DescriptionTooLong { max: usize },

    #[error("Content too long")]
    ContentTooLong { max: usize },

    #[error("Invalid file path")]
    InvalidPath,

    #[error("This path cannot be edited")]
    PathExcluded,

    #[error("This path is not editable")]
    PathNotAllowed,

    #[error("Invalid request body")]
    InvalidBody,
}

impl ValidationError {
    /// Stable machine-readable reason, used for logs and metric labels.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MissingFields => "missing-fields",
            Self::DescriptionTooLong { .. } => "description-too-long",
            Self::ContentTooLong { .. } => "content-too-long",
            Self::InvalidPath => "invalid-path",
            Self::PathExcluded | Self::PathNotAllowed => "path-not-editable",
            Self::InvalidBody => "invalid-body",
        }
    }
}

/// Validator bound to the configured folder lists and limits.
#[derive(Debug, Clone)]
pub struct SubmissionValidator {
    config: SubmissionConfig,
}

impl SubmissionValidator {
    pub fn new(config: SubmissionConfig) -> Self {
        Self { config }
    }

    /// Validate a decoded body and produce a [`Submission`].
    pub fn validate(&self, raw: SubmissionRequest) -> Result<Submission, ValidationError> {
        let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());

        let (file_path, description) =
            match (non_empty(raw.file), non_empty(raw.description)) {
                (Some(f), Some(d)) => (f, d),
                _ => return Err(ValidationError::MissingFields),
            };
        let content = non_empty(raw.content);

        if description.chars().count() > self.config.max_description_length {
            return Err(ValidationError::DescriptionTooLong {
                max: self.config.max_description_length,
            });
        }

        if let Some(content) = &content {
            if content.chars().count() > self.config.max_content_length {
                return Err(ValidationError::ContentTooLong {
                    max: self.config.max_content_length,
                });
            }
        }

        self.check_path(&file_path)?;

        Ok(Submission {
            file_path,
            description,
            content,
            submitter_name: raw.name,
        })
    }

    /// Path rules alone: traversal, then excluded, then allowed.
    pub fn check_path(&self, path: &str) -> Result<(), ValidationError> {
        if is_unsafe_path(path) {
            return Err(ValidationError::InvalidPath);
        }

        if self.config.excluded_paths.iter().any(|p| is_under(path, p)) {
            return Err(ValidationError::PathExcluded);
        }

        if !self.config.allowed_paths.iter().any(|p| is_under(path, p)) {
            return Err(ValidationError::PathNotAllowed);
        }

        Ok(())
    }
}

/// Paths that cannot name a single repository file: absolute, trailing
/// separator, or any empty, `.` or `..` segment.
fn is_unsafe_path(path: &str) -> bool {
    path.split(['/', '\\'])
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
}

/// `path` equals `folder` or lies beneath it.
fn is_under(path: &str, folder: &str) -> bool {
    match path.strip_prefix(folder) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> SubmissionValidator {
        SubmissionValidator::new(SubmissionConfig::default())
    }

    fn request(file: &str, description: &str) -> SubmissionRequest {
        SubmissionRequest {
            file: Some(file.to_string()),
            description: Some(description.to_string()),
            content: None,
            name: None,
        }
    }

    #[test]
    fn test_valid_submission() {
        let submission = validator()
            .validate(SubmissionRequest {
                name: Some("Ada".into()),
                ..request("Characters/Bob.md", "Fix typo")
            })
            .unwrap();
        assert_eq!(submission.file_path, "Characters/Bob.md");
        assert_eq!(submission.description, "Fix typo");
        assert!(submission.content.is_none());
        assert_eq!(submission.submitter_name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_missing_fields() {
        let v = validator();
        assert_eq!(
            v.validate(SubmissionRequest::default()),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            v.validate(request("", "Fix typo")),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            v.validate(request("Characters/Bob.md", "")),
            Err(ValidationError::MissingFields)
        );
    }

    #[test]
    fn test_length_bounds() {
        let v = validator();
        let at_limit = "é".repeat(2000);
        assert!(v.validate(request("Characters/Bob.md", &at_limit)).is_ok());

        let too_long = "x".repeat(2001);
        let err = v.validate(request("Characters/Bob.md", &too_long)).unwrap_err();
        assert_eq!(err, ValidationError::DescriptionTooLong { max: 2000 });
        assert_eq!(err.reason(), "description-too-long");

        let err = v
            .validate(SubmissionRequest {
                content: Some("x".repeat(50_001)),
                ..request("Characters/Bob.md", "Rewrite")
            })
            .unwrap_err();
        assert_eq!(err.reason(), "content-too-long");
    }

    #[test]
    fn test_empty_content_is_absent() {
        let submission = validator()
            .validate(SubmissionRequest {
                content: Some(String::new()),
                ..request("Characters/Bob.md", "Fix")
            })
            .unwrap();
        assert!(submission.content.is_none());
    }

    #[test]
    fn test_length_checked_before_path() {
        let err = validator()
            .validate(request("../etc/passwd", &"x".repeat(2001)))
            .unwrap_err();
        assert_eq!(err.reason(), "description-too-long");
    }

    #[test]
    fn test_traversal_rejected() {
        let v = validator();
        for path in [
            "../Characters/Bob.md",
            "Characters/../Journal/Secret.md",
            "Characters/..",
            "/Characters/Bob.md",
            "\\Characters\\Bob.md",
            "Characters\\..\\Journal\\Secret.md",
            "Characters/",
            "Characters//Bob.md",
            "Characters/./Bob.md",
            "Characters\\",
        ] {
            assert_eq!(v.check_path(path), Err(ValidationError::InvalidPath), "{}", path);
        }
    }

    #[test]
    fn test_excluded_wins_over_allowed() {
        let v = SubmissionValidator::new(SubmissionConfig {
            allowed_paths: vec!["Characters".into(), "Private".into()],
            excluded_paths: vec!["Private".into()],
            ..Default::default()
        });
        assert_eq!(v.check_path("Private/notes.md"), Err(ValidationError::PathExcluded));
        assert_eq!(v.check_path("Private"), Err(ValidationError::PathExcluded));
    }

    #[test]
    fn test_excluded_message() {
        let err = validator()
            .validate(request("Journal/Secret.md", "Fix typo"))
            .unwrap_err();
        assert_eq!(err.to_string(), "This path cannot be edited");
        assert_eq!(err.reason(), "path-not-editable");
    }

    #[test]
    fn test_not_allowed() {
        let v = validator();
        let err = v.check_path("Sessions/One.md").unwrap_err();
        assert_eq!(err, ValidationError::PathNotAllowed);
        assert_eq!(err.to_string(), "This path is not editable");
        assert_eq!(err.reason(), "path-not-editable");

        // Prefix match is per segment.
        assert_eq!(v.check_path("CharactersX/Bob.md"), Err(ValidationError::PathNotAllowed));
        assert_eq!(v.check_path("characters/Bob.md"), Err(ValidationError::PathNotAllowed));
        assert!(v.check_path("Locations/Harbor/Docks.md").is_ok());
        assert!(v.check_path("Assets").is_ok());
    }

    #[test]
    fn test_dots_inside_names_are_fine() {
        assert!(validator().check_path("Characters/Bob..Smith.md").is_ok());
    }
}
