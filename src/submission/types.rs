//! Submission payloads.

use serde::{Deserialize, Serialize};

/// JSON body posted by the edit form. Every field is optional at this stage
/// so that absence is reported by validation rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SubmissionRequest {
    pub file: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub name: Option<String>,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Repository-relative path of the file to change.
    pub file_path: String,
    pub description: String,
    /// Full replacement content. `None` means "annotate the existing file".
    pub content: Option<String>,
    /// Display name of the contributor, if given.
    pub submitter_name: Option<String>,
}

impl Submission {
    /// Name shown in the pull request body.
    pub fn display_name(&self) -> &str {
        self.submitter_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or("Anonymous Contributor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_body() {
        let req: SubmissionRequest =
            serde_json::from_str(r#"{"file":"Characters/Bob.md","content":null}"#).unwrap();
        assert_eq!(req.file.as_deref(), Some("Characters/Bob.md"));
        assert!(req.description.is_none());
        assert!(req.content.is_none());
    }

    #[test]
    fn test_display_name() {
        let mut submission = Submission {
            file_path: "Characters/Bob.md".into(),
            description: "Fix typo".into(),
            content: None,
            submitter_name: None,
        };
        assert_eq!(submission.display_name(), "Anonymous Contributor");

        submission.submitter_name = Some("   ".into());
        assert_eq!(submission.display_name(), "Anonymous Contributor");

        submission.submitter_name = Some(" Ada ".into());
        assert_eq!(submission.display_name(), "Ada");
    }
}
