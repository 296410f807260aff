//! New file content for a submission.
//!
//! Replacement content is used as-is. Otherwise the description is appended
//! to the existing file inside a comment, after every sequence that could
//! open or close that comment has been broken up.

use crate::submission::types::Submission;

/// A delimiter and the inert text it is rewritten to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    pub sequence: &'static str,
    pub neutralized: &'static str,
}

/// Comment syntax of a content format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    pub open: &'static str,
    pub close: &'static str,
    /// Every sequence user text must not contain.
    pub delimiters: &'static [Delimiter],
}

/// HTML comments, as rendered inside Markdown pages.
/// `--!>` also terminates an HTML comment, so it is broken up as well.
pub const HTML_COMMENT: CommentSyntax = CommentSyntax {
    open: "<!--",
    close: "-->",
    delimiters: &[
        Delimiter { sequence: "-->", neutralized: "-- >" },
        Delimiter { sequence: "--!>", neutralized: "--! >" },
        Delimiter { sequence: "<!--", neutralized: "<! --" },
    ],
};

impl CommentSyntax {
    /// Rewrite `text` until none of the delimiters occur in it.
    pub fn escape(&self, text: &str) -> String {
        let mut escaped = text.to_string();
        loop {
            let mut changed = false;
            for d in self.delimiters {
                if escaped.contains(d.sequence) {
                    escaped = escaped.replace(d.sequence, d.neutralized);
                    changed = true;
                }
            }
            if !changed {
                return escaped;
            }
        }
    }

    /// Wrap already-escaped text in a comment.
    pub fn wrap(&self, body: &str) -> String {
        format!("{} {} {}", self.open, body, self.close)
    }
}

/// Trailing annotation appended for a description-only submission.
pub fn annotation(description: &str, syntax: &CommentSyntax) -> String {
    let body = format!("Suggested edit: {}", syntax.escape(description));
    format!("\n\n{}", syntax.wrap(&body))
}

/// Compose the content to write for `submission` given the current file text.
pub fn compose_content(submission: &Submission, existing: &str) -> String {
    match &submission.content {
        Some(content) => content.clone(),
        None => {
            let mut composed = String::with_capacity(existing.len() + submission.description.len() + 32);
            composed.push_str(existing);
            composed.push_str(&annotation(&submission.description, &HTML_COMMENT));
            composed
        }
    }
}
