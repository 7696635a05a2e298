// Cover letter pipeline: draft → checks → immutable request → prompt → completion → PDF.
// All completion calls go through llm_client::CompletionService.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod validation;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::letter::validation::{check_draft, FieldIssue};

/// What the client submits. Missing JSON fields default to empty so that a
/// partial form still gets per-field validation errors instead of a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterDraft {
    pub job_description: String,
    pub company_name: String,
    pub role_title: String,
    pub resume_text: String,
    pub full_name: Option<String>,
}

/// A draft that passed every blocking check. Fields are trimmed and read-only.
/// The display name is not part of it: it only matters to the PDF step.
#[derive(Debug, Clone, PartialEq)]
pub struct LetterRequest {
    resume_text: String,
    role_title: String,
    company_name: String,
    job_description: String,
}

impl LetterRequest {
    /// Accepts `draft` if no blocking check fails; otherwise returns the blocking issues.
    pub fn from_draft(draft: &LetterDraft) -> Result<Self, Vec<FieldIssue>> {
        let report = check_draft(draft);
        if report.is_blocked() {
            return Err(report.errors);
        }

        Ok(Self {
            resume_text: draft.resume_text.trim().to_string(),
            role_title: draft.role_title.trim().to_string(),
            company_name: draft.company_name.trim().to_string(),
            job_description: draft.job_description.trim().to_string(),
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn role_title(&self) -> &str {
        &self.role_title
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }
}

/// Download name for a rendered letter: `Cover_Letter_<Company>.pdf`.
///
/// Spaces become underscores; anything outside `[A-Za-z0-9_.-]` is dropped so
/// the name is safe inside a `Content-Disposition` header.
pub fn download_file_name(company_name: &str) -> String {
    let company: String = company_name
        .trim()
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();

    if company.is_empty() {
        "Cover_Letter.pdf".to_string()
    } else {
        format!("Cover_Letter_{company}.pdf")
    }
}

/// Bytes outside RFC 5987 `attr-char`.
const EXT_VALUE_ESCAPES: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `Content-Disposition` value for a letter download.
///
/// `filename` carries the ASCII-safe [`download_file_name`]. When the company
/// name has characters that name had to drop, `filename*` carries the full
/// name (spaces → underscores) as UTF-8.
pub fn content_disposition(company_name: &str) -> String {
    let fallback = download_file_name(company_name);
    let company = company_name.trim();
    let full = format!("Cover_Letter_{}.pdf", company.replace(' ', "_"));

    if company.is_empty() || full == fallback {
        format!("attachment; filename=\"{fallback}\"")
    } else {
        format!(
            "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
            utf8_percent_encode(&full, EXT_VALUE_ESCAPES)
        )
    }
}
