//! Letter generation — one draft in, one letter out.
//!
//! Flow: check_draft → LetterRequest → build_messages → completion call.
//! A single attempt is made; completion failures are returned to the caller.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::letter::prompts::build_messages;
use crate::letter::validation::{check_draft, FieldIssue};
use crate::letter::{download_file_name, LetterDraft, LetterRequest};
use crate::llm_client::CompletionService;

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedLetter {
    /// Completion text, used verbatim.
    pub letter: String,
    /// Advisory issues found on the draft; informational only.
    pub warnings: Vec<FieldIssue>,
    /// Suggested name for the PDF download.
    pub file_name: String,
}

/// Validates `draft` and asks the completion service for a letter.
///
/// Blocking issues fail with `AppError::Validation` before any external call.
pub async fn generate_letter(
    llm: &dyn CompletionService,
    draft: &LetterDraft,
) -> Result<GeneratedLetter, AppError> {
    let warnings = check_draft(draft).warnings;
    let request = LetterRequest::from_draft(draft).map_err(AppError::Validation)?;

    if !warnings.is_empty() {
        info!(
            warnings = warnings.len(),
            "Generating letter despite advisory warnings"
        );
    }

    let messages = build_messages(&request);
    info!(
        company = request.company_name(),
        role = request.role_title(),
        "Requesting cover letter"
    );
    let letter = llm.complete(&messages).await?;
    info!(chars = letter.len(), "Cover letter generated");

    Ok(GeneratedLetter {
        letter,
        warnings,
        file_name: download_file_name(request.company_name()),
    })
}
