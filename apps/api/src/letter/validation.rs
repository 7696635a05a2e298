//! Two-tier request checks: blocking (the request cannot proceed) and
//! advisory (shown to the user, never blocks).
//!
//! Every check lives in [`CHECKS`] with its severity, so moving a check
//! between tiers is a one-word change.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extraction::extract_role;
use crate::letter::LetterDraft;

/// The user-facing input a check is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    JobDescription,
    CompanyName,
    RoleTitle,
    ResumeText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Hard stop: no external call is made.
    Blocking,
    /// Soft warning: the request may still proceed.
    Advisory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: Field,
    pub severity: Severity,
    pub message: String,
}

/// Outcome of running every check against a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldIssue>,
    pub warnings: Vec<FieldIssue>,
}

impl ValidationReport {
    pub fn is_blocked(&self) -> bool {
        !self.errors.is_empty()
    }
}

struct Check {
    field: Field,
    severity: Severity,
    message: &'static str,
    fails: fn(&LetterDraft) -> bool,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn job_description_blank(draft: &LetterDraft) -> bool {
    is_blank(&draft.job_description)
}

fn company_name_blank(draft: &LetterDraft) -> bool {
    is_blank(&draft.company_name)
}

fn role_title_blank(draft: &LetterDraft) -> bool {
    is_blank(&draft.role_title)
}

fn resume_text_blank(draft: &LetterDraft) -> bool {
    is_blank(&draft.resume_text)
}

/// Company given, JD given, but the name never appears in the JD (case-insensitive).
fn company_missing_from_job_description(draft: &LetterDraft) -> bool {
    let company = draft.company_name.trim();
    if company.is_empty() || is_blank(&draft.job_description) {
        return false;
    }
    !draft
        .job_description
        .to_lowercase()
        .contains(&company.to_lowercase())
}

fn role_not_detected(draft: &LetterDraft) -> bool {
    !is_blank(&draft.job_description) && extract_role(&draft.job_description).is_none()
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern")
});

static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?\(?\d{3}\)?[\s.\-]\d{3}[\s.\-]\d{4}").expect("phone pattern")
});

fn resume_has_contact_details(draft: &LetterDraft) -> bool {
    EMAIL.is_match(&draft.resume_text) || PHONE.is_match(&draft.resume_text)
}

/// All checks, in the order their issues are reported.
const CHECKS: &[Check] = &[
    Check {
        field: Field::JobDescription,
        severity: Severity::Blocking,
        message: "Paste the job description first.",
        fails: job_description_blank,
    },
    Check {
        field: Field::CompanyName,
        severity: Severity::Blocking,
        message: "Enter the company name.",
        fails: company_name_blank,
    },
    Check {
        field: Field::RoleTitle,
        severity: Severity::Blocking,
        message: "Role title is required.",
        fails: role_title_blank,
    },
    Check {
        field: Field::ResumeText,
        severity: Severity::Blocking,
        message: "Paste your resume content.",
        fails: resume_text_blank,
    },
    Check {
        field: Field::CompanyName,
        severity: Severity::Advisory,
        message: "Company name not found in the job description. Paste the full job description including the company name.",
        fails: company_missing_from_job_description,
    },
    Check {
        field: Field::RoleTitle,
        severity: Severity::Advisory,
        message: "Role title not detected in the job description. Include it or type it manually.",
        fails: role_not_detected,
    },
    Check {
        field: Field::ResumeText,
        severity: Severity::Advisory,
        message: "Resume text appears to contain contact details. Remove email addresses and phone numbers before generating.",
        fails: resume_has_contact_details,
    },
];

/// Runs every check and splits the failures by severity.
pub fn check_draft(draft: &LetterDraft) -> ValidationReport {
    let mut report = ValidationReport::default();
    for check in CHECKS {
        if !(check.fails)(draft) {
            continue;
        }
        let issue = FieldIssue {
            field: check.field,
            severity: check.severity,
            message: check.message.to_string(),
        };
        match check.severity {
            Severity::Blocking => report.errors.push(issue),
            Severity::Advisory => report.warnings.push(issue),
        }
    }
    report
}

/// Advisory issues for a bare job description (used before the other fields exist).
pub fn job_description_warnings(job_description: &str) -> Vec<FieldIssue> {
    let draft = LetterDraft {
        job_description: job_description.to_string(),
        ..LetterDraft::default()
    };
    check_draft(&draft)
        .warnings
        .into_iter()
        .filter(|issue| issue.field == Field::RoleTitle)
        .collect()
}
