//! Role extractor — finds a role title in free job-description text.
//!
//! The rule list is an ordered fallback chain. Each rule describes one lexical
//! shape of a role title and the first rule that matches *anywhere* in the text
//! wins. A broad early rule (seniority qualifier + word run) can shadow a more
//! specific later one (`... Analyst`); that is the defined behavior.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// Seniority / level qualifiers that open rule 1.
pub const SENIORITY_QUALIFIERS: &[&str] = &[
    "Senior",
    r"Sr\.?",
    "Lead",
    "Associate",
    "Principal",
    "Junior",
    "Entry",
    "Head",
];

/// Job-family nouns, in priority order. Each becomes its own rule after rule 1.
pub const JOB_FAMILIES: &[&str] = &["Analyst", "Manager", "Engineer", "Specialist", "Scientist"];

/// A single named extraction rule.
pub struct RoleRule {
    pub name: &'static str,
    pattern: Regex,
}

impl RoleRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            // Patterns are built from the constant tables above.
            pattern: Regex::new(pattern).expect("role pattern must compile"),
        }
    }

    /// Returns the full match of this rule, trimmed, if it matches anywhere.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str().trim())
    }
}

static RULES: LazyLock<Vec<RoleRule>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(1 + JOB_FAMILIES.len());

    // Rule 1: qualifier, whitespace, then a greedy run of words / numbers / ", -".
    rules.push(RoleRule::new(
        "seniority",
        &format!(
            r"(?:{})\s+[A-Za-z0-9 ,\-]+",
            SENIORITY_QUALIFIERS.join("|")
        ),
    ));

    // Rules 2..: "<Capitalized> <Family>" plus optional qualifying words.
    for family in JOB_FAMILIES {
        rules.push(RoleRule::new(
            family,
            &format!(r"[A-Z][A-Za-z]+ {family}[ A-Za-z0-9,\-]*"),
        ));
    }

    rules
});

/// The ordered rule chain used by [`extract_role`].
pub fn rules() -> &'static [RoleRule] {
    &RULES
}

/// Extracts a candidate role title from job-description text.
///
/// Returns the trimmed match of the first rule (in declared order) that hits
/// anywhere in `text`, or `None` when no rule matches. Never fails.
pub fn extract_role(text: &str) -> Option<String> {
    let (rule, role) = rules()
        .iter()
        .find_map(|rule| rule.find(text).map(|m| (rule.name, m)))?;
    debug!(rule, role, "Role title extracted");
    Some(role.to_string()).filter(|r| !r.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seniority_rule_captures_greedy_word_run() {
        // Rule 1 fires before the Analyst rule and keeps going to the end of the line.
        let role = extract_role("We need a Senior Data Analyst to join our team");
        assert_eq!(role.as_deref(), Some("Senior Data Analyst to join our team"));
    }

    #[test]
    fn test_seniority_rule_stops_at_sentence_end() {
        let role = extract_role("Hiring: Senior Data Analyst. Apply now!");
        assert_eq!(role.as_deref(), Some("Senior Data Analyst"));
    }

    #[test]
    fn test_seniority_rule_stops_at_line_break() {
        let jd = "Lead Platform Engineer\nAcme Corp is hiring.";
        assert_eq!(extract_role(jd).as_deref(), Some("Lead Platform Engineer"));
    }

    #[test]
    fn test_sr_abbreviation_with_period() {
        let jd = "Title: Sr. Software Engineer, Payments\nLocation: Remote";
        assert_eq!(
            extract_role(jd).as_deref(),
            Some("Sr. Software Engineer, Payments")
        );
    }

    #[test]
    fn test_head_of_qualifier() {
        let jd = "We are looking for a Head of Growth (remote).";
        assert_eq!(extract_role(jd).as_deref(), Some("Head of Growth"));
    }

    #[test]
    fn test_manager_rule_keeps_trailing_words() {
        let role = extract_role("This Product Manager role reports to...");
        assert_eq!(role.as_deref(), Some("Product Manager role reports to"));
    }

    #[test]
    fn test_family_priority_beats_position_in_text() {
        // Manager appears first, but the Analyst rule is tried first.
        let jd = "Reporting to the Operations Manager, the Data Analyst owns dashboards.";
        assert_eq!(
            extract_role(jd).as_deref(),
            Some("Data Analyst owns dashboards")
        );
    }

    #[test]
    fn test_scientist_rule() {
        let jd = "Our lab needs a Research Scientist.";
        assert_eq!(extract_role(jd).as_deref(), Some("Research Scientist"));
    }

    #[test]
    fn test_family_requires_capitalized_prefix() {
        assert_eq!(extract_role("you will work with every engineer here"), None);
        assert_eq!(extract_role("a data Analyst is needed"), None);
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(extract_role("Join our growing team today!"), None);
    }

    #[test]
    fn test_empty_input_returns_none() {
        assert_eq!(extract_role(""), None);
        assert_eq!(extract_role("   \n  "), None);
    }

    #[test]
    fn test_rule_order_is_seniority_then_families() {
        let names: Vec<&str> = rules().iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["seniority", "Analyst", "Manager", "Engineer", "Specialist", "Scientist"]
        );
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let jd = "Principal Engineer";
        assert_eq!(extract_role(jd), extract_role(jd));
        assert_eq!(extract_role(jd).as_deref(), Some("Principal Engineer"));
    }
}
