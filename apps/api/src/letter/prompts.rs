// Prompt constants for cover letter generation.

use crate::letter::LetterRequest;
use crate::llm_client::ChatMessage;

/// System prompt — fixes the five behavioral rules for every letter.
pub const LETTER_SYSTEM: &str = "You are a professional cover letter writer.

Rules:
- Use ONLY the experience in the resume text provided.
- Do NOT add personal contact info, names, phone numbers, or emails.
- If a required skill is missing, bridge the gap with transferable experience instead of inventing it.
- Tone: professional, concise, impact-driven.
- At most 5 short paragraphs.";

/// Closing instruction appended after the job description.
pub const LETTER_CLOSING_INSTRUCTION: &str = "Write a cover letter addressed to \"Hiring Manager\".
Do NOT fabricate experience or add personal info.";

/// User message: resume, role, company, job description, then the closing instruction.
pub fn build_user_prompt(request: &LetterRequest) -> String {
    format!(
        "RESUME:\n{resume}\n\nROLE: {role}\nCOMPANY: {company}\n\nJOB DESCRIPTION:\n{jd}\n\n{closing}",
        resume = request.resume_text(),
        role = request.role_title(),
        company = request.company_name(),
        jd = request.job_description(),
        closing = LETTER_CLOSING_INSTRUCTION,
    )
}

pub fn build_messages(request: &LetterRequest) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(LETTER_SYSTEM),
        ChatMessage::user(build_user_prompt(request)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::LetterDraft;
    use crate::llm_client::ChatRole;

    fn request() -> LetterRequest {
        LetterRequest::from_draft(&LetterDraft {
            job_description: "Umbrella Corp seeks a Research Scientist.".to_string(),
            company_name: "Umbrella Corp".to_string(),
            role_title: "Research Scientist".to_string(),
            resume_text: "- Published 4 papers on {ROLE} templating".to_string(),
            full_name: Some("Alex Doe".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_user_prompt_orders_sections() {
        let prompt = build_user_prompt(&request());
        let resume = prompt.find("RESUME:").unwrap();
        let role = prompt.find("ROLE: Research Scientist").unwrap();
        let company = prompt.find("COMPANY: Umbrella Corp").unwrap();
        let jd = prompt.find("JOB DESCRIPTION:\nUmbrella Corp seeks").unwrap();
        let closing = prompt.find("\"Hiring Manager\"").unwrap();
        assert!(resume < role && role < company && company < jd && jd < closing);
    }

    #[test]
    fn test_user_text_is_not_treated_as_template() {
        let prompt = build_user_prompt(&request());
        assert!(prompt.contains("- Published 4 papers on {ROLE} templating"));
    }

    #[test]
    fn test_display_name_is_not_sent_to_model() {
        let messages = build_messages(&request());
        assert!(messages.iter().all(|m| !m.content.contains("Alex Doe")));
    }

    #[test]
    fn test_messages_are_system_then_user() {
        let messages = build_messages(&request());
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].role, ChatRole::User);
        assert!(messages[0].content.contains("5 short paragraphs"));
        assert!(messages[0].content.contains("transferable experience"));
    }
}
