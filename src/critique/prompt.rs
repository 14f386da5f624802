//! Prompt assembly for the meta-critique endpoint

/// Fixed system instruction block sent ahead of every submission
pub const SYSTEM_PROMPT: &str = "\
You are a helpful assistant that critiques student feedback on presentations.
Your goal is to help students improve their ability to give meaningful, specific, and constructive feedback.
When creating your response, please answer using only Markdown syntax.
After your critique, append a fenced ```json code block containing a single object with a \"rewrite_suggestions\" key: an array of objects, each with \"bad_phrase\" and \"suggested_rewrite\" string fields. Use an empty array when nothing needs rewriting.";

/// Build the full prompt for one feedback submission.
///
/// The Custom Instructions section is included only when the instructions
/// are non-blank after trimming; the feedback text is carried verbatim.
pub fn build_prompt(feedback: &str, custom_instructions: &str) -> String {
    if custom_instructions.trim().is_empty() {
        format!("{}\n\nStudent Feedback:\n{}", SYSTEM_PROMPT, feedback)
    } else {
        format!(
            "{}\n\nCustom Instructions: {}\n\nStudent Feedback:\n{}",
            SYSTEM_PROMPT, custom_instructions, feedback
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_includes_feedback_verbatim() {
        let feedback = "The slides were <great> & the pacing was 100% off!\nSecond line.";
        let prompt = build_prompt(feedback, "");
        assert!(prompt.contains(feedback));
        assert!(prompt.starts_with(SYSTEM_PROMPT));
    }

    #[test]
    fn test_build_prompt_with_custom_instructions() {
        let prompt = build_prompt("good job", "Focus on tone");
        assert!(prompt.contains("Custom Instructions: Focus on tone"));
        assert!(prompt.contains("Student Feedback:\ngood job"));
    }

    #[test]
    fn test_build_prompt_omits_blank_custom_instructions() {
        for blank in ["", " ", "\t", "\n  \n"] {
            let prompt = build_prompt("good job", blank);
            assert!(!prompt.contains("Custom Instructions"));
        }
    }

    #[test]
    fn test_build_prompt_custom_instructions_kept_exact() {
        let instructions = "Be strict about \"filler words\"";
        let prompt = build_prompt("good job", instructions);
        assert!(prompt.contains(instructions));
    }

    #[test]
    fn test_build_prompt_section_order() {
        let prompt = build_prompt("feedback text", "instructions text");
        let custom_pos = prompt.find("Custom Instructions:").unwrap();
        let feedback_pos = prompt.find("Student Feedback:").unwrap();
        assert!(custom_pos < feedback_pos);
    }
}
