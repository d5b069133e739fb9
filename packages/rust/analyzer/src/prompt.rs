//! Prompt construction for the four-criterion documentation review.

/// System message sent with every analysis request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant for documentation analysis.";

const RUBRIC: &str = r#"Analysis Criteria:
1. Readability for a Marketer:
   - Assess how readable the content is for a non-technical marketer.
   - Explain why it is or is not readable for this persona.

2. Structure and Flow:
   - Analyze the structure (headings, subheadings, paragraph length, use of lists).
   - Does the information flow logically? Is it easy to navigate and find specific information?

3. Completeness of Information & Examples:
   - Is there enough detail for a user to understand and implement the feature or concept?
   - Are the examples sufficient, clear, and relevant? If not, say where examples should be added or improved.

4. Adherence to Style Guidelines (simplified, based on Microsoft Style Guide principles):
   - Voice and Tone: is it customer-focused, clear, and concise?
   - Clarity and Conciseness: are there overly complex sentences or jargon that could be simplified?
   - Action-oriented language: does it guide the user effectively?
   - Identify areas that deviate from these principles and suggest specific changes."#;

const OUTPUT_SCHEMA: &str = r#"Output Format (JSON):
{
    "readability_for_marketer": {
        "assessment": "Brief assessment here.",
        "suggestions": ["Specific suggestion 1", "Specific suggestion 2"]
    },
    "structure_and_flow": {
        "assessment": "Brief assessment here.",
        "suggestions": ["Specific suggestion 1", "Specific suggestion 2"]
    },
    "completeness_and_examples": {
        "assessment": "Brief assessment here.",
        "suggestions": ["Specific suggestion 1", "Specific suggestion 2"]
    },
    "style_guidelines": {
        "assessment": "Brief assessment here.",
        "suggestions": ["Specific suggestion 1", "Specific suggestion 2"]
    }
}"#;

/// Build the user prompt. `content` is embedded verbatim.
pub fn build_prompt(content: &str) -> String {
    format!(
        "You are an AI assistant specialized in improving technical documentation for marketers.\n\
         Analyze the following documentation article content and provide actionable suggestions \
         for improvement based on the criteria below.\n\
         The output must be a JSON object with an 'assessment' string and a 'suggestions' list of \
         strings for each criterion.\n\
         Suggestions should be specific and actionable, e.g., \"Sentence X is too long; consider \
         breaking it into two shorter sentences.\"\n\
         \n\
         Article Content:\n\
         ---\n\
         {content}\n\
         ---\n\
         \n\
         {RUBRIC}\n\
         \n\
         {OUTPUT_SCHEMA}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docreview_shared::CriterionKey;

    #[test]
    fn prompt_embeds_content_verbatim() {
        let content = "Line one.\n  Indented {braces} line.";
        let prompt = build_prompt(content);
        assert!(prompt.contains("---\nLine one.\n  Indented {braces} line.\n---"));
    }

    #[test]
    fn prompt_names_every_criterion_key() {
        let prompt = build_prompt("x");
        for key in CriterionKey::ALL {
            assert!(prompt.contains(&format!("\"{}\"", key.as_str())), "missing {key}");
        }
        assert!(prompt.contains("\"suggestions\""));
    }
}
