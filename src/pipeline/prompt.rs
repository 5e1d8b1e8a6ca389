// file: src/pipeline/prompt.rs
// description: instruction + chunk prompt composition
// reference: fixed placeholder template

use crate::error::{Result, SummarizeError};
use crate::models::Chunk;

const TEXT_PLACEHOLDER: &str = "{text}";

/// Prompt template whose only placeholder is the chunk text. The instruction
/// is prepended verbatim.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    instruction: String,
}

impl PromptTemplate {
    /// Rejects empty or whitespace-only instructions.
    pub fn new(instruction: impl Into<String>) -> Result<Self> {
        let instruction = instruction.into();
        Self::validate_instruction(&instruction)?;
        Ok(Self { instruction })
    }

    pub fn validate_instruction(instruction: &str) -> Result<()> {
        if instruction.trim().is_empty() {
            return Err(SummarizeError::Validation(
                "Please provide an instruction to generate the summary".to_string(),
            ));
        }
        Ok(())
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// `{instruction}\n\n{text}\n\n`
    pub fn template(&self) -> String {
        format!("{}\n\n{}\n\n", self.instruction, TEXT_PLACEHOLDER)
    }

    pub fn render(&self, text: &str) -> String {
        let mut prompt = String::with_capacity(self.instruction.len() + text.len() + 4);
        prompt.push_str(&self.instruction);
        prompt.push_str("\n\n");
        prompt.push_str(text);
        prompt.push_str("\n\n");
        prompt
    }

    pub fn compose(&self, chunk: &Chunk) -> String {
        self.render(&chunk.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn chunk(text: &str) -> Chunk {
        Chunk {
            index: 0,
            text: text.to_string(),
            start: 0,
            overlap: 0,
            first_page: 1,
            last_page: 1,
        }
    }

    #[test]
    fn test_compose_prompt() {
        let template = PromptTemplate::new("Summarize in one word").unwrap();
        assert_eq!(
            template.compose(&chunk("Hello world")),
            "Summarize in one word\n\nHello world\n\n"
        );
    }

    #[test]
    fn test_instruction_is_not_escaped_or_trimmed() {
        let instruction = "  Use {braces} and <tags>\n";
        let template = PromptTemplate::new(instruction).unwrap();

        assert_eq!(
            template.render("body"),
            "  Use {braces} and <tags>\n\n\nbody\n\n"
        );
    }

    #[test]
    fn test_text_containing_placeholder_is_literal() {
        let template = PromptTemplate::new("Summarize").unwrap();
        assert_eq!(template.render("{text}"), "Summarize\n\n{text}\n\n");
    }

    #[test]
    fn test_empty_instruction_rejected() {
        assert!(matches!(
            PromptTemplate::new(""),
            Err(SummarizeError::Validation(_))
        ));
        assert!(matches!(
            PromptTemplate::new(" \n\t "),
            Err(SummarizeError::Validation(_))
        ));
    }

    #[test]
    fn test_template_shape() {
        let template = PromptTemplate::new("Do it").unwrap();
        assert_eq!(template.template(), "Do it\n\n{text}\n\n");
    }
}
