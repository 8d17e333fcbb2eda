//! Review prompt construction

use super::types::ChatMessage;

/// Task instruction sent ahead of every reviewed unit. The unit's text is
/// appended verbatim after the final colon.
pub const REVIEW_TASK_TEMPLATE: &str = "\
You are a bot that checks code for errors, violations of best practices and other \
potential problems. Your task is to analyze the submitted code and give feedback as a \
list of points. Each point must contain:

A description of the error or problem.
The reason why it is an error or a bad practice.
Recommendations for fixing or improving it.
If possible, an alternative solution or improvement for that part of the code.
You must not rewrite the code, only point out errors and suggest ways to fix them.

Do not explain general programming concepts; focus only on concrete errors and \
improvements in the submitted code. Structure the answer as points so it is easy to \
see what needs fixing and where.

Pay attention to the following kinds of problems:

Syntax errors.
Performance problems.
Coding style violations.
Missing comments and documentation.
Use of outdated or unsafe methods.
Only report errors that can actually be fixed or improved.: ";

/// Builds the two conversation turns for one analysis unit
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    language: String,
}

impl PromptBuilder {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    pub fn system_instruction(&self) -> String {
        format!("Respond in {}.", self.language)
    }

    pub fn review_prompt(&self, content: &str) -> String {
        format!("{}{}", REVIEW_TASK_TEMPLATE, content)
    }

    pub fn build_messages(&self, content: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_instruction()),
            ChatMessage::user(self.review_prompt(content)),
        ]
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new("English")
    }
}
