//! Canned-response assistant.
//!
//! Replies come from an ordered list of keyword rules. The first rule with a
//! keyword contained in the (lowercased) message wins; when nothing matches
//! the fallback reply is used.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub const GREETING: &str = "Hello! I'm your legal assistant. How can I help you today?";

const FALLBACK: &str =
    "I'm not sure how to help with that. Could you provide more details about your question?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(content: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub response: String,
}

impl KeywordRule {
    fn matches(&self, lowercase_input: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| lowercase_input.contains(&keyword.to_lowercase()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assistant {
    rules: Vec<KeywordRule>,
    fallback: String,
}

impl Assistant {
    pub fn new(rules: Vec<KeywordRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Loads rules from a JSON file shaped like `{"rules": [...], "fallback": "..."}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("cannot read assistant rules {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        serde_json::from_str(raw)
            .map_err(|e| AppError::Config(format!("invalid assistant rules: {}", e)))
    }

    pub fn greeting(&self) -> ChatMessage {
        ChatMessage::new(GREETING, Sender::Assistant)
    }

    /// Canned response text for `input`, or `None` for a blank message.
    pub fn respond(&self, input: &str) -> Option<&str> {
        if input.trim().is_empty() {
            return None;
        }

        let lowercase_input = input.to_lowercase();
        let response = self
            .rules
            .iter()
            .find(|rule| rule.matches(&lowercase_input))
            .map(|rule| rule.response.as_str())
            .unwrap_or(&self.fallback);
        Some(response)
    }

    pub fn reply(&self, input: &str) -> Option<ChatMessage> {
        self.respond(input)
            .map(|text| ChatMessage::new(text, Sender::Assistant))
    }
}

fn rule(keywords: &[&str], response: &str) -> KeywordRule {
    KeywordRule {
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        response: response.to_string(),
    }
}

impl Default for Assistant {
    fn default() -> Self {
        Self::new(
            vec![
                rule(
                    &["deadline"],
                    "The next deadline for Smith v. Johnson is the filing of the motion for summary judgment, due on June 15, 2023.",
                ),
                rule(
                    &["case", "smith"],
                    "Case #2023-001 (Smith v. Johnson) is currently active. The case involves a personal injury claim following a car accident on Highway 101. The next court date is scheduled for July 10, 2023.",
                ),
                rule(
                    &["remind"],
                    "I've set a reminder for your client meeting with Sarah Williams on June 8, 2023 at 2:00 PM.",
                ),
                rule(
                    &["summary"],
                    "Here's a summary of the Tech Innovations v. DataCorp case: This is an intellectual property dispute regarding alleged patent infringement of Tech Innovations' data processing technology. The case is in discovery phase with depositions scheduled for next month.",
                ),
            ],
            FALLBACK,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let assistant = Assistant::default();
        let reply = assistant.respond("When is the next DEADLINE?").unwrap();
        assert!(reply.starts_with("The next deadline for Smith v. Johnson"));
    }

    #[test]
    fn test_first_rule_wins() {
        let assistant = Assistant::default();
        // "deadline" is declared before "case"
        let reply = assistant.respond("case deadline please").unwrap();
        assert!(reply.starts_with("The next deadline"));

        let reply = assistant.respond("give me a summary of the smith matter").unwrap();
        assert!(reply.starts_with("Case #2023-001"));
    }

    #[test]
    fn test_partial_keyword() {
        let assistant = Assistant::default();
        let reply = assistant.respond("Remind me tomorrow").unwrap();
        assert!(reply.starts_with("I've set a reminder"));
    }

    #[test]
    fn test_fallback_and_blank() {
        let assistant = Assistant::default();
        assert_eq!(assistant.respond("hello there"), Some(FALLBACK));
        assert_eq!(assistant.respond("   "), None);
        assert!(assistant.reply("").is_none());
    }

    #[test]
    fn test_reply_message_is_from_assistant() {
        let message = Assistant::default().reply("summary").unwrap();
        assert_eq!(message.sender, Sender::Assistant);
        assert!(!message.id.is_empty());
    }

    #[test]
    fn test_rules_from_json() {
        let assistant = Assistant::from_json(
            r#"{"rules": [{"keywords": ["Hearing"], "response": "Next hearing is Monday."}],
                "fallback": "No idea."}"#,
        )
        .unwrap();
        assert_eq!(assistant.respond("any hearing soon?"), Some("Next hearing is Monday."));
        assert_eq!(assistant.respond("deadline?"), Some("No idea."));
        assert!(Assistant::from_json("{").is_err());
    }
}
