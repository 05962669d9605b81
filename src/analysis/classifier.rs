// src/analysis/classifier.rs
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::analysis::theme_mapper::THEMES;
use crate::app_log;
use crate::core::{ChatMessage, ChatRequest, ChatService};
use crate::error::{AdvisorError, Result};
use crate::types::{CvText, ProfileInfo};

const EVALUATION_RUBRIC: &str = "Consider:
- Current skills and experience
- Industry alignment
- Career growth potential
- Market demand in Morocco
- Educational background
- Professional objectives";

const TOPIC_SYSTEM: &str =
    "You are a career development advisor who suggests relevant courses.";
const PROFILE_SYSTEM: &str = "You are a CV parser that only returns valid JSON.";

const PROFILE_FIELDS: [&str; 5] = ["full_name", "location", "email", "phone", "key_skills"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Theme,
    JobTitle,
    Topic,
    Profile,
}

impl TaskKind {
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::Theme | Self::JobTitle => 50,
            Self::Topic => 100,
            Self::Profile => 500,
        }
    }

    pub fn temperature(self) -> f32 {
        match self {
            Self::Theme | Self::JobTitle | Self::Topic => 0.7,
            Self::Profile => 0.3,
        }
    }

    fn system_instruction(self) -> Option<&'static str> {
        match self {
            Self::Topic => Some(TOPIC_SYSTEM),
            Self::Profile => Some(PROFILE_SYSTEM),
            Self::Theme | Self::JobTitle => None,
        }
    }

    fn prompt(self, cv: &CvText) -> String {
        let cv = cv.as_str();
        match self {
            Self::Theme => {
                let themes = THEMES
                    .iter()
                    .map(|theme| format!("- {}", theme))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Based on the following CV text, recommend ONE of these available themes that are very related to the CV text:\n\n\
                     Available themes:\n{}\n\n{}\n\nCV Text:\n{}\n\n\
                     Return only the theme name exactly as listed above, without any additional explanation or introduction text. The output should be directly the theme",
                    themes, EVALUATION_RUBRIC, cv
                )
            }
            Self::JobTitle => format!(
                "Based on the following CV text, recommend ONE specific job title that best matches the candidate's profile:\n\
                 {}\n\nCV Text:\n{}\n\n\
                 Return only the job title without any additional explanation.",
                EVALUATION_RUBRIC, cv
            ),
            Self::Topic => format!(
                "Analyze the following CV content and suggest only one specific topic \
                 that would be valuable for the person to learn based on their current experience. \
                 Format the response as a simple search terms, without any additional \
                 text or explanations. Make sure that the topic is very related with the CV.\n\n\
                 CV Content:\n{}\n",
                cv
            ),
            Self::Profile => format!(
                "You are a CV parser. Extract information from the CV text and return it in valid JSON format.\n\
                 Only return the JSON object, nothing else.\n\n\
                 Format the response exactly like this and give me only 4 main skills of the CV:\n\
                 {{\n    \"full_name\": \"Candidate Name\",\n    \"location\": \"City, Country\",\n    \
                 \"email\": \"email@example.com\",\n    \"phone\": \"+1234567890\",\n    \
                 \"key_skills\": [\"Skill 1\", \"Skill 2\", \"Skill 3\", \"Skill 4\"]\n}}\n\n\
                 CV Text:\n{}",
                cv
            ),
        }
    }

    pub fn request(self, cv: &CvText) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_instruction() {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(self.prompt(cv)));

        ChatRequest {
            messages,
            max_tokens: self.max_tokens(),
            temperature: self.temperature(),
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Theme => "theme",
            Self::JobTitle => "job_title",
            Self::Topic => "topic",
            Self::Profile => "profile",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationLabel {
    pub kind: TaskKind,
    pub text: String,
}

/// One bounded, single-turn completion per call; no retries.
#[derive(Clone)]
pub struct Classifier {
    chat: Arc<dyn ChatService>,
    profile_chat: Arc<dyn ChatService>,
}

impl Classifier {
    pub fn new(chat: Arc<dyn ChatService>, profile_chat: Arc<dyn ChatService>) -> Self {
        Self { chat, profile_chat }
    }

    pub async fn classify(&self, cv: &CvText, kind: TaskKind) -> Result<ClassificationLabel> {
        app_log!(info, "Classifying CV ({} chars) as {}", cv.as_str().len(), kind);

        let reply = self.chat.complete(kind.request(cv)).await.map_err(|e| {
            app_log!(error, "Classification ({}) failed: {}", kind, e);
            AdvisorError::Classification(e)
        })?;

        let text = reply.trim().to_string();
        app_log!(info, "Classifier returned {} label: {}", kind, text);
        Ok(ClassificationLabel { kind, text })
    }

    pub async fn extract_profile(&self, cv: &CvText) -> Result<ProfileInfo> {
        let reply = self
            .profile_chat
            .complete(TaskKind::Profile.request(cv))
            .await?;
        parse_profile(reply.trim())
    }
}

/// Parse the outermost `{...}` of a profile reply.
pub fn parse_profile(reply: &str) -> Result<ProfileInfo> {
    let (start, end) = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if end > start => (start, end),
        _ => {
            return Err(AdvisorError::InvalidReply(
                "No JSON object found in response".to_string(),
            ))
        }
    };

    let parsed: Value = match serde_json::from_str(&reply[start..=end]) {
        Ok(value) => value,
        Err(e) => {
            app_log!(warn, "Profile JSON parsing error: {}; returning unknown profile", e);
            return Ok(ProfileInfo::unknown());
        }
    };

    if let Some(field) = PROFILE_FIELDS.iter().find(|f| parsed.get(**f).is_none()) {
        return Err(AdvisorError::InvalidReply(format!(
            "Missing required field: {}",
            field
        )));
    }

    let key_skills = match &parsed["key_skills"] {
        Value::Array(items) => items.iter().map(value_text).collect(),
        other => vec![value_text(other)],
    };

    Ok(ProfileInfo {
        full_name: value_text(&parsed["full_name"]),
        location: value_text(&parsed["location"]),
        email: value_text(&parsed["email"]),
        phone: value_text(&parsed["phone"]),
        key_skills,
    })
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
