//! Hosted language-model message source.
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint. Failures are
//! returned as [`MessageError`]; choosing a fallback is the caller's job.

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{MessageFuture, MessageSource, MessageStyle};
use crate::advice::{Advice, AdviceContext, RecommendedSession};
use crate::error::MessageError;
use crate::goals::{MicroGoal, Priority, DEFAULT_GOAL_MINUTES};
use crate::storage::config::LlmConfig;

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoalList {
    #[serde(rename = "microGoals", default)]
    micro_goals: Vec<WireGoal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGoal {
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    estimated_minutes: Option<u32>,
    #[serde(default)]
    priority: Option<String>,
}

impl From<WireGoal> for MicroGoal {
    fn from(w: WireGoal) -> Self {
        let priority = w
            .priority
            .and_then(|p| p.parse::<Priority>().ok())
            .unwrap_or_default();
        MicroGoal::new(
            w.title,
            w.description,
            w.estimated_minutes.unwrap_or(DEFAULT_GOAL_MINUTES),
            priority,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAdvice {
    summary: String,
    primary_advice: String,
    #[serde(default)]
    secondary_advice: Option<String>,
    #[serde(default)]
    encouragement: String,
    #[serde(default)]
    recommended_session_type: Option<String>,
}

impl From<WireAdvice> for Advice {
    fn from(w: WireAdvice) -> Self {
        let recommended_session_type = w
            .recommended_session_type
            .and_then(|r| r.parse::<RecommendedSession>().ok())
            .unwrap_or_default();
        Advice {
            summary: w.summary,
            primary_advice: w.primary_advice,
            secondary_advice: w.secondary_advice.filter(|s| !s.trim().is_empty()),
            encouragement: w.encouragement,
            recommended_session_type,
        }
    }
}

fn advice_prompt(ctx: &AdviceContext) -> String {
    format!(
        "You are FocusJuju, a companion specialising in productivity and focus. Based on the \
         user's mood and session history, acknowledge their current state, offer one or two \
         specific, actionable suggestions and stay encouraging.\n\n\
         Mood (scale 1-5): mood {}/5, energy {}/5, focus {}/5.\n\
         Sessions: {} finished, {} minutes focused, {} minutes on average.\n\n\
         Answer with a JSON object with the keys summary, primaryAdvice, secondaryAdvice, \
         encouragement and recommendedSessionType, where recommendedSessionType is one of \
         body-double, pomodoro, deep-work or task-breakdown.",
        ctx.mood,
        ctx.energy,
        ctx.focus,
        ctx.total_sessions,
        ctx.total_focus_min,
        ctx.average_session_min,
    )
}

fn persona(style: MessageStyle) -> &'static str {
    match style {
        MessageStyle::Friendly => {
            "You are FocusJuju, a warm and supportive focus companion. Be encouraging and gentle."
        }
        MessageStyle::Serious => {
            "You are FocusJuju, a concise and professional focus companion. Be brief and practical."
        }
        MessageStyle::Funny => {
            "You are FocusJuju, a playful focus companion. Keep it light and witty."
        }
        MessageStyle::Motivational => {
            "You are FocusJuju, an energetic focus coach. Be enthusiastic and bold."
        }
    }
}

const BODY_DOUBLE_CONTEXT: &str = "You are acting as a virtual body double while the user \
works. Reply in one to three sentences, stay encouraging without being intrusive, and keep \
the user's attention on their work.";

fn temperature(style: MessageStyle) -> f64 {
    match style {
        MessageStyle::Serious => 0.3,
        _ => 0.7,
    }
}

#[derive(Debug, Clone)]
pub struct LlmMessageSource {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl LlmMessageSource {
    pub fn new(api_base: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            max_tokens: 150,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Build from configuration, reading the API key from the configured
    /// environment variable.
    pub fn from_config(config: &LlmConfig) -> Result<Self, MessageError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| MessageError::MissingApiKey {
                env_var: config.api_key_env.clone(),
            })?;
        Ok(Self::new(&config.api_base, &config.model, api_key).with_max_tokens(config.max_tokens))
    }

    fn complete(&self, body: Value) -> MessageFuture<String> {
        let client = self.client.clone();
        let url = format!("{}/chat/completions", self.api_base);
        let api_key = self.api_key.clone();
        Box::pin(async move {
            let resp = client
                .post(&url)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await?;
            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(MessageError::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            let parsed: ChatResponse = resp.json().await?;
            parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .ok_or_else(|| MessageError::Malformed("response has no message content".into()))
        })
    }

    fn chat_body(&self, style: MessageStyle, user: &str) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": format!("{} {}", persona(style), BODY_DOUBLE_CONTEXT) },
                { "role": "user", "content": user },
            ],
            "max_tokens": self.max_tokens,
            "temperature": temperature(style),
        })
    }
}

impl MessageSource for LlmMessageSource {
    fn encouragement(&self, style: MessageStyle) -> MessageFuture<String> {
        self.complete(self.chat_body(
            style,
            "Send me one short line of encouragement for my focus session.",
        ))
    }

    fn reply(&self, style: MessageStyle, user_message: &str) -> MessageFuture<String> {
        self.complete(self.chat_body(style, user_message))
    }

    fn micro_goals(&self, task: &str, energy: u8) -> MessageFuture<Vec<MicroGoal>> {
        let system = format!(
            "You break large tasks into 3 to 5 specific, actionable micro-goals that each take \
             15 to 30 minutes, in a logical order. Answer with a JSON object \
             {{\"microGoals\": [{{\"title\", \"description\", \"estimatedMinutes\", \"priority\"}}]}} \
             where priority is high, medium or low. The user's energy level is {energy}/5."
        );
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": format!("Task: {task}") },
            ],
            "response_format": { "type": "json_object" },
        });
        let request = self.complete(body);
        Box::pin(async move {
            let content = request.await?;
            let list: GoalList = serde_json::from_str(&content)
                .map_err(|e| MessageError::Malformed(format!("micro-goal JSON: {e}")))?;
            Ok(list.micro_goals.into_iter().map(MicroGoal::from).collect())
        })
    }

    fn advice(&self, context: &AdviceContext) -> MessageFuture<Advice> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": advice_prompt(context) },
                {
                    "role": "user",
                    "content": "What advice do you have for me today based on my mood and history?",
                },
            ],
            "response_format": { "type": "json_object" },
        });
        let request = self.complete(body);
        Box::pin(async move {
            let content = request.await?;
            let advice: WireAdvice = serde_json::from_str(&content)
                .map_err(|e| MessageError::Malformed(format!("advice JSON: {e}")))?;
            Ok(advice.into())
        })
    }
}
