use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{parse_food_items, AnalysisError};
use crate::config::VisionConfig;
use crate::nutrition::FoodItem;

/// Estimates the foods in a meal photo.
#[async_trait]
pub trait VisionAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8], content_type: &str)
        -> Result<Vec<FoodItem>, AnalysisError>;
}

const PROMPT: &str = r#"Analyse the food in this image and return its nutrition as JSON.
If there are several foods, return one entry per food.

JSON format:
[
  {
    "name": "food name",
    "calories": kcal,
    "protein": grams,
    "carbs": grams,
    "fat": grams,
    "fiber": grams,
    "sugar": grams,
    "sodium": milligrams,
    "confidence": 0.0-1.0
  }
]

Notes:
- Be as accurate as possible.
- Assume a typical single serving, adjusted for the portion visible.
- confidence must be between 0.0 and 1.0."#;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AnswerMessage,
}

#[derive(Debug, Deserialize)]
struct AnswerMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct OpenAiVision {
    client: Client,
    config: VisionConfig,
}

impl OpenAiVision {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn request<'a>(&'a self, image: &[u8], content_type: &str) -> ChatRequest<'a> {
        let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(image));
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl VisionAnalyzer for OpenAiVision {
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn analyze(
        &self,
        image: &[u8],
        content_type: &str,
    ) -> Result<Vec<FoodItem>, AnalysisError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&self.request(image, content_type))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let answer = response
            .json::<ChatResponse>()
            .await?
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;
        debug!(chars = answer.len(), "vision answer received");

        parse_food_items(&answer)
    }
}
