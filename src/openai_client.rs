// OpenAI Chat Completions client plus the derived text generators
// (summaries, title suggestions, SEO descriptions).

use crate::error::{Service, ServiceError};
use crate::settings::DEFAULT_MODEL;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SUMMARY_PROMPT: &str =
    "Summarize the provided content in 2-3 short sentences. Use plain language.";
const DESCRIPTION_PROMPT: &str =
    "Write a compelling SEO meta description in up to 155 characters. Focus on clarity and encourage clicks.";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
}

/// One role-tagged message in a conversation; order is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".to_string(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

lazy_static! {
    // Leading bullet/number punctuation the model adds despite the prompt,
    // e.g. "- ", "1. ", "2) "
    static ref TITLE_PREFIX_RE: Regex = Regex::new(r"^[-\d.)\s]+").unwrap();
}

/// Coerce a requested title count to a positive integer, defaulting to 3.
pub fn normalize_count(count: Option<i64>) -> usize {
    match count {
        Some(n) if n > 0 => n as usize,
        _ => 3,
    }
}

/// Split model output into clean title lines: strip leading bullets and
/// numbering, trim, drop empties, cap at `count`.
pub fn parse_title_lines(content: &str, count: usize) -> Vec<String> {
    content
        .lines()
        .map(|line| TITLE_PREFIX_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(count)
        .collect()
}

/// Classify one chat completion exchange by upstream status and raw body.
/// Non-success statuses always become RequestFailed carrying the mirrored
/// status, with the body's `error.message` when one can be parsed out and a
/// generic message otherwise (proxies answer with HTML error pages). Success
/// bodies that fail to parse yield Null, which the content extractor rejects.
fn parse_chat_response(status: StatusCode, body: &str) -> Result<Value, ServiceError> {
    if !status.is_success() {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "OpenAI API request failed.".to_string());
        return Err(ServiceError::RequestFailed {
            service: Service::OpenAi,
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_str(body).unwrap_or(Value::Null))
}

/// Pull the assistant content out of a raw chat completion response.
pub fn extract_message_content(response: &Value) -> Result<String, ServiceError> {
    let content = response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::trim)
        .unwrap_or("");

    if content.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }

    Ok(content.to_string())
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        let model = if model.is_empty() { DEFAULT_MODEL.to_string() } else { model };
        Self { client, api_key, model }
    }

    /// Perform one chat completion call and return the parsed response body
    /// unmodified; callers extract what they need.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        model: Option<&str>,
    ) -> Result<Value, ServiceError> {
        if self.api_key.is_empty() {
            return Err(ServiceError::MissingOpenAiKey);
        }

        let resolved_model = match model {
            Some(m) if !m.is_empty() => m,
            _ => self.model.as_str(),
        };

        tracing::debug!("OpenAI chat completion with model {}", resolved_model);

        let body = json!({
            "model": resolved_model,
            "messages": messages,
        });

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::transport(Service::OpenAi, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::transport(Service::OpenAi, e))?;

        match parse_chat_response(status, &body) {
            Ok(data) => Ok(data),
            Err(err) => {
                tracing::warn!("OpenAI request failed ({}): {}", status, err);
                Err(err)
            }
        }
    }

    /// Generate a 2-3 sentence plain-language summary of the given text.
    pub async fn generate_summary_from_text(&self, text: &str) -> Result<String, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::MissingText);
        }

        let messages = [ChatMessage::system(SUMMARY_PROMPT), ChatMessage::user(text)];
        let response = self.chat(&messages, None).await?;
        extract_message_content(&response)
    }

    /// Generate up to `count` title suggestions, one per line.
    pub async fn generate_titles(
        &self,
        text: &str,
        count: Option<i64>,
    ) -> Result<Vec<String>, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::MissingText);
        }

        let count = normalize_count(count);
        let prompt = format!(
            "Generate {} concise, engaging titles for the provided content. \
             Return each title on its own line without numbering.",
            count
        );

        let messages = [ChatMessage::system(prompt), ChatMessage::user(text)];
        let response = self.chat(&messages, None).await?;
        let content = extract_message_content(&response)?;

        Ok(parse_title_lines(&content, count))
    }

    /// Generate an SEO meta description. The 155-character bound is prompt
    /// guidance only; the model's output is returned as-is.
    pub async fn generate_description(&self, text: &str) -> Result<String, ServiceError> {
        if text.is_empty() {
            return Err(ServiceError::MissingText);
        }

        let messages = [ChatMessage::system(DESCRIPTION_PROMPT), ChatMessage::user(text)];
        let response = self.chat(&messages, None).await?;
        extract_message_content(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_count() {
        assert_eq!(normalize_count(None), 3);
        assert_eq!(normalize_count(Some(0)), 3);
        assert_eq!(normalize_count(Some(-5)), 3);
        assert_eq!(normalize_count(Some(5)), 5);
    }

    #[test]
    fn test_parse_title_lines_strips_bullets_and_numbering() {
        let titles = parse_title_lines("1. Foo\n- Bar\nBaz", 2);
        assert_eq!(titles, vec!["Foo", "Bar"]);

        let titles = parse_title_lines("2) One\n\n   \n3. Two", 5);
        assert_eq!(titles, vec!["One", "Two"]);
    }

    #[test]
    fn test_non_200_surfaces_upstream_error_message_and_status() {
        let err = parse_chat_response(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"bad key"}}"#,
        )
        .unwrap_err();
        match &err {
            ServiceError::RequestFailed { service, status, message } => {
                assert_eq!(*service, Service::OpenAi);
                assert_eq!(*status, 401);
                assert_eq!(message, "bad key");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
        assert_eq!(err.code(), "openai_request_failed");
        assert_eq!(err.status().as_u16(), 401);
    }

    #[test]
    fn test_non_200_with_non_json_body_keeps_upstream_status() {
        // Proxies answer with HTML error pages; the upstream code must survive
        let err = parse_chat_response(StatusCode::UNAUTHORIZED, "<html>unauthorized</html>")
            .unwrap_err();
        match err {
            ServiceError::RequestFailed { status, message, .. } => {
                assert_eq!(status, 401);
                assert_eq!(message, "OpenAI API request failed.");
            }
            other => panic!("expected RequestFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_success_body_parses_through_to_content() {
        let value = parse_chat_response(
            StatusCode::OK,
            r#"{"choices":[{"message":{"role":"assistant","content":"hi"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_message_content(&value).unwrap(), "hi");
    }

    #[test]
    fn test_unparseable_success_body_reads_as_empty_response() {
        let value = parse_chat_response(StatusCode::OK, "not json").unwrap();
        let err = extract_message_content(&value).unwrap_err();
        assert!(matches!(err, ServiceError::EmptyResponse));
    }

    #[test]
    fn test_extract_message_content_trims() {
        let response = json!({
            "choices": [{"message": {"role": "assistant", "content": "  hello  "}}]
        });
        assert_eq!(extract_message_content(&response).unwrap(), "hello");
    }

    #[test]
    fn test_extract_message_content_rejects_empty() {
        for response in [
            json!({"choices": []}),
            json!({"choices": [{"message": {"role": "assistant", "content": ""}}]}),
            json!({"choices": [{"message": {"role": "assistant", "content": "   "}}]}),
            json!({}),
        ] {
            let err = extract_message_content(&response).unwrap_err();
            assert!(matches!(err, ServiceError::EmptyResponse));
            assert_eq!(err.status().as_u16(), 500);
        }
    }

    #[tokio::test]
    async fn test_chat_without_api_key_fails_fast() {
        let client = OpenAiClient::new(String::new(), "gpt-4".to_string());
        let err = client.chat(&[ChatMessage::user("hi")], None).await.unwrap_err();
        assert!(matches!(err, ServiceError::MissingOpenAiKey));
        assert_eq!(err.status().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_generators_require_text() {
        let client = OpenAiClient::new("key".to_string(), String::new());
        assert!(matches!(
            client.generate_summary_from_text("").await.unwrap_err(),
            ServiceError::MissingText
        ));
        assert!(matches!(
            client.generate_titles("", Some(3)).await.unwrap_err(),
            ServiceError::MissingText
        ));
        assert!(matches!(
            client.generate_description("").await.unwrap_err(),
            ServiceError::MissingText
        ));
    }

    #[test]
    fn test_empty_model_falls_back_to_default() {
        let client = OpenAiClient::new("key".to_string(), String::new());
        assert_eq!(client.model, "gpt-4");
    }
}
