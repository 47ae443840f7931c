//! Telegram quiz-poll publisher.
//!
//! This module provides the channel-facing half of the pipeline:
//! - [`SendQuizPoll`]: Trait for anything that can publish one quiz poll
//! - [`TelegramClient`]: Bot API implementation (`sendPoll`, quiz type)
//! - [`ThrottledSender`]: Decorator that waits out a fixed cool-down after
//!   every publish attempt
//!
//! # Throttling
//!
//! The Bot API rate-limits channel posts, so the orchestrator publishes
//! through a [`ThrottledSender`]: one poll at a time, each call awaited to
//! completion, then a fixed interval, success or failure, before the next
//! poll goes out. The decorator keeps the policy out of the client, and a
//! token-bucket could replace the fixed sleep without touching either side.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Bot API limit on poll question length, in characters.
const MAX_QUESTION_CHARS: usize = 300;
/// Bot API limit on poll option length, in characters.
const MAX_OPTION_CHARS: usize = 100;

/// A sink that publishes one quiz poll.
pub trait SendQuizPoll {
    /// Publish a quiz poll with `correct_index` marking the right option.
    ///
    /// Callers must uphold `options.len() >= 2` and
    /// `correct_index < options.len()`; the extractor's acceptance rule
    /// guarantees both for every emitted
    /// [`QuizQuestion`](crate::models::QuizQuestion).
    async fn send_quiz_poll(
        &self,
        question: &str,
        options: &[String],
        correct_index: usize,
    ) -> Result<(), Box<dyn Error>>;
}

/// Telegram Bot API client bound to one bot token and one channel.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: Client,
    token: String,
    chat_id: String,
}

#[derive(Serialize)]
struct SendPollRequest<'a> {
    chat_id: &'a str,
    question: &'a str,
    options: &'a [String],
    #[serde(rename = "type")]
    poll_type: &'a str,
    correct_option_id: usize,
    is_anonymous: bool,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            chat_id: chat_id.into(),
        }
    }
}

impl SendQuizPoll for TelegramClient {
    #[instrument(level = "debug", skip_all)]
    async fn send_quiz_poll(
        &self,
        question: &str,
        options: &[String],
        correct_index: usize,
    ) -> Result<(), Box<dyn Error>> {
        let url = format!("{TELEGRAM_API_BASE}/bot{}/sendPoll", self.token);
        let question = clamp_chars(question, MAX_QUESTION_CHARS);
        let options = options
            .iter()
            .map(|option| clamp_chars(option, MAX_OPTION_CHARS))
            .collect::<Vec<_>>();
        let request = SendPollRequest {
            chat_id: &self.chat_id,
            question: &question,
            options: &options,
            poll_type: "quiz",
            correct_option_id: correct_index,
            is_anonymous: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await?
            .json::<ApiResponse>()
            .await?;
        if response.ok {
            debug!(chat_id = %self.chat_id, "Quiz poll published");
            Ok(())
        } else {
            let description = response
                .description
                .unwrap_or_else(|| "no description".to_string());
            warn!(chat_id = %self.chat_id, %description, "sendPoll rejected");
            Err(format!("sendPoll rejected: {description}").into())
        }
    }
}

/// Decorator enforcing a fixed cool-down after each publish attempt.
pub struct ThrottledSender<T> {
    inner: T,
    cooldown: Duration,
}

impl<T> ThrottledSender<T>
where
    T: SendQuizPoll,
{
    pub fn new(inner: T, cooldown: Duration) -> Self {
        Self { inner, cooldown }
    }
}

impl<T> SendQuizPoll for ThrottledSender<T>
where
    T: SendQuizPoll,
{
    async fn send_quiz_poll(
        &self,
        question: &str,
        options: &[String],
        correct_index: usize,
    ) -> Result<(), Box<dyn Error>> {
        let result = self.inner.send_quiz_poll(question, options, correct_index).await;
        // The interval applies whether or not the attempt succeeded.
        sleep(self.cooldown).await;
        result
    }
}

/// Truncate to at most `max` characters, on a character boundary.
fn clamp_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_index, _)) => s[..byte_index].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_poll_request_serialization() {
        let options = vec!["Paris".to_string(), "Rome".to_string()];
        let request = SendPollRequest {
            chat_id: "@quiz_channel",
            question: "Which city?",
            options: &options,
            poll_type: "quiz",
            correct_option_id: 1,
            is_anonymous: true,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["chat_id"], "@quiz_channel");
        assert_eq!(json["type"], "quiz");
        assert_eq!(json["correct_option_id"], 1);
        assert_eq!(json["is_anonymous"], true);
        assert_eq!(json["options"][0], "Paris");
        assert_eq!(json["options"][1], "Rome");
    }

    #[test]
    fn test_api_response_deserialization() {
        let ok: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{"message_id":7}}"#).unwrap();
        assert!(ok.ok);

        let rejected: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"error_code":400,"description":"POLL_OPTION_INVALID"}"#)
                .unwrap();
        assert!(!rejected.ok);
        assert_eq!(rejected.description.as_deref(), Some("POLL_OPTION_INVALID"));
    }

    #[test]
    fn test_clamp_chars() {
        assert_eq!(clamp_chars("short", 300), "short");
        assert_eq!(clamp_chars("abcdef", 3), "abc");
        // Counts characters, not bytes.
        assert_eq!(clamp_chars("ગુજરાતી", 4), "ગુજર");
    }

    #[tokio::test]
    async fn test_throttled_sender_preserves_inner_result() {
        struct AlwaysFails;
        impl SendQuizPoll for AlwaysFails {
            async fn send_quiz_poll(
                &self,
                _question: &str,
                _options: &[String],
                _correct_index: usize,
            ) -> Result<(), Box<dyn Error>> {
                Err("boom".into())
            }
        }

        let sender = ThrottledSender::new(AlwaysFails, Duration::from_millis(1));
        let options = vec!["a".to_string(), "b".to_string()];
        let result = sender.send_quiz_poll("q", &options, 0).await;
        assert!(result.is_err());
    }
}
