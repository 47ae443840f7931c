//! Translation client.
//!
//! Talks to the public Google translate endpoint (`translate_a/single`,
//! `client=gtx`), auto-detecting the source language. The endpoint answers
//! with nested JSON arrays where element `[0]` holds translated segments;
//! [`join_translated_segments`] reassembles them into one string.
//!
//! Translation is best-effort: a failed call surfaces as an error the
//! orchestrator logs before skipping the affected question. Callers translate
//! one text at a time, in order, so translated option lists keep the exact
//! index alignment the quiz poll's correct-option index depends on.

use reqwest::Client;
use serde_json::Value;
use std::error::Error;
use tracing::{debug, instrument};

const TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Anything that can translate one text into a fixed target language.
///
/// The seam exists so the orchestrator's translate-and-publish step can be
/// exercised without the network.
pub trait Translate {
    async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>>;
}

/// Client for the free Google translate endpoint.
#[derive(Debug, Clone)]
pub struct Translator {
    http: Client,
    target_language: String,
}

impl Translator {
    pub fn new(target_language: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            target_language: target_language.into(),
        }
    }
}

impl Translate for Translator {
    /// Translate one text into the configured target language.
    ///
    /// # Errors
    ///
    /// Transport failures, non-success HTTP statuses, and responses that do
    /// not carry the expected segment structure.
    #[instrument(level = "debug", skip_all)]
    async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>> {
        let response = self
            .http
            .get(TRANSLATE_ENDPOINT)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", self.target_language.as_str()),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let translated = join_translated_segments(&response)
            .ok_or("translation response did not contain translated segments")?;
        debug!(
            original_len = text.len(),
            translated_len = translated.len(),
            "Translated text"
        );
        Ok(translated)
    }
}

/// Reassemble the translated text out of the endpoint's segment arrays.
///
/// The response shape is `[[["segment", "source", ...], ...], ...]`; the
/// first element of each inner array is a translated segment.
fn join_translated_segments(response: &Value) -> Option<String> {
    let segments = response.get(0)?.as_array()?;
    let mut translated = String::new();
    for segment in segments {
        if let Some(part) = segment.get(0).and_then(Value::as_str) {
            translated.push_str(part);
        }
    }
    if translated.is_empty() {
        None
    } else {
        Some(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_translated_segments_single() {
        let response = json!([[["પેરિસ", "Paris", null, null]], null, "en"]);
        assert_eq!(
            join_translated_segments(&response),
            Some("પેરિસ".to_string())
        );
    }

    #[test]
    fn test_join_translated_segments_multiple_are_concatenated_in_order() {
        let response = json!([
            [
                ["First sentence. ", "Erster Satz. ", null],
                ["Second sentence.", "Zweiter Satz.", null]
            ],
            null,
            "de"
        ]);
        assert_eq!(
            join_translated_segments(&response),
            Some("First sentence. Second sentence.".to_string())
        );
    }

    #[test]
    fn test_join_translated_segments_rejects_unexpected_shape() {
        assert_eq!(join_translated_segments(&json!({"error": 400})), None);
        assert_eq!(join_translated_segments(&json!([])), None);
        assert_eq!(join_translated_segments(&json!([[]])), None);
    }
}
