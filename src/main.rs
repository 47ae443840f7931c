//! # Quiz Poll Relay
//!
//! A scrape-and-republish pipeline that turns daily current-affairs quiz
//! pages into interactive Telegram quiz polls.
//!
//! ## Features
//!
//! - Discovers quiz-page links from the GKToday listing page
//! - Skips pages already processed (PostgreSQL-backed seen-link store)
//! - Extracts question/options/correct-answer triples from the quiz markup,
//!   tolerating the site's two answer-encoding conventions
//! - Translates question and option texts before publishing
//! - Publishes each question as an anonymous Telegram quiz poll, throttled
//!   to respect the Bot API's rate limits
//!
//! ## Usage
//!
//! ```sh
//! DATABASE_URL=... BOT_TOKEN=... TELEGRAM_CHANNEL_USERNAME=... quiz_poll_relay
//! ```
//!
//! ## Architecture
//!
//! One run is a single pass of a sequential pipeline:
//! 1. **Discovery**: Fetch the listing page and enumerate quiz-page links
//! 2. **Filtering**: Drop links the seen-link store already knows
//! 3. **Extraction**: Fetch each remaining page and parse its quiz blocks
//! 4. **Publishing**: Translate and post each question, one poll at a time,
//!    then mark the page's URL as seen
//!
//! Failures stay as local as their cause: a bad question block, a failed
//! translation, or a rejected poll is logged and skipped; only missing
//! configuration, an unreachable store, or listing-layout drift abort a run.
//! A crash between publishing and marking leaves the link unmarked, so the
//! next run reprocesses it; duplicate polls are an accepted risk there.

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};
use url::Url;

mod cli;
mod error;
mod models;
mod scrapers;
mod store;
mod telegram;
mod translate;
mod utils;

use cli::Cli;
use models::QuizQuestion;
use store::SeenLinkStore;
use telegram::{SendQuizPoll, TelegramClient, ThrottledSender};
use translate::{Translate, Translator};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("quiz_poll_relay starting up");

    // Parse CLI; missing required configuration aborts here with a named error.
    let args = Cli::parse();
    debug!(
        listing_url = %args.listing_url,
        channel = %args.channel,
        target_language = %args.target_language,
        "Parsed CLI arguments"
    );

    // --- Seen-link store ---
    let store = match SeenLinkStore::connect(&args.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!(error = %e, "Failed to connect to the seen-link store");
            return Err(Box::new(e) as Box<dyn Error>);
        }
    };
    info!("Connected to seen-link store");

    // --- Discovery ---
    let listing_url = Url::parse(&args.listing_url)?;
    let listing_html = reqwest::get(listing_url.clone()).await?.text().await?;
    let links = scrapers::gktoday::index_quiz_links(&listing_html, &listing_url)?;
    info!(count = links.len(), listing_url = %listing_url, "Indexed quiz page links");

    let urls = links.iter().map(|link| link.url.clone()).collect::<Vec<_>>();
    let seen = store.known_urls(&urls).await?;
    let new_links = links
        .iter()
        .filter(|link| !seen.contains(&link.url))
        .collect::<Vec<_>>();

    if new_links.is_empty() {
        info!("No new links to scrape");
        return Ok(());
    }
    info!(
        total = links.len(),
        new = new_links.len(),
        "Filtered already-seen links"
    );

    let translator = Translator::new(&args.target_language);
    let sender = ThrottledSender::new(
        TelegramClient::new(&args.bot_token, &args.channel),
        Duration::from_secs(args.publish_cooldown_secs),
    );

    // --- Per-link pipeline, strictly sequential ---
    let mut published = 0usize;
    let mut skipped = 0usize;
    for link in new_links {
        info!(index = link.index, url = %link.url, "Scraping quiz page");

        let page_html = match fetch_page(&link.url).await {
            Ok(html) => html,
            Err(e) => {
                error!(url = %link.url, error = %e, "Failed to fetch quiz page; skipping link");
                continue;
            }
        };
        let questions = match scrapers::gktoday::extract_questions(&page_html) {
            Ok(questions) => questions,
            Err(e) => {
                warn!(url = %link.url, error = %e, "Quiz page did not match the expected layout; skipping link");
                continue;
            }
        };
        if questions.is_empty() {
            info!(url = %link.url, "No questions found");
            continue;
        }
        info!(url = %link.url, count = questions.len(), "Extracted questions");

        for (position, question) in questions.iter().enumerate() {
            match publish_question(&translator, &sender, question).await {
                Ok(()) => {
                    published += 1;
                    info!(url = %link.url, position, "Published quiz poll");
                }
                Err(e) => {
                    skipped += 1;
                    warn!(
                        url = %link.url,
                        position,
                        error = %e,
                        "Failed to publish question; continuing with the rest"
                    );
                }
            }
        }

        // Marked once extraction succeeded; per-question publish failures do
        // not keep the page eligible for reprocessing.
        store.mark_seen(&link.url).await?;
        info!(url = %link.url, "Marked link as seen");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        published,
        skipped,
        "Execution complete"
    );

    Ok(())
}

/// Fetch one quiz page's HTML.
async fn fetch_page(url: &str) -> Result<String, Box<dyn Error>> {
    let html = reqwest::get(url).await?.error_for_status()?.text().await?;
    Ok(html)
}

/// Translate one question and publish it as a quiz poll.
///
/// Question text and options are translated one call at a time, in option
/// order, so the translated option list keeps the length and index alignment
/// that `correct_answer` points into.
async fn publish_question<T, S>(
    translator: &T,
    sender: &S,
    question: &QuizQuestion,
) -> Result<(), Box<dyn Error>>
where
    T: Translate,
    S: SendQuizPoll,
{
    let translated_question = translator.translate(&question.question).await?;
    let mut translated_options = Vec::with_capacity(question.options.len());
    for option in &question.options {
        translated_options.push(translator.translate(option).await?);
    }

    sender
        .send_quiz_poll(
            &translated_question,
            &translated_options,
            question.correct_answer,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Translator stand-in that tags each text, keeping inputs recognizable.
    struct TaggingTranslator;

    impl Translate for TaggingTranslator {
        async fn translate(&self, text: &str) -> Result<String, Box<dyn Error>> {
            Ok(format!("t:{text}"))
        }
    }

    #[derive(Default)]
    struct RecordingSender {
        polls: Mutex<Vec<(String, Vec<String>, usize)>>,
    }

    impl SendQuizPoll for RecordingSender {
        async fn send_quiz_poll(
            &self,
            question: &str,
            options: &[String],
            correct_index: usize,
        ) -> Result<(), Box<dyn Error>> {
            self.polls.lock().unwrap().push((
                question.to_string(),
                options.to_vec(),
                correct_index,
            ));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publish_question_keeps_option_alignment() {
        let question = QuizQuestion {
            question: "Which city hosts the summit?".to_string(),
            options: vec!["Paris".to_string(), "Rome".to_string(), "Delhi".to_string()],
            correct_answer: 1,
        };

        let sender = RecordingSender::default();
        publish_question(&TaggingTranslator, &sender, &question)
            .await
            .unwrap();

        let polls = sender.polls.lock().unwrap();
        assert_eq!(polls.len(), 1);
        let (sent_question, sent_options, sent_index) = &polls[0];
        assert_eq!(sent_question, "t:Which city hosts the summit?");
        // Same length, same order, same index as the source record.
        assert_eq!(sent_options, &vec!["t:Paris", "t:Rome", "t:Delhi"]);
        assert_eq!(*sent_index, question.correct_answer);
        assert_eq!(sent_options[*sent_index], "t:Rome");
    }

    #[tokio::test]
    async fn test_publish_question_translation_failure_skips_the_send() {
        struct FailingTranslator;
        impl Translate for FailingTranslator {
            async fn translate(&self, _text: &str) -> Result<String, Box<dyn Error>> {
                Err("translation unavailable".into())
            }
        }

        let question = QuizQuestion {
            question: "q".to_string(),
            options: vec!["a".to_string(), "b".to_string()],
            correct_answer: 0,
        };

        let sender = RecordingSender::default();
        let result = publish_question(&FailingTranslator, &sender, &question).await;
        assert!(result.is_err());
        assert!(sender.polls.lock().unwrap().is_empty());
    }
}
