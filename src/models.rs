//! Data models for discovered quiz pages and extracted questions.
//!
//! This module defines the two core data structures of the pipeline:
//! - [`Link`]: A quiz-page URL discovered on the listing page
//! - [`QuizQuestion`]: One extracted multiple-choice question, ready for
//!   translation and publishing
//!
//! `QuizQuestion` records are transient: they live from extraction to
//! publishing and are never persisted. Only the page URL that produced them
//! is recorded in the seen-link store.

use serde::{Deserialize, Serialize};

/// A quiz-page link discovered on the listing page.
///
/// The `index` is a 1-based position on the listing page, used only for
/// human-facing enumeration in logs. The `url` string is the durable
/// identity recorded in the seen-link store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// 1-based position of the link on the listing page.
    pub index: usize,
    /// Absolute URL of the quiz page.
    pub url: String,
}

/// One multiple-choice question extracted from a quiz page.
///
/// # Invariant
///
/// `options.len() >= 2` and `correct_answer < options.len()`. The extractor
/// drops any block that cannot satisfy this rather than constructing a record
/// with a sentinel index. Option order matches the source page, so
/// `correct_answer` is positional identity: every downstream transformation
/// (translation in particular) must preserve option count and order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    /// The question text as shown on the source page.
    pub question: String,
    /// The answer options, in source-page order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_answer: usize,
}
