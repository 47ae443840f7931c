//! GKToday quiz scraper.
//!
//! Parses two page shapes from [GKToday](https://www.gktoday.in):
//!
//! 1. The **listing page** enumerating daily quiz pages, handled by
//!    [`index_quiz_links`]
//! 2. An individual **quiz page** holding question blocks, handled by
//!    [`extract_questions`]
//!
//! Both live inside the same content container (`div.inside_post.column
//! .content_width`). A quiz block is a `div.wp_quiz_question.testclass`
//! element; its options and answer annotation are the nearest following
//! `div.wp_quiz_question_options` and `div.wp_basic_quiz_answer` elements.
//!
//! # Answer conventions
//!
//! The site has used two inconsistent encodings for the correct answer
//! across eras, so the answer is resolved through an ordered strategy list
//! (first success wins, see [`ANSWER_STRATEGIES`]):
//!
//! 1. The answer block's `div.ques_answer` text, e.g. `"Correct Answer: B
//!    [Rome]"`: take the segment after the last colon, map its first
//!    letter `A`-`D` to an option index.
//! 2. A `.wp_quiz_correct_answer` element nested in the question block
//!    itself, whose text starts with the letter.
//!
//! A block whose answer cannot be resolved, or that yields fewer than two
//! options, is dropped with a warning; its siblings are unaffected.

use crate::error::ScrapeError;
use crate::models::{Link, QuizQuestion};
use crate::utils::truncate_for_log;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

static CONTENT_CONTAINER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.inside_post.column.content_width").unwrap());
static ANCHOR_WITH_HREF: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static QUIZ_QUESTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.wp_quiz_question.testclass").unwrap());
static QUIZ_OPTIONS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.wp_quiz_question_options").unwrap());
static QUIZ_ANSWER_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.wp_basic_quiz_answer").unwrap());
static QUES_ANSWER: Lazy<Selector> = Lazy::new(|| Selector::parse("div.ques_answer").unwrap());
static INLINE_CORRECT_ANSWER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wp_quiz_correct_answer").unwrap());

/// Matches exactly one leading bracketed single-character marker, e.g. the
/// `"[A] "` or `"[ ] "` prefix on an option line. Not a general bracket
/// stripper: one character between the brackets, one replacement per line.
static OPTION_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\[.\]\s*").unwrap());

/// Index the listing page to enumerate quiz-page links.
///
/// Finds every `<a>` with an `href` inside the content container, in
/// document order, assigning 1-based indexes. Relative hrefs are resolved
/// against `base_url`; hrefs that fail to resolve are logged and skipped.
///
/// # Errors
///
/// [`ScrapeError::MissingContainer`] when the content container is absent.
/// That means the listing layout changed, and is deliberately not reported
/// as an empty link list: an empty result would be indistinguishable from
/// "no links today".
pub fn index_quiz_links(html: &str, base_url: &Url) -> Result<Vec<Link>, ScrapeError> {
    let document = Html::parse_document(html);
    let container = content_container(&document)?;

    let mut links = Vec::new();
    for element in container.select(&ANCHOR_WITH_HREF) {
        if let Some(href) = element.value().attr("href") {
            match base_url.join(href) {
                Ok(resolved) => links.push(Link {
                    index: links.len() + 1,
                    url: resolved.to_string(),
                }),
                Err(e) => warn!(href, error = %e, "Skipping unresolvable link"),
            }
        }
    }

    debug!(count = links.len(), "Indexed listing page links");
    Ok(links)
}

/// Extract every publishable quiz question from one quiz page.
///
/// Walks the content container's descendants once in document order,
/// segmenting quiz blocks: a question element opens a block, and the nearest
/// following options and answer elements before the next question element
/// belong to it. Blocks failing the acceptance rule (at least two options
/// and a correct-answer index inside the option list) are dropped with a
/// warning. Output order is the page's question order.
///
/// The function is pure in the page HTML: identical input yields identical
/// records on every call.
///
/// # Errors
///
/// [`ScrapeError::MissingContainer`] when the content container is absent.
pub fn extract_questions(html: &str) -> Result<Vec<QuizQuestion>, ScrapeError> {
    let document = Html::parse_document(html);
    let container = content_container(&document)?;

    let mut questions = Vec::new();
    let mut current: Option<QuizBlock> = None;

    for node in container.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if QUIZ_QUESTION.matches(&element) {
            if let Some(block) = current.take() {
                questions.extend(build_question(&block));
            }
            current = Some(QuizBlock::new(element));
        } else if let Some(block) = current.as_mut() {
            if block.options.is_none() && QUIZ_OPTIONS.matches(&element) {
                block.options = Some(element);
            } else if block.answer.is_none() && QUIZ_ANSWER_BLOCK.matches(&element) {
                block.answer = Some(element);
            }
        }
    }
    if let Some(block) = current.take() {
        questions.extend(build_question(&block));
    }

    debug!(count = questions.len(), "Extracted quiz questions");
    Ok(questions)
}

fn content_container<'a>(document: &'a Html) -> Result<ElementRef<'a>, ScrapeError> {
    document
        .select(&CONTENT_CONTAINER)
        .next()
        .ok_or(ScrapeError::MissingContainer)
}

/// One quiz block as segmented out of the page: the question element plus
/// the nearest following options and answer elements, when present.
struct QuizBlock<'a> {
    question: ElementRef<'a>,
    options: Option<ElementRef<'a>>,
    answer: Option<ElementRef<'a>>,
}

impl<'a> QuizBlock<'a> {
    fn new(question: ElementRef<'a>) -> Self {
        Self {
            question,
            options: None,
            answer: None,
        }
    }
}

/// Ordered answer-resolution strategies; the first one returning an index
/// wins. Adding a third site convention later means appending here.
const ANSWER_STRATEGIES: &[fn(&QuizBlock) -> Option<usize>] =
    &[answer_from_answer_block, answer_from_inline_marker];

/// Apply the acceptance rule to one segmented block.
///
/// Returns `None` (after logging a warning) for blocks with fewer than two
/// options or without a determinable in-range answer index.
fn build_question(block: &QuizBlock) -> Option<QuizQuestion> {
    let question = question_text(&block.question);
    let options = block
        .options
        .map(|element| option_lines(&element))
        .unwrap_or_default();

    if options.len() < 2 {
        warn!(
            question = %truncate_for_log(&question, 120),
            option_count = options.len(),
            "Dropping quiz block with fewer than two options"
        );
        return None;
    }

    let Some(correct_answer) = ANSWER_STRATEGIES.iter().find_map(|strategy| strategy(block))
    else {
        warn!(
            question = %truncate_for_log(&question, 120),
            "Dropping quiz block without a determinable correct answer"
        );
        return None;
    };
    if correct_answer >= options.len() {
        warn!(
            question = %truncate_for_log(&question, 120),
            correct_answer,
            option_count = options.len(),
            "Dropping quiz block whose answer index is outside its option list"
        );
        return None;
    }

    Some(QuizQuestion {
        question,
        options,
        correct_answer,
    })
}

/// Collect the question element's visible text, trimmed.
///
/// The secondary-convention answer marker lives inside the question element
/// as a hidden annotation; its text is excluded so the answer letter never
/// leaks into the published question.
fn question_text(question: &ElementRef) -> String {
    let mut text = String::new();
    for node in question.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let inside_marker = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|element| INLINE_CORRECT_ANSWER.matches(&element));
        if !inside_marker {
            text.push_str(fragment);
        }
    }
    text.trim().to_string()
}

/// Split the options element into cleaned option lines.
///
/// Text nodes are joined with `\n` (one option per line on the source
/// markup, separated by `<br>`), each line is stripped of exactly one
/// leading bracketed marker and trimmed, and emptied lines are discarded.
fn option_lines(element: &ElementRef) -> Vec<String> {
    let raw = element.text().collect::<Vec<_>>().join("\n");
    raw.split('\n')
        .map(clean_option_line)
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_option_line(line: &str) -> String {
    OPTION_PREFIX.replace(line, "").trim().to_string()
}

/// Primary answer convention: the answer block's `div.ques_answer` text,
/// split on its last colon.
fn answer_from_answer_block(block: &QuizBlock) -> Option<usize> {
    let answer_block = block.answer?;
    let Some(answer_element) = answer_block.select(&QUES_ANSWER).next() else {
        debug!("Answer block present but ques_answer element missing");
        return None;
    };
    let text = answer_element.text().collect::<String>();
    // The text before the final "Answer: X" segment may itself contain
    // colons, so only the last segment is meaningful.
    let letter = text.rsplit(':').next()?.trim().chars().next()?;
    let index = option_index_for_letter(letter);
    if index.is_none() {
        debug!(%letter, "Answer block letter not in A-D");
    }
    index
}

/// Secondary answer convention: a marker element inside the question block
/// whose text starts with the letter.
fn answer_from_inline_marker(block: &QuizBlock) -> Option<usize> {
    let marker = block.question.select(&INLINE_CORRECT_ANSWER).next()?;
    let text = marker.text().collect::<String>();
    let letter = text.trim().chars().next()?;
    option_index_for_letter(letter)
}

fn option_index_for_letter(letter: char) -> Option<usize> {
    match letter {
        'A' => Some(0),
        'B' => Some(1),
        'C' => Some(2),
        'D' => Some(3),
        _ => None,
    }
}
