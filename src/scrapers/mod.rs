//! Scrapers for the quiz source site.
//!
//! Each supported source gets a submodule exposing two pure functions over
//! fetched page HTML:
//!
//! - `index_quiz_links()`: Enumerate quiz-page links on the listing page
//! - `extract_questions()`: Recover structured questions from one quiz page
//!
//! Keeping the parsing pure (string in, records out) keeps it deterministic
//! and testable against fixture markup; all network I/O stays with the
//! caller. Failed blocks inside a page are logged and skipped rather than
//! failing the whole page.

pub mod gktoday;
