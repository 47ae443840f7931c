//! Error types for the scraping layer.

use thiserror::Error;

/// Structural failures while parsing a scraped page.
///
/// These indicate the source layout no longer matches the fixed markers this
/// crate targets. For the listing page this aborts the run (an empty link
/// list would be indistinguishable from "no links today"); for an individual
/// quiz page the orchestrator logs it and moves on to the next link.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The primary content container is absent from the page.
    #[error("content container `div.inside_post.column.content_width` not found; source layout changed")]
    MissingContainer,
}
