//! Seen-link store backed by PostgreSQL.
//!
//! Records which quiz-page URLs have already been processed so subsequent
//! runs skip them. The table is insert-only: rows are never updated or
//! deleted by this application, and a URL once marked stays excluded until
//! an operator clears the table.

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Durable set of already-processed quiz-page URLs.
pub struct SeenLinkStore {
    pool: PgPool,
}

impl SeenLinkStore {
    /// Connect to the database and ensure the schema exists.
    ///
    /// A connection or migration failure here is startup-fatal for the run;
    /// there is no degraded mode without the store, since re-publishing every
    /// page on every run is exactly what it exists to prevent.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS seen_links (
                url TEXT PRIMARY KEY,
                first_seen TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Return the subset of `urls` that were already processed.
    #[instrument(level = "debug", skip_all, fields(candidates = urls.len()))]
    pub async fn known_urls(&self, urls: &[String]) -> Result<HashSet<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT url FROM seen_links WHERE url = ANY($1)")
                .bind(urls)
                .fetch_all(&self.pool)
                .await?;

        let known = rows.into_iter().map(|(url,)| url).collect::<HashSet<_>>();
        debug!(known = known.len(), "Looked up seen links");
        Ok(known)
    }

    /// Record one URL as processed. Idempotent.
    #[instrument(level = "debug", skip(self))]
    pub async fn mark_seen(&self, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO seen_links (url) VALUES ($1) ON CONFLICT (url) DO NOTHING")
            .bind(url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
