//! Command-line interface definitions for Quiz Poll Relay.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment
//! variables; the required ones (database, bot credential, channel) fail the
//! run at parse time with a named error when absent, so misconfiguration
//! never surfaces halfway through a scrape.

use clap::Parser;

/// Command-line arguments for the Quiz Poll Relay application.
///
/// # Examples
///
/// ```sh
/// # Everything from the environment
/// DATABASE_URL=postgres://localhost/quiz_poll_relay \
/// BOT_TOKEN=123456:ABC... \
/// TELEGRAM_CHANNEL_USERNAME=@my_channel \
/// quiz_poll_relay
///
/// # Override the target language and slow the publish rate
/// quiz_poll_relay --target-language hi --publish-cooldown-secs 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// PostgreSQL connection string for the seen-link store
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Telegram bot token used to publish polls
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: String,

    /// Channel to publish to (@username or numeric chat id)
    #[arg(long, env = "TELEGRAM_CHANNEL_USERNAME")]
    pub channel: String,

    /// Listing page enumerating the daily quiz pages
    #[arg(
        long,
        env = "QUIZ_LISTING_URL",
        default_value = "https://www.gktoday.in/gk-current-affairs-quiz-questions-answers/"
    )]
    pub listing_url: String,

    /// Language code the questions are translated into before publishing
    #[arg(long, env = "TARGET_LANGUAGE", default_value = "gu")]
    pub target_language: String,

    /// Seconds to wait after each poll publication
    #[arg(long, env = "PUBLISH_COOLDOWN_SECS", default_value_t = 3)]
    pub publish_cooldown_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "quiz_poll_relay",
            "--database-url",
            "postgres://localhost/quiz",
            "--bot-token",
            "123456:token",
            "--channel",
            "@quiz_channel",
        ]
    }

    #[test]
    fn test_cli_parsing_with_defaults() {
        let cli = Cli::parse_from(base_args());

        assert_eq!(cli.database_url, "postgres://localhost/quiz");
        assert_eq!(cli.bot_token, "123456:token");
        assert_eq!(cli.channel, "@quiz_channel");
        assert_eq!(cli.target_language, "gu");
        assert_eq!(cli.publish_cooldown_secs, 3);
        assert!(cli.listing_url.contains("gktoday.in"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut args = base_args();
        args.extend([
            "--listing-url",
            "https://www.gktoday.in/other-listing/",
            "--target-language",
            "hi",
            "--publish-cooldown-secs",
            "5",
        ]);
        let cli = Cli::parse_from(args);

        assert_eq!(cli.listing_url, "https://www.gktoday.in/other-listing/");
        assert_eq!(cli.target_language, "hi");
        assert_eq!(cli.publish_cooldown_secs, 5);
    }
}
