//! Configuration options for fetching and segmenting threads.
//!
//! The `Options` struct carries every tunable constant of the pipeline:
//! retry pacing, the size percentile, the minimum post length and the
//! site-specific terminal markers. Markers change whenever the site changes
//! its block pages, so they are plain data that can be loaded from JSON.

use std::time::Duration;

use serde::Deserialize;

use crate::classifier::TerminalMarker;
use crate::patterns;
use crate::Result;

/// Configuration options for the fetch-and-segment pipeline.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use threadsplit::Options;
///
/// let options = Options {
///     retry_delay: Duration::from_millis(250),
///     size_percentile: 50.0,
///     ..Options::default()
/// };
/// assert_eq!(options.min_post_length, 0);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Pause between attempts after a transport failure or an unready page.
    ///
    /// Default: 1 second
    #[serde(with = "duration_ms")]
    pub retry_delay: Duration,

    /// Per-request HTTP timeout.
    ///
    /// Default: 60 seconds
    #[serde(with = "duration_ms")]
    pub request_timeout: Duration,

    /// Percentile of post sizes used as the noise threshold.
    ///
    /// Posts shorter than this percentile are never topic roots and never
    /// listed as comments.
    ///
    /// Default: `15.0`
    pub size_percentile: f64,

    /// Minimum post length (characters) after normalization.
    ///
    /// Zero accepts every post with non-empty text.
    ///
    /// Default: `0`
    pub min_post_length: usize,

    /// Strings that mark a page as permanently unusable.
    ///
    /// Default: [`patterns::default_terminal_markers`]
    pub terminal_markers: Vec<TerminalMarker>,

    /// Upper bound on fetch attempts per locator.
    ///
    /// `None` retries until the page arrives or the process is stopped.
    ///
    /// Default: `None`
    pub max_attempts: Option<u32>,

    /// Maximum depth of a reply chain walked under one topic root.
    ///
    /// Default: `10_000`
    pub max_chain_depth: usize,

    /// User agent sent with every HTTP request.
    pub user_agent: String,

    /// Log every attempt at `info` instead of `debug`.
    ///
    /// Default: `false`
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(60),
            size_percentile: 15.0,
            min_post_length: 0,
            terminal_markers: patterns::default_terminal_markers(),
            max_attempts: None,
            max_chain_depth: 10_000,
            user_agent: patterns::DEFAULT_USER_AGENT.to_string(),
            verbose: false,
        }
    }
}

impl Options {
    /// Loads options from a JSON document; missing fields keep their defaults.
    ///
    /// Durations are given in milliseconds.
    ///
    /// ```rust
    /// use threadsplit::Options;
    ///
    /// let options = Options::from_json_str(r#"{"retry_delay": 0, "size_percentile": 30}"#)?;
    /// assert!(options.retry_delay.is_zero());
    /// assert_eq!(options.size_percentile, 30.0);
    /// # Ok::<(), threadsplit::Error>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
