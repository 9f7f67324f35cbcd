//! Fetch Loop
//!
//! Obtains a usable rendering of a thread from a flaky endpoint.
//!
//! Transport failures (handshake, connect, truncated body, timeout) and
//! unready pages (non-200 status, empty body, missing root post) are retried
//! after `Options::retry_delay`, without limit unless `Options::max_attempts`
//! is set. A page carrying a terminal marker ends the loop at once. Parser
//! errors are never retried.
//!
//! The network sits behind the [`Transport`] trait so the loop can be driven
//! by scripted responses in tests.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::thread;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;

use crate::classifier::{classify, Verdict};
use crate::empty_log::EmptyThreadLog;
use crate::graph::ReplyGraph;
use crate::parser::PostParser;
use crate::patterns::THREAD_NUMBER;
use crate::result::{FetchOutcome, Topic};
use crate::segmenter::Segmenter;
use crate::text::ordinal;
use crate::{dom, encoding, Error, Options, Result};

// =============================================================================
// Locator
// =============================================================================

/// Where a thread page comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// An `http://` or `https://` URL.
    Remote(Url),
    /// A stored page on disk.
    Local(PathBuf),
}

impl Locator {
    /// Parses a locator. Anything that does not start with an HTTP(S)
    /// scheme is taken as a file path.
    ///
    /// ```
    /// use threadsplit::fetcher::Locator;
    ///
    /// assert!(Locator::parse("https://example.org/b/res/1.html")?.is_remote());
    /// assert!(!Locator::parse("saved/1.html")?.is_remote());
    /// assert!(Locator::parse("http://").is_err());
    /// # Ok::<(), threadsplit::Error>(())
    /// ```
    pub fn parse(locator: &str) -> Result<Self> {
        let trimmed = locator.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Url::parse(trimmed)
                .map(Self::Remote)
                .map_err(|err| Error::InvalidLocator(format!("{trimmed}: {err}")))
        } else {
            Ok(Self::Local(PathBuf::from(trimmed)))
        }
    }

    /// Whether the page is fetched over the network.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Thread number taken from the last path segment (`/b/res/123.html`).
    #[must_use]
    pub fn thread_id(&self) -> Option<String> {
        let path = match self {
            Self::Remote(url) => url.path().to_string(),
            Self::Local(path) => path.to_string_lossy().into_owned(),
        };
        THREAD_NUMBER
            .captures(&path)
            .map(|caps| caps[1].to_string())
    }
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Failure class of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// TLS handshake failed.
    Handshake,
    /// Connection refused, reset or unreachable.
    Connect,
    /// Body truncated or undecodable mid-transfer.
    Body,
    /// Request exceeded the timeout.
    Timeout,
    /// Anything else; retrying would not help.
    Fatal,
}

/// A failed request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct TransportError {
    /// Failure class.
    pub kind: TransportErrorKind,
    /// Human-readable cause.
    pub message: String,
}

impl TransportError {
    /// Creates an error.
    #[must_use]
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Whether the fetch loop should retry after this error.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.kind != TransportErrorKind::Fatal
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let chain = error_chain(&err);
        let lowered = chain.to_lowercase();
        let kind = if err.is_timeout() {
            TransportErrorKind::Timeout
        } else if ["tls", "handshake", "certificate"]
            .iter()
            .any(|needle| lowered.contains(needle))
        {
            TransportErrorKind::Handshake
        } else if err.is_connect() || err.is_request() {
            TransportErrorKind::Connect
        } else if err.is_body() || err.is_decode() {
            TransportErrorKind::Body
        } else {
            TransportErrorKind::Fatal
        };
        Self::new(kind, chain)
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// A response that made it through the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body.
    pub body: String,
}

impl RawPage {
    /// A 200 response with `body`.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Performs one GET request.
pub trait Transport {
    /// Fetches `url` once.
    fn get(&self, url: &Url) -> std::result::Result<RawPage, TransportError>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a client with the timeout and user agent from `options`.
    pub fn new(options: &Options) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(options.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &Url) -> std::result::Result<RawPage, TransportError> {
        let response = self.client.get(url.clone()).send()?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.bytes()?;

        Ok(RawPage {
            status,
            body: encoding::decode(&bytes, content_type.as_deref()),
        })
    }
}

// =============================================================================
// Fetcher
// =============================================================================

/// Runs the fetch loop over a [`Transport`].
#[derive(Debug)]
pub struct Fetcher<T = HttpTransport> {
    transport: T,
    options: Options,
    parser: PostParser,
}

impl Fetcher<HttpTransport> {
    /// Creates a fetcher backed by a real HTTP client.
    pub fn new(options: &Options) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(options)?, options))
    }
}

impl<T: Transport> Fetcher<T> {
    /// Creates a fetcher over any transport.
    pub fn with_transport(transport: T, options: &Options) -> Self {
        Self {
            transport,
            options: options.clone(),
            parser: PostParser::new(options),
        }
    }

    /// The wrapped transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches until a page classifies as a thread or a terminal page.
    pub fn fetch_page(&self, locator: &Locator) -> Result<FetchOutcome> {
        match locator {
            Locator::Remote(url) => self.fetch_remote(url),
            Locator::Local(path) => self.fetch_local(path),
        }
    }

    /// Fetches and segments a thread. Terminal pages yield no topics.
    pub fn fetch_topics(&self, locator: &Locator) -> Result<Vec<Topic>> {
        match self.fetch_page(locator)? {
            FetchOutcome::Complete(graph) => {
                let topics = Segmenter::new(&self.options).segment(&graph);
                info!(%locator, posts = graph.len(), topics = topics.len(), "fetched thread");
                Ok(topics)
            }
            FetchOutcome::Terminal { .. } => Ok(Vec::new()),
        }
    }

    /// Like [`Fetcher::fetch_topics`], recording threads that produced no
    /// topics in `empty_log`.
    pub fn collect(&self, locator: &Locator, empty_log: Option<&EmptyThreadLog>) -> Result<Vec<Topic>> {
        let topics = self.fetch_topics(locator)?;
        if topics.is_empty() {
            if let (Some(log), Some(thread_id)) = (empty_log, locator.thread_id()) {
                log.record(&thread_id)?;
            }
        }
        Ok(topics)
    }

    fn fetch_remote(&self, url: &Url) -> Result<FetchOutcome> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            if let Some(max) = self.options.max_attempts {
                if attempt > max {
                    warn!(%url, attempts = max, "giving up");
                    return Err(Error::RetriesExhausted {
                        locator: url.to_string(),
                        attempts: max,
                    });
                }
            }

            match self.transport.get(url) {
                Err(err) if err.is_transient() => {
                    warn!(%url, attempt = %ordinal(attempt), error = %err, "transport failure, retrying");
                }
                Err(err) => return Err(err.into()),
                Ok(page) if page.status != 200 || page.body.is_empty() => {
                    self.log_retry(url, attempt, &format!("status {}, {} bytes", page.status, page.body.len()));
                }
                Ok(page) => {
                    if let Some(outcome) = self.evaluate(url, &page.body)? {
                        return Ok(outcome);
                    }
                    self.log_retry(url, attempt, "root post missing");
                }
            }

            self.pause();
        }
    }

    fn fetch_local(&self, path: &Path) -> Result<FetchOutcome> {
        let bytes = std::fs::read(path)?;
        let body = encoding::decode(&bytes, None);
        let name = path.display();

        self.evaluate(&name, &body)?
            .ok_or_else(|| Error::RootMissing(path.display().to_string()))
    }

    /// Parses and classifies one page. `None` means "try again".
    fn evaluate(&self, source: &dyn fmt::Display, body: &str) -> Result<Option<FetchOutcome>> {
        let doc = dom::parse(body);
        let (graph, root) = ReplyGraph::from_document(&doc, &self.parser)?;

        match classify(body, root, &self.options.terminal_markers) {
            Verdict::Ok => Ok(Some(FetchOutcome::Complete(graph))),
            Verdict::TerminalSkip(marker) => {
                info!(%source, kind = ?marker.kind, "terminal page, skipping thread");
                Ok(Some(FetchOutcome::Terminal { marker, graph }))
            }
            Verdict::Retry => {
                debug!(%source, ?root, "page has no root post");
                Ok(None)
            }
        }
    }

    fn log_retry(&self, url: &Url, attempt: u32, reason: &str) {
        if self.options.verbose {
            info!(%url, "{} attempt failed ({reason}), retrying", ordinal(attempt));
        } else {
            debug!(%url, "{} attempt failed ({reason}), retrying", ordinal(attempt));
        }
    }

    fn pause(&self) {
        if !self.options.retry_delay.is_zero() {
            thread::sleep(self.options.retry_delay);
        }
    }
}

/// Fetches `locator` over HTTP (or from disk) and segments it into topics.
///
/// Threads that end with no topics are recorded in `empty_log` when given.
pub fn collect_topics(locator: &str, options: &Options, empty_log: Option<&EmptyThreadLog>) -> Result<Vec<Topic>> {
    let locator = Locator::parse(locator)?;
    Fetcher::new(options)?.collect(&locator, empty_log)
}
