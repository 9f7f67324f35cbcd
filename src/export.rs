//! Topic export to JSON or plain text.
//!
//! An empty topic list usually means the fetch hit a block page, not that
//! the thread lost its content, so an existing non-empty file is never
//! replaced with nothing unless the caller forces it.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{info, warn};

use crate::result::Topic;
use crate::Result;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `{"topics": [{"title": ..., "comments": [...]}]}`
    #[default]
    Json,
    /// Title line, one line per comment, blank line between topics.
    Txt,
}

impl Format {
    /// Format implied by a file extension (`json`, `txt`).
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// What [`export`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    /// The file was (re)written.
    Written,
    /// Empty topics would have replaced a non-empty file; nothing was written.
    SkippedEmpty,
}

#[derive(Serialize)]
struct Document<'a> {
    topics: &'a [Topic],
}

/// Renders topics as pretty JSON with a four-space indent.
pub fn to_json(topics: &[Topic]) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    Document { topics }.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Renders topics as plain text.
#[must_use]
pub fn to_txt(topics: &[Topic]) -> String {
    topics
        .iter()
        .map(|topic| {
            let mut block = topic.title.clone();
            for comment in &topic.comments {
                block.push('\n');
                block.push_str(comment);
            }
            block.push('\n');
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Writes `topics` to `path`.
pub fn export(topics: &[Topic], format: Format, path: &Path, force: bool) -> Result<ExportStatus> {
    if topics.is_empty() && !force && has_content(path) {
        warn!(path = %path.display(), "refusing to replace non-empty file with empty topics");
        return Ok(ExportStatus::SkippedEmpty);
    }

    let rendered = match format {
        Format::Json => to_json(topics)?,
        Format::Txt => to_txt(topics),
    };
    fs::write(path, rendered)?;
    info!(path = %path.display(), topics = topics.len(), ?format, "exported topics");
    Ok(ExportStatus::Written)
}

fn has_content(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.len() > 0)
}
