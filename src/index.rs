//! Per-thread records for the crawl index.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::result::Topic;
use crate::Result;

/// One thread in the crawl index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Thread number.
    #[serde(rename = "thread")]
    pub thread_id: String,

    /// Crawl date, stored as `dd-mm-YYYY`.
    #[serde(with = "day_month_year")]
    pub date: NaiveDate,

    /// Title of the first topic, if any.
    pub title: String,

    /// Storage folder holding the export.
    #[serde(default)]
    pub folder: Option<String>,

    /// Whether the thread was still open when crawled.
    #[serde(default)]
    pub open: bool,
}

impl IndexEntry {
    /// Entry for a freshly crawled thread, dated today and not yet open.
    #[must_use]
    pub fn from_topics(thread_id: impl Into<String>, topics: &[Topic], folder: Option<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            date: Local::now().date_naive(),
            title: topics.first().map(|t| t.title.clone()).unwrap_or_default(),
            folder,
            open: false,
        }
    }

    /// Parses an entry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the entry to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Flat record: thread, date, title, folder, open flag.
    #[must_use]
    pub fn as_record(&self) -> [String; 5] {
        [
            self.thread_id.clone(),
            self.date.format(day_month_year::FORMAT).to_string(),
            self.title.clone(),
            self.folder.clone().unwrap_or_default(),
            self.open.to_string(),
        ]
    }
}

mod day_month_year {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
