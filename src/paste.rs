// Paste records as returned by the `list` call, and the decoder for that
// call's body.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{PastebinError, Result};

/// Prefix of every in-band error the API sends back as plain text.
pub const BAD_REQUEST_PREFIX: &str = "Bad API request";

const NO_PASTES: &str = "No pastes found";

/// Paste access level, sent and received as `0`, `1` or `2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Unlisted,
    Private,
}

impl Visibility {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "0" => Some(Visibility::Public),
            "1" => Some(Visibility::Unlisted),
            "2" => Some(Visibility::Private),
            _ => None,
        }
    }

    /// Value of the `api_paste_private` form field.
    pub fn code(self) -> &'static str {
        match self {
            Visibility::Public => "0",
            Visibility::Unlisted => "1",
            Visibility::Private => "2",
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Public => "Public",
            Visibility::Unlisted => "Unlisted",
            Visibility::Private => "Private",
        })
    }
}

impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Visibility::from_code(code.trim()).unwrap_or_default())
    }
}

/// One entry of the `list` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PasteRecord {
    #[serde(rename = "paste_key")]
    pub key: String,
    /// Creation time, seconds since the epoch.
    #[serde(rename = "paste_date", default, deserialize_with = "lenient_number")]
    pub date: i64,
    #[serde(rename = "paste_title", default)]
    pub title: String,
    #[serde(rename = "paste_size", default, deserialize_with = "lenient_number")]
    pub size: u64,
    /// Expiry time, seconds since the epoch; 0 means never.
    #[serde(rename = "paste_expire_date", default, deserialize_with = "lenient_number")]
    pub expire_date: i64,
    #[serde(rename = "paste_private", default)]
    pub visibility: Visibility,
    #[serde(rename = "paste_format_long", default)]
    pub format_long: String,
    #[serde(rename = "paste_format_short", default)]
    pub format_short: String,
    #[serde(rename = "paste_url", default)]
    pub url: String,
    #[serde(rename = "paste_hits", default, deserialize_with = "lenient_number")]
    pub hits: u64,
}

/// Numeric fields decode to zero when they do not parse.
pub(crate) fn lenient_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().parse().unwrap_or_default())
}

// The list body is a run of sibling <paste> elements with no root.
#[derive(Deserialize)]
struct PasteList {
    #[serde(rename = "paste", default)]
    pastes: Vec<PasteRecord>,
}

/// Decode the body of a successful `list` call, keeping server order.
pub fn parse_paste_list(body: &str) -> Result<Vec<PasteRecord>> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with(NO_PASTES) {
        return Ok(Vec::new());
    }
    if trimmed.starts_with(BAD_REQUEST_PREFIX) {
        return Err(PastebinError::Rejected(trimmed.to_string()));
    }

    let wrapped = format!("<root>{body}</root>");
    let list: PasteList = serde_xml_rs::from_str(&wrapped).map_err(|e| PastebinError::Parse {
        reason: e.to_string(),
    })?;

    if let Some(index) = list.pastes.iter().position(|p| p.key.is_empty()) {
        return Err(PastebinError::Parse {
            reason: format!("paste #{} has an empty paste_key", index + 1),
        });
    }

    debug!(count = list.pastes.len(), "decoded paste list");
    Ok(list.pastes)
}

fn format_timestamp(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

/// Byte count with a binary suffix, e.g. `512B` or `1.50KB`.
pub fn human_size(bytes: u64) -> String {
    const SUFFIXES: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    let mut suffix = 0;
    while value >= 1024.0 && suffix < SUFFIXES.len() - 1 {
        value /= 1024.0;
        suffix += 1;
    }
    if suffix == 0 {
        format!("{bytes}{}", SUFFIXES[0])
    } else {
        format!("{value:.2}{}", SUFFIXES[suffix])
    }
}

impl Display for PasteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title: &str = if self.title.is_empty() {
            "<No title>"
        } else {
            &self.title
        };
        let expires = if self.expire_date == 0 {
            "never".to_string()
        } else {
            format_timestamp(self.expire_date)
        };
        writeln!(f, "title:       {title}")?;
        writeln!(f, "key:         {}", self.key)?;
        writeln!(f, "url:         {}", self.url)?;
        writeln!(f, "size:        {}", human_size(self.size))?;
        writeln!(f, "privacy:     {}", self.visibility)?;
        writeln!(f, "format:      {}", self.format_long)?;
        writeln!(f, "hits:        {}", self.hits)?;
        writeln!(f, "date:        {}", format_timestamp(self.date))?;
        writeln!(f, "expire date: {expires}")
    }
}
