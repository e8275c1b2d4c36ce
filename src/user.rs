// Account details returned by the `userdetails` call.

use std::fmt::{self, Display};

use serde::Deserialize;

use crate::error::{PastebinError, Result};
use crate::paste::{lenient_number, Visibility, BAD_REQUEST_PREFIX};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "user_name")]
    pub name: String,
    #[serde(rename = "user_format_short", default)]
    pub format_short: String,
    #[serde(rename = "user_expiration", default)]
    pub expiration: String,
    #[serde(rename = "user_avatar_url", default)]
    pub avatar_url: String,
    /// Default visibility of new pastes on the account.
    #[serde(rename = "user_private", default)]
    pub visibility: Visibility,
    #[serde(rename = "user_website", default)]
    pub website: String,
    #[serde(rename = "user_email", default)]
    pub email: String,
    #[serde(rename = "user_location", default)]
    pub location: String,
    /// 0 for a normal account, 1 for pro.
    #[serde(rename = "user_account_type", default, deserialize_with = "lenient_number")]
    pub account_type: u8,
}

/// Decode the `<user>` element of a `userdetails` response.
pub fn parse_user_info(body: &str) -> Result<UserInfo> {
    let trimmed = body.trim();
    if trimmed.starts_with(BAD_REQUEST_PREFIX) {
        return Err(PastebinError::Rejected(trimmed.to_string()));
    }
    serde_xml_rs::from_str(trimmed).map_err(|e| PastebinError::Parse {
        reason: e.to_string(),
    })
}

fn or_missing<'a>(value: &'a str, missing: &'a str) -> &'a str {
    if value.is_empty() {
        missing
    } else {
        value
    }
}

impl Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let account_type = match self.account_type {
            0 => "normal",
            1 => "pro",
            _ => "<No account type>",
        };
        writeln!(f, "username:     {}", self.name)?;
        writeln!(f, "account type: {account_type}")?;
        writeln!(f, "email:        {}", self.email)?;
        writeln!(f, "website link: {}", or_missing(&self.website, "<No website>"))?;
        writeln!(f, "location:     {}", or_missing(&self.location, "<No location>"))?;
        writeln!(f, "privacy:      {}", self.visibility)?;
        writeln!(f, "format:       {}", self.format_short)?;
        writeln!(f, "expiration:   {}", self.expiration)
    }
}
