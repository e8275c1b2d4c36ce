// API client module: a small blocking client for the pastebin API.
// Every API call is a form-encoded POST; the HTTP layer sits behind the
// `Transport` trait so the client logic can run against a scripted
// transport in tests.

use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::config::Config;
use crate::error::{PastebinError, Result};
use crate::paste::{parse_paste_list, PasteRecord, BAD_REQUEST_PREFIX};
use crate::upload::UploadRequest;
use crate::user::{parse_user_info, UserInfo};

/// Statuses the list call accepts as success.
const ACCEPTED_LIST_STATUSES: [u16; 2] = [200, 202];

/// `show_paste` answer for pastes that are not the caller's own.
const NO_VIEW_PERMISSION: &str = "Bad API request, invalid permission to view this paste";

/// Form fields in the order they were added. Values are raw bytes so paste
/// content is sent exactly as it was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    fields: Vec<(String, Vec<u8>)>,
}

impl Form {
    pub fn new() -> Self {
        Form::default()
    }

    pub fn text(self, name: &str, value: &str) -> Self {
        self.bytes(name, value.as_bytes())
    }

    pub fn bytes(mut self, name: &str, value: &[u8]) -> Self {
        self.fields.push((name.to_string(), value.to_vec()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Field value, if present and valid UTF-8.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| std::str::from_utf8(v).ok())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode_binary(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Status code and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormResponse {
    pub status: u16,
    pub body: String,
}

impl FormResponse {
    /// Whether the body is the API's plain-text error format.
    pub fn is_bad_request(&self) -> bool {
        self.body.trim_start().starts_with(BAD_REQUEST_PREFIX)
    }
}

/// Sends requests. Only failing to get a response is an error.
pub trait Transport {
    fn post_form(&self, url: &str, form: &Form) -> Result<FormResponse>;
    fn get(&self, url: &str) -> Result<FormResponse>;
}

/// `reqwest` blocking transport.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("pastebiner/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(HttpTransport { client })
    }

    fn finish(url: &str, res: Response) -> Result<FormResponse> {
        let status = res.status().as_u16();
        let body = res.text()?;
        debug!(url, status, bytes = body.len(), "request finished");
        Ok(FormResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn post_form(&self, url: &str, form: &Form) -> Result<FormResponse> {
        let res = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form.encode())
            .send()?;
        Self::finish(url, res)
    }

    fn get(&self, url: &str) -> Result<FormResponse> {
        let res = self.client.get(url).send()?;
        Self::finish(url, res)
    }
}

/// Client for the paste API, holding the config and a transport.
pub struct PastebinClient<T> {
    config: Config,
    transport: T,
}

impl PastebinClient<HttpTransport> {
    /// Client over a real HTTP transport.
    pub fn from_config(config: Config) -> Result<Self> {
        Ok(PastebinClient::new(config, HttpTransport::new()?))
    }
}

impl<T: Transport> PastebinClient<T> {
    pub fn new(config: Config, transport: T) -> Self {
        PastebinClient { config, transport }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Form with the option and both keys every authenticated call carries.
    fn user_form(&self, option: &str, user_key: &str) -> Form {
        Form::new()
            .text("api_option", option)
            .text("api_user_key", user_key)
            .text("api_dev_key", &self.config.dev_key)
    }

    /// Log in and return the user session key.
    ///
    /// The successful body *is* the key; the API has no envelope around it.
    pub fn login(&self) -> Result<String> {
        self.config.ensure_login_ready()?;
        debug!(user = %self.config.login, "logging in");
        let form = Form::new()
            .text("api_dev_key", &self.config.dev_key)
            .text("api_user_name", &self.config.login)
            .text("api_user_password", &self.config.password);
        let res = self.transport.post_form(&self.config.login_url, &form)?;
        if res.is_bad_request() {
            return Err(PastebinError::Authentication(res.body.trim().to_string()));
        }
        Ok(res.body)
    }

    /// Fetch the user's pastes in server order.
    pub fn list_pastes(&self, user_key: &str) -> Result<Vec<PasteRecord>> {
        let form = self
            .user_form("list", user_key)
            .text("api_result_limit", &self.config.list_limit.to_string());
        let res = self.transport.post_form(&self.config.api_url, &form)?;
        if !ACCEPTED_LIST_STATUSES.contains(&res.status) {
            return Err(PastebinError::Request { status: res.status });
        }
        parse_paste_list(&res.body)
    }

    /// Account details of the logged-in user.
    pub fn user_details(&self, user_key: &str) -> Result<UserInfo> {
        let res = self
            .transport
            .post_form(&self.config.api_url, &self.user_form("userdetails", user_key))?;
        parse_user_info(&res.body)
    }

    /// Delete one paste. The response is returned as-is, including in-band errors.
    pub fn delete_paste(&self, user_key: &str, paste_key: &str) -> Result<FormResponse> {
        debug!(paste_key, "deleting paste");
        let form = self
            .user_form("delete", user_key)
            .text("api_paste_key", paste_key);
        self.transport.post_form(&self.config.api_url, &form)
    }

    /// Create a paste. The response is returned unmodified; the API reports
    /// its own failures in the body.
    pub fn create_paste(&self, user_key: &str, request: &UploadRequest) -> Result<FormResponse> {
        debug!(name = %request.name, format = %request.format, "creating paste");
        let form = self
            .user_form("paste", user_key)
            .text("api_paste_name", &request.name)
            .text("api_paste_format", &request.format)
            .bytes("api_paste_code", &request.content)
            .text("api_paste_private", request.visibility.code())
            .text("api_paste_expire_date", &request.expiration);
        self.transport.post_form(&self.config.api_url, &form)
    }

    /// Raw text of a paste.
    ///
    /// Pastes owned by someone else are refused by `show_paste`; those are
    /// fetched from the public raw endpoint instead.
    pub fn show_paste(&self, user_key: &str, paste_key: &str) -> Result<String> {
        let form = self
            .user_form("show_paste", user_key)
            .text("api_paste_key", paste_key);
        let res = self.transport.post_form(&self.config.api_url, &form)?;
        if !res.is_bad_request() {
            return Ok(res.body);
        }

        let refusal = res.body.trim().to_string();
        if !refusal.starts_with(NO_VIEW_PERMISSION) {
            return Err(PastebinError::Rejected(refusal));
        }

        let url = format!("{}/{paste_key}", self.config.raw_url.trim_end_matches('/'));
        debug!(%url, "not our paste, trying the public copy");
        let public = self.transport.get(&url)?;
        if (200..300).contains(&public.status) {
            Ok(public.body)
        } else {
            Err(PastebinError::Rejected(refusal))
        }
    }
}
