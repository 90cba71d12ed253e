use super::codec;
use super::message::{Request, Response};
use super::types::{Cache, Timings};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const ROBOTS_KEY: &str = "robots";
const ROBOTS_DISALLOWED: &str = "disallowed";

/// Individual HTTP transaction entry
///
/// `time` is always 0, both for new entries and for entries read from a
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "pageref", skip_serializing_if = "Option::is_none")]
    pub page_ref: Option<String>,
    #[serde(rename = "startedDateTime")]
    pub started_date_time: String,
    #[serde(skip_deserializing)]
    time: i64,
    pub request: Request,
    /// `None` for URLs that were never fetched (robots disallowed)
    pub response: Option<Response>,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub cache: Cache,
    #[serde(default)]
    pub timings: Timings,
    #[serde(rename = "serverIPAddress", skip_serializing_if = "Option::is_none")]
    pub server_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Entry {
    pub fn new(
        started_date_time: DateTime<Utc>,
        request: Request,
        response: Option<Response>,
        timings: Timings,
    ) -> Self {
        Self {
            page_ref: None,
            started_date_time: codec::format_timestamp(&started_date_time),
            time: 0,
            request,
            response,
            cache: Cache::default(),
            timings,
            server_ip_address: None,
            connection: None,
            comment: None,
        }
    }

    pub fn with_page_ref(mut self, page_ref: impl Into<String>) -> Self {
        self.page_ref = Some(page_ref.into());
        self
    }

    pub fn with_cache(mut self, cache: Cache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_server_ip_address(mut self, address: impl Into<String>) -> Self {
        self.server_ip_address = Some(address.into());
        self
    }

    pub fn with_connection(mut self, connection: impl Into<String>) -> Self {
        self.connection = Some(connection.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn time(&self) -> i64 {
        self.time
    }

    pub fn read_started_date_time(&self) -> Result<DateTime<Utc>> {
        codec::parse_timestamp(&self.started_date_time)
    }

    pub fn has_non_empty_response(&self) -> bool {
        self.response
            .as_ref()
            .is_some_and(|r| !r.content.try_get_content().is_empty())
    }

    /// Whether the comment carries `robots=disallowed`.
    ///
    /// The comment is read as a URL query string. Only the first non-blank
    /// `robots` field counts; a comment that yields no such field is not
    /// disallowed.
    pub fn robots_disallowed(&self) -> bool {
        let Some(comment) = &self.comment else {
            return false;
        };

        let query = comment.replace(';', "&");
        form_urlencoded::parse(query.as_bytes())
            .filter(|(_, value)| !value.is_empty())
            .find(|(name, _)| name == ROBOTS_KEY)
            .is_some_and(|(_, value)| value == ROBOTS_DISALLOWED)
    }
}
