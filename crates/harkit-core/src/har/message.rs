use super::codec;
use super::query::{QueryOptions, parse_query, query_component};
use super::types::{Content, Cookie, Header, PostData, QueryStringItem};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LINE_TERMINATOR: &str = "\r\n";

fn unknown_size() -> i64 {
    -1
}

/// HTTP request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(rename = "queryString", default)]
    pub query_string: Vec<QueryStringItem>,
    #[serde(rename = "postData", skip_serializing_if = "Option::is_none")]
    pub post_data: Option<PostData>,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Request {
    pub fn builder(
        method: impl Into<String>,
        url: impl AsRef<str>,
        http_version: impl Into<String>,
    ) -> RequestBuilder {
        RequestBuilder {
            method: method.into(),
            url: url.as_ref().trim().to_string(),
            http_version: http_version.into(),
            cookies: Vec::new(),
            headers: Vec::new(),
            query_string: None,
            post_data: None,
            headers_size: None,
            body_size: unknown_size(),
            comment: None,
        }
    }
}

/// Size of a header block: every `name: value` line plus its CRLF
pub fn calculate_headers_size(headers: &[Header]) -> i64 {
    headers
        .iter()
        .map(|h| (h.calculate_size() + LINE_TERMINATOR.len()) as i64)
        .sum()
}

/// Builds a [`Request`], deriving the query string and header size when they
/// are not given.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: String,
    url: String,
    http_version: String,
    cookies: Vec<Cookie>,
    headers: Vec<Header>,
    query_string: Option<Vec<QueryStringItem>>,
    post_data: Option<PostData>,
    headers_size: Option<i64>,
    body_size: i64,
    comment: Option<String>,
}

impl RequestBuilder {
    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query_string(mut self, query_string: Vec<QueryStringItem>) -> Self {
        self.query_string = Some(query_string);
        self
    }

    pub fn with_post_data(mut self, post_data: PostData) -> Self {
        self.post_data = Some(post_data);
        self
    }

    /// Negative sizes are ignored and the size is computed from the headers
    pub fn with_headers_size(mut self, headers_size: i64) -> Self {
        self.headers_size = Some(headers_size);
        self
    }

    pub fn with_body_size(mut self, body_size: i64) -> Self {
        self.body_size = body_size;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn build(self) -> Result<Request> {
        let query_string = match self.query_string {
            Some(items) => items,
            None => query_items_from_url(&self.url)?,
        };

        let headers_size = match self.headers_size {
            Some(size) if size >= 0 => size,
            _ => calculate_headers_size(&self.headers),
        };

        Ok(Request {
            method: self.method,
            url: self.url,
            http_version: self.http_version,
            cookies: self.cookies,
            headers: self.headers,
            query_string,
            post_data: self.post_data,
            headers_size,
            body_size: self.body_size,
            comment: self.comment,
        })
    }
}

fn query_items_from_url(url: &str) -> Result<Vec<QueryStringItem>> {
    let Some(query) = query_component(url) else {
        return Ok(Vec::new());
    };

    parse_query(query, QueryOptions::new().keep_blank_values())?
        .into_iter()
        .map(|(name, value)| QueryStringItem::new(name, value))
        .collect()
}

/// Key casing for [`Response::headers_as_map`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderCase {
    #[default]
    AsIs,
    Lower,
    Upper,
}

impl HeaderCase {
    fn apply(self, name: &str) -> String {
        match self {
            HeaderCase::AsIs => name.to_string(),
            HeaderCase::Lower => name.to_lowercase(),
            HeaderCase::Upper => name.to_uppercase(),
        }
    }
}

/// HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: i64,
    #[serde(rename = "statusText")]
    pub status_text: String,
    #[serde(rename = "httpVersion")]
    pub http_version: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
    #[serde(default)]
    pub headers: Vec<Header>,
    pub content: Content,
    #[serde(
        rename = "redirectURL",
        default,
        deserialize_with = "codec::null_as_default"
    )]
    pub redirect_url: String,
    #[serde(rename = "headersSize", default = "unknown_size")]
    pub headers_size: i64,
    #[serde(rename = "bodySize", default = "unknown_size")]
    pub body_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Response {
    pub fn new(
        status: i64,
        status_text: impl Into<String>,
        http_version: impl Into<String>,
        content: Content,
    ) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            http_version: http_version.into(),
            cookies: Vec::new(),
            headers: Vec::new(),
            content,
            redirect_url: String::new(),
            headers_size: unknown_size(),
            body_size: unknown_size(),
            comment: None,
        }
    }

    pub fn with_cookies(mut self, cookies: Vec<Cookie>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_redirect_url(mut self, redirect_url: impl Into<String>) -> Self {
        self.redirect_url = redirect_url.into();
        self
    }

    pub fn with_headers_size(mut self, headers_size: i64) -> Self {
        self.headers_size = headers_size;
        self
    }

    pub fn with_body_size(mut self, body_size: i64) -> Self {
        self.body_size = body_size;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// First header with the given name, compared case-insensitively
    pub fn try_get_header_by_name(&self, name: &str) -> Option<&Header> {
        let wanted = name.to_lowercase();
        self.headers
            .iter()
            .find(|h| h.name.to_lowercase().trim() == wanted)
    }

    /// Headers keyed by name; a repeated header keeps its last value
    pub fn headers_as_map(&self, case: HeaderCase) -> HashMap<String, String> {
        self.headers
            .iter()
            .map(|h| (case.apply(&h.name), h.value.clone()))
            .collect()
    }
}
