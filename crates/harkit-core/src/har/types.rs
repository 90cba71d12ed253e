use super::codec::{self, ensure_utf8};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written when none is given
pub const HAR_VERSION: &str = "1.2";

/// Value of every timing phase that was not measured
pub const TIMING_NOT_APPLICABLE: i64 = -1;

/// Generic name/value pair; query string items and post params use it as is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValueComment {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

pub type QueryStringItem = NameValueComment;

impl NameValueComment {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<Self> {
        let name = ensure_utf8(name, "name")?;
        let value = ensure_utf8(value, &format!("value (of '{}')", name))?;
        Ok(Self {
            name,
            value,
            comment: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<Vec<u8>>) -> Result<Self> {
        self.comment = Some(ensure_utf8(comment, "comment")?);
        Ok(self)
    }
}

/// HTTP header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Header {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<Self> {
        let NameValueComment { name, value, .. } = NameValueComment::new(name, value)?;
        Ok(Self {
            name,
            value,
            comment: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<Vec<u8>>) -> Result<Self> {
        self.comment = Some(ensure_utf8(comment, "comment")?);
        Ok(self)
    }

    /// The header as sent: `name: value`
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }

    /// Byte length of [`Header::to_line`]
    pub fn calculate_size(&self) -> usize {
        self.name.len() + ": ".len() + self.value.len()
    }
}

/// Cookie
///
/// `httpOnly` and `secure` are written as the strings `"true"`/`"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,
    #[serde(
        rename = "httpOnly",
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::string_bool"
    )]
    pub http_only: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "codec::string_bool"
    )]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Cookie {
    pub fn new(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<Self> {
        let NameValueComment { name, value, .. } = NameValueComment::new(name, value)?;
        Ok(Self {
            name,
            value,
            path: None,
            domain: None,
            expires: None,
            http_only: None,
            secure: None,
            comment: None,
        })
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(codec::format_timestamp(&expires));
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Vec<u8>>) -> Result<Self> {
        self.comment = Some(ensure_utf8(comment, "comment")?);
        Ok(self)
    }
}

/// Creator/Browser information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

pub type Browser = Creator;

impl Creator {
    pub fn new(name: impl Into<Vec<u8>>, version: impl Into<Vec<u8>>) -> Result<Self> {
        Ok(Self {
            name: ensure_utf8(name, "name")?,
            version: ensure_utf8(version, "version")?,
            comment: None,
        })
    }

    pub fn with_comment(mut self, comment: impl Into<Vec<u8>>) -> Result<Self> {
        self.comment = Some(ensure_utf8(comment, "comment")?);
        Ok(self)
    }
}

impl Default for Creator {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: HAR_VERSION.to_string(),
            comment: None,
        }
    }
}

/// Page information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(rename = "startedDateTime")]
    pub started_date_time: String,
    pub id: String,
    pub title: String,
    #[serde(rename = "pageTimings")]
    pub page_timings: PageTimings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Page timing information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageTimings {
    #[serde(rename = "onContentLoad", skip_serializing_if = "Option::is_none")]
    pub on_content_load: Option<f64>,
    #[serde(rename = "onLoad", skip_serializing_if = "Option::is_none")]
    pub on_load: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn not_applicable() -> i64 {
    TIMING_NOT_APPLICABLE
}

/// Per-phase durations in milliseconds, `-1` where a phase does not apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "not_applicable")]
    pub blocked: i64,
    #[serde(default = "not_applicable")]
    pub dns: i64,
    #[serde(default = "not_applicable")]
    pub connect: i64,
    #[serde(default = "not_applicable")]
    pub send: i64,
    #[serde(default = "not_applicable")]
    pub wait: i64,
    #[serde(default = "not_applicable")]
    pub receive: i64,
    #[serde(default = "not_applicable")]
    pub ssl: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Timings {
    pub fn empty() -> Self {
        Self {
            blocked: TIMING_NOT_APPLICABLE,
            dns: TIMING_NOT_APPLICABLE,
            connect: TIMING_NOT_APPLICABLE,
            send: TIMING_NOT_APPLICABLE,
            wait: TIMING_NOT_APPLICABLE,
            receive: TIMING_NOT_APPLICABLE,
            ssl: TIMING_NOT_APPLICABLE,
            comment: None,
        }
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::empty()
    }
}

/// Request body: either form params or raw text, never both
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostBody {
    Params(Vec<NameValueComment>),
    Text(String),
}

/// POST data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PostDataWire", into = "PostDataWire")]
pub struct PostData {
    pub mime_type: String,
    pub body: Option<PostBody>,
    pub comment: Option<String>,
}

impl PostData {
    /// Params take precedence when both params and text are given
    pub fn new(
        mime_type: impl Into<String>,
        params: Option<Vec<NameValueComment>>,
        text: Option<String>,
    ) -> Self {
        let body = match (params, text) {
            (Some(params), _) => Some(PostBody::Params(params)),
            (None, Some(text)) => Some(PostBody::Text(text)),
            (None, None) => None,
        };
        Self {
            mime_type: mime_type.into(),
            body,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn params(&self) -> Option<&[NameValueComment]> {
        match &self.body {
            Some(PostBody::Params(params)) => Some(params),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            Some(PostBody::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct PostDataWire {
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    params: Option<Vec<NameValueComment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl From<PostDataWire> for PostData {
    fn from(wire: PostDataWire) -> Self {
        let mut post_data = PostData::new(wire.mime_type, wire.params, wire.text);
        post_data.comment = wire.comment;
        post_data
    }
}

impl From<PostData> for PostDataWire {
    fn from(post_data: PostData) -> Self {
        let (params, text) = match post_data.body {
            Some(PostBody::Params(params)) => (Some(params), None),
            Some(PostBody::Text(text)) => (None, Some(text)),
            None => (None, None),
        };
        Self {
            mime_type: post_data.mime_type,
            params,
            text,
            comment: post_data.comment,
        }
    }
}

/// Response content. The body is held decoded; on the wire it is always
/// base64 text with `"encoding": "base64"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContentWire", into = "ContentWire")]
pub struct Content {
    pub size: i64,
    pub compression: Option<i64>,
    pub mime_type: String,
    pub body: Vec<u8>,
    pub comment: Option<String>,
}

const BASE64_ENCODING: &str = "base64";

impl Content {
    pub fn new(size: i64, mime_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            size,
            compression: None,
            mime_type: mime_type.into(),
            body: body.into(),
            comment: None,
        }
    }

    pub fn with_compression(mut self, compression: i64) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Decoded body bytes
    pub fn try_get_content(&self) -> &[u8] {
        &self.body
    }

    /// Copy of this content with the body dropped
    pub fn as_empty_text(&self) -> Content {
        Content {
            body: Vec::new(),
            ..self.clone()
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ContentWire {
    size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compression: Option<i64>,
    #[serde(rename = "mimeType")]
    mime_type: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
    encoding: String,
}

impl TryFrom<ContentWire> for Content {
    type Error = Error;

    fn try_from(wire: ContentWire) -> Result<Self> {
        if wire.encoding != BASE64_ENCODING {
            return Err(Error::Format(format!(
                "Unsupported content encoding '{}', expected '{}'",
                wire.encoding, BASE64_ENCODING
            )));
        }
        Ok(Self {
            size: wire.size,
            compression: wire.compression,
            mime_type: wire.mime_type,
            body: codec::decode_body(&wire.text)?,
            comment: wire.comment,
        })
    }
}

impl From<Content> for ContentWire {
    fn from(content: Content) -> Self {
        Self {
            size: content.size,
            compression: content.compression,
            mime_type: content.mime_type,
            text: codec::encode_body(&content.body),
            comment: content.comment,
            encoding: BASE64_ENCODING.to_string(),
        }
    }
}

/// Cache information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    #[serde(rename = "beforeRequest", skip_serializing_if = "Option::is_none")]
    pub before_request: Option<CacheEntry>,
    #[serde(rename = "afterRequest", skip_serializing_if = "Option::is_none")]
    pub after_request: Option<CacheEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Cache entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub expires: Option<String>,
    #[serde(rename = "lastAccess")]
    pub last_access: String,
    #[serde(rename = "eTag")]
    pub e_tag: String,
    #[serde(rename = "hitCount")]
    pub hit_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_header_line_and_size() {
        let header = Header::new("Content-Type", "text/html").unwrap();
        assert_eq!(header.to_line(), "Content-Type: text/html");
        assert_eq!(header.calculate_size(), "Content-Type: text/html".len());
    }

    #[test]
    fn test_header_size_counts_bytes() {
        let header = Header::new("X-Name", "josé").unwrap();
        assert_eq!(header.calculate_size(), header.to_line().len());
        assert_eq!(header.calculate_size(), 13);
    }

    #[test]
    fn test_name_value_latin1_bytes() {
        let item = NameValueComment::new("q", &[0x63u8, 0x61, 0x66, 0xe9][..]).unwrap();
        assert_eq!(item.value, "café");
    }

    #[test]
    fn test_name_value_comment_omitted_when_absent() {
        let item = NameValueComment::new("a", "1").unwrap();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "a", "value": "1"})
        );

        let item = item.with_comment("note").unwrap();
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({"name": "a", "value": "1", "comment": "note"})
        );
    }

    #[test]
    fn test_cookie_flags_are_strings() {
        let expires = Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap();
        let cookie = Cookie::new("sid", "abc")
            .unwrap()
            .with_path("/")
            .with_expires(expires)
            .with_http_only(true)
            .with_secure(false);

        let value = serde_json::to_value(&cookie).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "sid",
                "value": "abc",
                "path": "/",
                "expires": "2030-01-02T03:04:05.000000Z",
                "httpOnly": "true",
                "secure": "false"
            })
        );

        let back: Cookie = serde_json::from_value(value).unwrap();
        assert_eq!(back, cookie);
    }

    #[test]
    fn test_cookie_accepts_json_booleans() {
        let cookie: Cookie = serde_json::from_value(json!({
            "name": "a",
            "value": "b",
            "httpOnly": true,
            "secure": false
        }))
        .unwrap();
        assert_eq!(cookie.http_only, Some(true));
        assert_eq!(cookie.secure, Some(false));

        let bad = serde_json::from_value::<Cookie>(json!({
            "name": "a",
            "value": "b",
            "secure": "yes"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_creator_defaults() {
        let creator = Creator::default();
        assert_eq!(creator.name, "");
        assert_eq!(creator.version, "1.2");
        assert_eq!(creator.comment, None);

        let browser = Browser::new("Firefox", "121.0")
            .and_then(|b| b.with_comment("captured"))
            .unwrap();
        assert_eq!(browser.comment.as_deref(), Some("captured"));
    }

    #[test]
    fn test_timings_default_to_not_applicable() {
        let timings: Timings = serde_json::from_value(json!({"send": 1, "wait": 20})).unwrap();
        assert_eq!(timings.send, 1);
        assert_eq!(timings.wait, 20);
        assert_eq!(timings.blocked, -1);
        assert_eq!(timings.ssl, -1);
        assert_eq!(Timings::default(), Timings::empty());
    }

    #[test]
    fn test_timings_reject_fractional_values() {
        let result = serde_json::from_value::<Timings>(json!({"wait": 12.25}));
        assert!(result.is_err());
    }

    #[test]
    fn test_post_data_params_win_over_text() {
        let params = vec![NameValueComment::new("a", "1").unwrap()];
        let post = PostData::new(
            "application/x-www-form-urlencoded",
            Some(params),
            Some("a=1".to_string()),
        );
        assert_eq!(post.params().map(|p| p.len()), Some(1));
        assert_eq!(post.text(), None);

        let value = serde_json::to_value(&post).unwrap();
        assert!(value.get("text").is_none());
        assert_eq!(value["params"][0]["name"], "a");
    }

    #[test]
    fn test_post_data_text_only() {
        let post = PostData::new("application/json", None, Some("{}".to_string()));
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value, json!({"mimeType": "application/json", "text": "{}"}));

        let back: PostData = serde_json::from_value(value).unwrap();
        assert_eq!(back.text(), Some("{}"));
    }

    #[test]
    fn test_post_data_read_keeps_params_only() {
        let post: PostData = serde_json::from_value(json!({
            "mimeType": "x",
            "params": [{"name": "a", "value": "1"}],
            "text": "a=1"
        }))
        .unwrap();
        assert!(post.params().is_some());
        assert_eq!(post.text(), None);
    }

    #[test]
    fn test_content_wire_is_base64() {
        let content = Content::new(5, "text/plain", b"hello".to_vec());
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "size": 5,
                "mimeType": "text/plain",
                "text": "aGVsbG8=",
                "encoding": "base64"
            })
        );

        let back: Content = serde_json::from_value(value).unwrap();
        assert_eq!(back.try_get_content(), b"hello");
        assert_eq!(back, content);
    }

    #[test]
    fn test_empty_body_still_written() {
        let content = Content::new(0, "text/plain", Vec::new());
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["text"], "");
        assert_eq!(value["encoding"], "base64");
    }

    #[test]
    fn test_content_rejects_other_encodings() {
        let result = serde_json::from_value::<Content>(json!({
            "size": 5,
            "mimeType": "text/plain",
            "text": "hello",
            "encoding": "identity"
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<Content>(json!({
            "size": 5,
            "mimeType": "text/plain",
            "text": "%%%",
            "encoding": "base64"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_as_empty_text() {
        let content = Content::new(5, "text/plain", b"hello".to_vec())
            .with_compression(2)
            .with_comment("gz");
        let empty = content.as_empty_text();
        assert!(empty.body.is_empty());
        assert_eq!(empty.size, 5);
        assert_eq!(empty.compression, Some(2));
        assert_eq!(empty.comment.as_deref(), Some("gz"));
    }

    #[test]
    fn test_cache_defaults_to_empty_object() {
        assert_eq!(serde_json::to_value(Cache::default()).unwrap(), json!({}));
    }
}
