use super::codec;
use super::entry::Entry;
use super::types::{Browser, Creator, HAR_VERSION, Page};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::str::FromStr;

/// Main HAR log object, the root of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default = "default_version", deserialize_with = "version_or_default")]
    pub version: String,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub creator: Creator,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub browser: Browser,
    #[serde(default, deserialize_with = "codec::null_as_default")]
    pub pages: Vec<Page>,
    pub entries: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn default_version() -> String {
    HAR_VERSION.to_string()
}

fn version_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_version))
}

/// `{"log": ...}` wrapper written around a log
#[derive(Serialize)]
struct Document<'a> {
    log: &'a Log,
}

impl Log {
    pub fn new(creator: Creator, browser: Browser) -> Self {
        Self {
            version: default_version(),
            creator,
            browser,
            pages: Vec::new(),
            entries: Vec::new(),
            comment: None,
        }
    }

    /// An empty log whose browser and log comments are set to
    /// `default_comment`
    pub fn create_empty(creator: Option<Creator>, default_comment: Option<&str>) -> Self {
        let browser = Browser {
            comment: default_comment.map(str::to_string),
            ..Browser::default()
        };
        let mut log = Self::new(creator.unwrap_or_default(), browser);
        log.comment = default_comment.map(str::to_string);
        log
    }

    /// Parse a `{"log": ...}` document from UTF-8 text or bytes
    pub fn parse(input: impl AsRef<[u8]>) -> Result<Self> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(Error::Format(
                "cannot parse an empty string as HAR".to_string(),
            ));
        }

        let mut document: Value = serde_json::from_slice(input)
            .map_err(|e| Error::Format(format!("malformed JSON document: {}", e)))?;
        let log = document
            .get_mut("log")
            .map(Value::take)
            .ok_or_else(|| Error::Format("missing 'log' key".to_string()))?;
        if !log.get("entries").is_some_and(Value::is_array) {
            return Err(Error::Format("missing 'log.entries' key".to_string()));
        }

        let log: Log = serde_json::from_value(log)
            .map_err(|e| Error::Format(format!("incomplete HAR log: {}", e)))?;
        tracing::debug!("Parsed HAR log with {} entries", log.entries.len());

        Ok(log)
    }

    /// Serialize as a compact `{"log": ...}` document
    pub fn serialize(&self) -> Result<String> {
        serde_json::to_string(&Document { log: self }).map_err(|e| self.transform_error(e))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.serialize().map(String::into_bytes)
    }

    fn transform_error(&self, source: serde_json::Error) -> Error {
        let trace = Backtrace::force_capture().to_string();
        let starting_url = self.entries.first().map(|e| e.request.url.as_str());
        tracing::warn!(
            "Failed to serialize HAR log starting at {}: {}",
            starting_url.unwrap_or("unknown"),
            source
        );
        Error::transform(starting_url, source, trace)
    }

    /// Append every later log's entries to the first log and return it.
    ///
    /// Only entries are merged; the first log's version, creator, browser,
    /// pages and comment are kept as they are. Returns `None` when `logs` is
    /// empty.
    pub fn combine_to_first(logs: impl IntoIterator<Item = Log>) -> Option<Log> {
        let mut logs = logs.into_iter();
        let mut first = logs.next()?;
        for log in logs {
            first.append_entries_from(log);
        }
        Some(first)
    }

    pub fn append_entries_from(&mut self, other: Log) {
        self.entries.extend(other.entries);
    }

    pub fn last_entry(&self) -> Option<&Entry> {
        self.entries.last()
    }

    /// Decoded response body of the last entry, or `default` when there is
    /// no last entry or it has no response
    pub fn last_entry_payload<'a>(&'a self, default: &'a [u8]) -> &'a [u8] {
        self.last_entry()
            .and_then(|e| e.response.as_ref())
            .map_or(default, |r| r.content.try_get_content())
    }
}

impl Default for Log {
    fn default() -> Self {
        Self::create_empty(None, None)
    }
}

impl FromStr for Log {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::har::{Content, Cookie, Header, PostData, Request, Response, Timings};
    use chrono::{TimeZone, Utc};

    fn entry(url: &str, body: &[u8]) -> Entry {
        let request = Request::builder("GET", url, "HTTP/1.1")
            .with_headers(vec![Header::new("Host", "example.com").unwrap()])
            .build()
            .unwrap();
        let response = Response::new(
            200,
            "OK",
            "HTTP/1.1",
            Content::new(body.len() as i64, "text/html", body.to_vec()),
        );
        let started = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Entry::new(started, request, Some(response), Timings::empty())
    }

    fn log_with(urls: &[&str]) -> Log {
        let mut log = Log::create_empty(Some(Creator::new("harkit", "0.3").unwrap()), None);
        log.entries = urls.iter().map(|u| entry(u, b"body")).collect();
        log
    }

    #[test]
    fn test_parse_minimal_document() {
        let log = Log::parse(
            r#"{"log":{"version":"1.2","creator":{"name":"x","version":"1"},"browser":{"name":"y","version":"1"},"pages":[],"entries":[]}}"#,
        )
        .unwrap();
        assert_eq!(log.version, "1.2");
        assert_eq!(log.creator.name, "x");
        assert_eq!(log.browser.name, "y");
        assert!(log.entries.is_empty());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(matches!(Log::parse(""), Err(Error::Format(_))));
        assert!(matches!(Log::parse(Vec::<u8>::new()), Err(Error::Format(_))));
    }

    #[test]
    fn test_parse_missing_keys() {
        assert!(matches!(
            Log::parse(r#"{"entries": []}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(
            Log::parse(r#"{"log": {"version": "1.2"}}"#),
            Err(Error::Format(_))
        ));
        assert!(matches!(Log::parse("[1, 2]"), Err(Error::Format(_))));
    }

    #[test]
    fn test_parse_invalid_json() {
        match Log::parse("{not json") {
            Err(Error::Format(message)) => assert!(message.contains("key must be a string")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_transform_error_carries_trace() {
        let log = log_with(&["http://a/1"]);
        let source = serde_json::from_str::<Value>("x").unwrap_err();

        match log.transform_error(source) {
            Error::Transform {
                starting_url,
                trace,
                ..
            } => {
                assert_eq!(starting_url, "http://a/1");
                assert!(!trace.is_empty());
                assert!(!trace.contains("disabled backtrace"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_entries_not_an_array() {
        for doc in [
            r#"{"log":{"entries":null}}"#,
            r#"{"log":{"entries":{}}}"#,
            r#"{"log":{"entries":"none"}}"#,
        ] {
            assert!(matches!(Log::parse(doc), Err(Error::Format(_))), "{doc}");
        }
    }

    #[test]
    fn test_parse_bad_entry_is_format_error() {
        let doc = r#"{"log":{"entries":[{"startedDateTime":"2024-01-15T10:30:00.000000Z"}]}}"#;
        assert!(matches!(Log::parse(doc), Err(Error::Format(_))));
    }

    #[test]
    fn test_parse_defaults_version() {
        let log: Log = r#"{"log": {"version": null, "entries": []}}"#.parse().unwrap();
        assert_eq!(log.version, "1.2");
        assert_eq!(log.creator, Creator::default());
    }

    #[test]
    fn test_round_trip() {
        let cookie = Cookie::new("sid", "abc")
            .unwrap()
            .with_http_only(true)
            .with_secure(false);
        let request = Request::builder("POST", "http://example.com/form?a=%2F", "HTTP/1.1")
            .with_cookies(vec![cookie.clone()])
            .with_headers(vec![Header::new("Content-Type", "text/plain").unwrap()])
            .with_post_data(PostData::new("text/plain", None, Some("hello".to_string())))
            .with_body_size(5)
            .build()
            .unwrap();
        let response = Response::new(
            201,
            "Created",
            "HTTP/1.1",
            Content::new(3, "application/octet-stream", vec![0u8, 159, 255]),
        )
        .with_cookies(vec![cookie])
        .with_redirect_url("http://example.com/next");
        let started = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap();

        let mut log = Log::create_empty(None, Some("note"));
        log.entries.push(
            Entry::new(started, request, Some(response), Timings::empty())
                .with_server_ip_address("10.0.0.1")
                .with_comment("robots=allowed"),
        );
        log.entries.push(entry("http://example.com/second", b""));

        let text = log.serialize().unwrap();
        assert!(text.starts_with(r#"{"log":{"version":"1.2""#));
        assert!(text.contains(r#""httpOnly":"true""#));
        assert!(text.contains(r#""encoding":"base64""#));

        let parsed = Log::parse(&text).unwrap();
        assert_eq!(parsed, log);
        assert_eq!(Log::parse(log.to_bytes().unwrap()).unwrap(), log);
    }

    #[test]
    fn test_combine_to_first() {
        let first = log_with(&["http://a/1", "http://a/2"]);
        let second = log_with(&["http://b/1", "http://b/2", "http://b/3"]);
        let expected_creator = first.creator.clone();

        let combined = Log::combine_to_first(vec![first, second]).unwrap();
        let urls: Vec<&str> = combined
            .entries
            .iter()
            .map(|e| e.request.url.as_str())
            .collect();
        assert_eq!(
            urls,
            vec!["http://a/1", "http://a/2", "http://b/1", "http://b/2", "http://b/3"]
        );
        assert_eq!(combined.creator, expected_creator);
        assert!(combined.pages.is_empty());
    }

    #[test]
    fn test_combine_to_first_keeps_first_metadata() {
        let mut first = log_with(&["http://a/1"]);
        first.comment = Some("first".to_string());
        let mut second = log_with(&["http://b/1"]);
        second.comment = Some("second".to_string());
        second.browser.name = "other".to_string();

        let combined = Log::combine_to_first([first.clone(), second]).unwrap();
        assert_eq!(combined.comment.as_deref(), Some("first"));
        assert_eq!(combined.browser, first.browser);
        assert_eq!(combined.entries.len(), 2);
    }

    #[test]
    fn test_combine_to_first_empty() {
        assert!(Log::combine_to_first(Vec::<Log>::new()).is_none());
    }

    #[test]
    fn test_last_entry_payload() {
        let log = log_with(&["http://a/1"]);
        assert_eq!(log.last_entry_payload(b"default"), b"body");

        let empty = Log::default();
        assert_eq!(empty.last_entry_payload(b"default"), b"default");

        let mut log = log_with(&["http://a/1"]);
        log.entries[0].response = None;
        assert_eq!(log.last_entry_payload(b""), b"");
    }

    #[test]
    fn test_create_empty() {
        let log = Log::create_empty(None, Some("captured by harkit"));
        assert_eq!(log.version, "1.2");
        assert!(log.entries.is_empty());
        assert!(log.pages.is_empty());
        assert_eq!(log.browser.comment.as_deref(), Some("captured by harkit"));
        assert_eq!(log.comment.as_deref(), Some("captured by harkit"));
        assert_eq!(log.creator, Creator::default());
    }
}
