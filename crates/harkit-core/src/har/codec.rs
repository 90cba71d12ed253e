//! Primitive value conversions shared by the HAR entities: text
//! normalization, base64 bodies, timestamps and the string-encoded cookie
//! flags.

use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// `YYYY-MM-DDTHH:MM:SS.ffffffZ`, always UTC with six fractional digits
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Normalize a text or byte value to UTF-8.
///
/// Valid UTF-8 input (any `&str`/`String`, or bytes that decode cleanly) is
/// returned as is. Other bytes are read as Latin-1 and re-encoded, which
/// accepts every byte value. [`Error::Encoding`] names `field` for inputs
/// that cannot be represented at all.
pub fn ensure_utf8(value: impl Into<Vec<u8>>, field: &str) -> Result<String> {
    match String::from_utf8(value.into()) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::debug!("{} is not valid utf-8, decoding as latin-1", field);
            Ok(err.as_bytes().iter().map(|&b| char::from(b)).collect())
        }
    }
}

/// Base64-encode a response body (standard alphabet, padded, unwrapped)
pub fn encode_body(body: impl AsRef<[u8]>) -> String {
    STANDARD.encode(body)
}

/// Decode a base64 response body back to raw bytes
pub fn decode_body(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| Error::Format(format!("Invalid base64 body: {}", e)))
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp written by [`format_timestamp`].
///
/// chrono tolerates fewer fractional digits than the pattern asks for, so
/// the result is formatted back and compared to reject anything that is not
/// in the exact form.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| Error::Format(format!("Invalid timestamp '{}': {}", value, e)))?
        .and_utc();

    if format_timestamp(&parsed) != value {
        return Err(Error::Format(format!(
            "Invalid timestamp '{}': expected YYYY-MM-DDTHH:MM:SS.ffffffZ",
            value
        )));
    }

    Ok(parsed)
}

/// Cookie flags travel as the strings `"true"`/`"false"`. JSON booleans are
/// accepted on read since other HAR producers emit them.
pub(crate) mod string_bool {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(true) => serializer.serialize_str("true"),
            Some(false) => serializer.serialize_str("false"),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Flag>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Flag::Bool(b)) => Ok(Some(b)),
            Some(Flag::Text(text)) => match text.as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(D::Error::custom(format!(
                    "expected \"true\" or \"false\", got {:?}",
                    other
                ))),
            },
        }
    }
}

/// Treat an explicit `null` like a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
