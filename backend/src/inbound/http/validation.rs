//! Request body parsing shared by the callable and trigger handlers.
//!
//! Bodies are read as raw bytes so malformed JSON surfaces as a domain
//! `invalid-argument` error with the usual body shape instead of actix's
//! plain-text extractor error.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::domain::Error;

fn invalid_json(err: &serde_json::Error) -> Error {
    Error::invalid_argument("request body must be JSON").with_details(json!({
        "reason": err.to_string(),
    }))
}

/// Parse a callable payload.
///
/// An empty body, `null` or any other non-object JSON value yields the
/// default payload, leaving each operation to report its own missing fields.
pub(crate) fn parse_callable_payload<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned + Default,
{
    if body.trim_ascii().is_empty() {
        return Ok(T::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(|err| invalid_json(&err))?;
    if !value.is_object() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|err| invalid_json(&err))
}

/// Parse a JSON body that must match `T` exactly.
pub(crate) fn parse_json_body<T>(body: &[u8]) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    serde_json::from_slice(body).map_err(|err| {
        Error::invalid_argument("malformed request body").with_details(json!({
            "reason": err.to_string(),
        }))
    })
}

/// Deserialise a field as a string, treating any other JSON type as absent.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}

/// Deserialise a field as a number, treating any other JSON type as absent.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Deserialise an RFC 3339 timestamp, treating anything else as absent.
pub(crate) fn lenient_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc)),
        _ => None,
    })
}
