//! Caller identity forwarded by the upstream gateway.
//!
//! Identity tokens are verified before requests reach this service. The
//! gateway forwards the verified uid in `X-Caller-Uid` and the token's custom
//! claims, as a JSON object, in `X-Caller-Claims`.

use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use serde_json::Value;
use tracing::warn;

use crate::domain::{CallerIdentity, CustomClaims, UserId};

/// Header carrying the verified caller uid.
pub const CALLER_UID_HEADER: &str = "x-caller-uid";
/// Header carrying the caller's custom claims as JSON.
pub const CALLER_CLAIMS_HEADER: &str = "x-caller-claims";

/// Identity of the caller, or nothing for unauthenticated invocations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext(Option<CallerIdentity>);

impl CallerContext {
    /// Read the caller from request headers.
    ///
    /// A missing or blank uid means an unauthenticated call. Claims that do
    /// not parse are logged and treated as empty.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(uid) = header_str(headers, CALLER_UID_HEADER).and_then(|raw| {
            UserId::new(raw)
                .map_err(|error| warn!(%error, "ignoring caller uid header"))
                .ok()
        }) else {
            return Self(None);
        };

        let claims = header_str(headers, CALLER_CLAIMS_HEADER)
            .map(|raw| {
                parse_claims(raw).unwrap_or_else(|error| {
                    warn!(%error, uid = %uid, "malformed caller claims; treating as none");
                    CustomClaims::default()
                })
            })
            .unwrap_or_default();

        Self(Some(CallerIdentity::new(uid, claims)))
    }

    /// Borrow the identity, if any.
    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.0.as_ref()
    }

    /// Take the identity, if any.
    pub fn into_identity(self) -> Option<CallerIdentity> {
        self.0
    }
}

/// Parse a claims header, accepting only a JSON object.
///
/// Serde reads derived structs from sequences too, so arrays are rejected
/// before deserialising.
fn parse_claims(raw: &str) -> Result<CustomClaims, serde_json::Error> {
    match serde_json::from_str::<Value>(raw)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        other => Err(serde::de::Error::custom(format!(
            "claims must be a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let value = headers.get(name)?;
    match value.to_str() {
        Ok(text) => Some(text),
        Err(error) => {
            warn!(%error, header = name, "ignoring non-ASCII header");
            None
        }
    }
}

impl FromRequest for CallerContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_headers(req.headers())))
    }
}
