//! Caller identities and custom claims.
//!
//! Identity tokens are verified before requests reach this service; the
//! domain only sees the resulting uid and the custom claims attached to it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role claim value that unlocks moderation and admin grants.
pub const ADMIN_ROLE: &str = "admin";

/// Validation errors for [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdValidationError {
    /// The uid was empty or only whitespace.
    Empty,
}

impl fmt::Display for UserIdValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "uid must not be empty"),
        }
    }
}

impl std::error::Error for UserIdValidationError {}

/// Opaque identity provider uid.
///
/// ## Invariants
/// - Non-empty once trimmed. The value itself is stored untrimmed because
///   providers treat uids as exact strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a uid.
    ///
    /// # Examples
    /// ```
    /// use torotoro_backend::domain::UserId;
    ///
    /// assert!(UserId::new("u-123").is_ok());
    /// assert!(UserId::new("  ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, UserIdValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(UserIdValidationError::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the uid.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

/// Custom claims attached to an identity by a privileged process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomClaims {
    /// Role claim, e.g. `"admin"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl CustomClaims {
    /// Claims granting the admin role.
    pub fn admin() -> Self {
        Self {
            role: Some(ADMIN_ROLE.to_owned()),
        }
    }

    /// Whether the role claim is exactly `"admin"`.
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Authenticated principal behind one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    uid: UserId,
    claims: CustomClaims,
}

impl CallerIdentity {
    /// Combine a uid with the claims read from its token.
    pub fn new(uid: UserId, claims: CustomClaims) -> Self {
        Self { uid, claims }
    }

    /// The caller's uid.
    pub fn uid(&self) -> &UserId {
        &self.uid
    }

    /// The caller's custom claims.
    pub fn claims(&self) -> &CustomClaims {
        &self.claims
    }

    /// Whether the caller carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.claims.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("admin"), true)]
    #[case(Some("Admin"), false)]
    #[case(Some("moderator"), false)]
    #[case(None, false)]
    fn only_exact_admin_role_is_admin(#[case] role: Option<&str>, #[case] expected: bool) {
        let claims = CustomClaims {
            role: role.map(str::to_owned),
        };
        let caller = CallerIdentity::new(UserId::new("caller").expect("uid"), claims);
        assert_eq!(caller.is_admin(), expected);
    }

    #[test]
    fn uid_keeps_exact_value() {
        let uid = UserId::new(" padded ").expect("uid");
        assert_eq!(uid.as_str(), " padded ");
    }

    #[test]
    fn claims_ignore_unknown_keys() {
        let claims: CustomClaims =
            serde_json::from_str(r#"{"role":"admin","tier":"gold"}"#).expect("parse claims");
        assert!(claims.is_admin());
    }
}
