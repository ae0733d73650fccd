//! Granting the admin role.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{AdminGrantCommand, GrantAdminRequest, IdentityClaimsRepository};
use crate::domain::{CallerIdentity, CustomClaims, Error, UserId};

const DENIED: &str = "Admin only (or self-grant in dev)";

/// Who may grant the admin role.
///
/// Admins always may. With `allow_self_grant` any authenticated caller may
/// grant the role to their own uid; this exists for development builds and
/// stays off unless the operator turns it on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminGrantPolicy {
    /// Permit callers to grant the role to themselves.
    pub allow_self_grant: bool,
}

impl AdminGrantPolicy {
    /// Whether `caller` may grant the admin role to `target`.
    pub fn permits(self, caller: Option<&CallerIdentity>, target: &UserId) -> bool {
        caller.is_some_and(|caller| {
            caller.is_admin() || (self.allow_self_grant && caller.uid() == target)
        })
    }
}

/// Admin grant service implementing [`AdminGrantCommand`].
#[derive(Clone)]
pub struct AdminGrantService<R> {
    claims: Arc<R>,
    policy: AdminGrantPolicy,
}

impl<R> AdminGrantService<R> {
    /// Create the service over a claims repository.
    pub fn new(claims: Arc<R>, policy: AdminGrantPolicy) -> Self {
        Self { claims, policy }
    }
}

#[async_trait]
impl<R> AdminGrantCommand for AdminGrantService<R>
where
    R: IdentityClaimsRepository,
{
    async fn grant_admin(&self, request: GrantAdminRequest) -> Result<(), Error> {
        let GrantAdminRequest { caller, uid } = request;

        let target = uid
            .filter(|uid| !uid.is_empty())
            .ok_or_else(|| Error::invalid_argument("uid required"))
            .and_then(|uid| {
                UserId::new(uid).map_err(|err| {
                    Error::invalid_argument("uid required")
                        .with_details(json!({ "field": "uid", "reason": err.to_string() }))
                })
            })?;

        if !self.policy.permits(caller.as_ref(), &target) {
            return Err(Error::permission_denied(DENIED));
        }

        self.claims
            .replace_custom_claims(&target, &CustomClaims::admin())
            .await?;

        match caller.as_ref() {
            Some(caller) if !caller.is_admin() => {
                warn!(uid = %target, "admin role self-granted");
            }
            _ => info!(uid = %target, "admin role granted"),
        }
        Ok(())
    }
}
