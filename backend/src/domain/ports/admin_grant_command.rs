//! Driving port for granting the admin role.

use async_trait::async_trait;

use crate::domain::{CallerIdentity, Error};

/// A `grantAdmin` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantAdminRequest {
    /// Authenticated caller, if any.
    pub caller: Option<CallerIdentity>,
    /// Value of the `uid` payload field.
    pub uid: Option<String>,
}

/// Driving port for admin role grants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminGrantCommand: Send + Sync {
    /// Replace the target identity's custom claims with the admin role.
    ///
    /// # Errors
    ///
    /// - `invalid-argument` when `uid` is missing or empty.
    /// - `permission-denied` unless the caller is an admin or a permitted
    ///   self-grant.
    async fn grant_admin(&self, request: GrantAdminRequest) -> Result<(), Error>;
}

/// Fixture implementation accepting every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAdminGrantCommand;

#[async_trait]
impl AdminGrantCommand for FixtureAdminGrantCommand {
    async fn grant_admin(&self, _request: GrantAdminRequest) -> Result<(), Error> {
        Ok(())
    }
}
