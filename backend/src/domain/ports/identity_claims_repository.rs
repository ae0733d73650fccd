//! Port for the custom claims attached to identities.
//!
//! Claims are read by the upstream gateway when it verifies identity tokens
//! and forwards them to this service; the backend only ever replaces them.

use async_trait::async_trait;

use crate::domain::{CustomClaims, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity claims adapters.
    pub enum IdentityClaimsRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } as Unavailable =>
            "claims store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } as Internal =>
            "claims store query failed: {message}",
    }
}

/// Port for custom claims storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityClaimsRepository: Send + Sync {
    /// Replace every custom claim of `uid` with `claims`.
    ///
    /// The uid does not need to be known beforehand.
    async fn replace_custom_claims(
        &self,
        uid: &UserId,
        claims: &CustomClaims,
    ) -> Result<(), IdentityClaimsRepositoryError>;
}

/// Fixture implementation that discards claims.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityClaimsRepository;

#[async_trait]
impl IdentityClaimsRepository for FixtureIdentityClaimsRepository {
    async fn replace_custom_claims(
        &self,
        _uid: &UserId,
        _claims: &CustomClaims,
    ) -> Result<(), IdentityClaimsRepositoryError> {
        Ok(())
    }
}
