//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` so they depend only on domain ports
//! and stay testable without I/O.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::ports::{
    AdminGrantCommand, CommentCreationTrigger, CommentModerationCommand, CommentUpdateTrigger,
};

/// Parameter object bundling the port implementations.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub moderation: Arc<dyn CommentModerationCommand>,
    pub admin_grant: Arc<dyn AdminGrantCommand>,
    pub comment_created: Arc<dyn CommentCreationTrigger>,
    pub comment_updated: Arc<dyn CommentUpdateTrigger>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub moderation: Arc<dyn CommentModerationCommand>,
    pub admin_grant: Arc<dyn AdminGrantCommand>,
    pub comment_created: Arc<dyn CommentCreationTrigger>,
    pub comment_updated: Arc<dyn CommentUpdateTrigger>,
    trigger_token: Option<TokenDigest>,
}

type TokenDigest = [u8; 32];

fn digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

/// Compare two digests without short-circuiting on the first difference.
fn digests_match(left: &TokenDigest, right: &TokenDigest) -> bool {
    left.iter()
        .zip(right)
        .fold(0_u8, |acc, (l, r)| acc | (l ^ r))
        == 0
}

impl HttpState {
    /// Construct state from a ports bundle, with trigger delivery open.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use torotoro_backend::domain::ports::{
    ///     FixtureAdminGrantCommand, FixtureCommentModerationCommand, FixtureCommentTriggers,
    /// };
    /// use torotoro_backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     moderation: Arc::new(FixtureCommentModerationCommand),
    ///     admin_grant: Arc::new(FixtureAdminGrantCommand),
    ///     comment_created: Arc::new(FixtureCommentTriggers),
    ///     comment_updated: Arc::new(FixtureCommentTriggers),
    /// })
    /// .with_trigger_token(Some("s3cret".to_owned()));
    /// assert!(state.trigger_token_matches(Some("s3cret")));
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            moderation,
            admin_grant,
            comment_created,
            comment_updated,
        } = ports;
        Self {
            moderation,
            admin_grant,
            comment_created,
            comment_updated,
            trigger_token: None,
        }
    }

    /// Require change-feed deliveries to present `token`.
    pub fn with_trigger_token(mut self, token: Option<String>) -> Self {
        self.trigger_token = token
            .filter(|token| !token.is_empty())
            .map(|token| digest(&token));
        self
    }

    /// Whether a delivery presenting `presented` is accepted.
    ///
    /// Always true when no token is configured. Only digests are held and
    /// compared, so the check does not leak the token length or prefix.
    pub fn trigger_token_matches(&self, presented: Option<&str>) -> bool {
        match (&self.trigger_token, presented) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(expected), Some(presented)) => digests_match(expected, &digest(presented)),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        FixtureAdminGrantCommand, FixtureCommentModerationCommand, FixtureCommentTriggers,
    };

    fn state(token: Option<&str>) -> HttpState {
        HttpState::new(HttpStatePorts {
            moderation: Arc::new(FixtureCommentModerationCommand),
            admin_grant: Arc::new(FixtureAdminGrantCommand),
            comment_created: Arc::new(FixtureCommentTriggers),
            comment_updated: Arc::new(FixtureCommentTriggers),
        })
        .with_trigger_token(token.map(str::to_owned))
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(None, Some("anything"), true)]
    #[case(Some(""), None, true)]
    #[case(Some("t"), Some("t"), true)]
    #[case(Some("t"), Some("u"), false)]
    #[case(Some("t"), None, false)]
    #[case(Some("t"), Some("tt"), false)]
    #[case(Some("secret"), Some(""), false)]
    fn checks_trigger_token(
        #[case] configured: Option<&str>,
        #[case] presented: Option<&str>,
        #[case] expected: bool,
    ) {
        assert_eq!(state(configured).trigger_token_matches(presented), expected);
    }

    #[rstest]
    fn digest_comparison_checks_every_byte() {
        let expected = digest("feed-secret");
        let mut last_byte_differs = expected;
        last_byte_differs[31] ^= 1;

        assert!(digests_match(&expected, &digest("feed-secret")));
        assert!(!digests_match(&expected, &last_byte_differs));
    }
}
