//! Builders wiring domain services onto the HTTP state ports and the change
//! feed relay.

use std::sync::Arc;

use actix_web::web;

use torotoro_backend::domain::ports::{
    AdminGrantCommand, CommentCreationTrigger, CommentModerationCommand, CommentRepository,
    CommentUpdateTrigger, FixtureCommentRepository, FixtureIdentityClaimsRepository,
    FixtureParentRatingRepository, IdentityClaimsRepository, ParentRatingRepository,
};
use torotoro_backend::domain::{
    AdminGrantPolicy, AdminGrantService, ChangeFeedRelay, CommentModerationService,
    CommentNormalizationService, RatingAggregationService,
};
use torotoro_backend::inbound::http::state::{HttpState, HttpStatePorts};
use torotoro_backend::outbound::persistence::{
    DbPool, DieselCommentChangeFeed, DieselCommentRepository, DieselIdentityClaimsRepository,
    DieselParentRatingRepository,
};

use super::ServerConfig;

/// Build the four driving ports over one set of driven adapters.
fn services_over<C, P, I>(
    comments: Arc<C>,
    parents: Arc<P>,
    claims: Arc<I>,
    policy: AdminGrantPolicy,
) -> HttpStatePorts
where
    C: CommentRepository + 'static,
    P: ParentRatingRepository + 'static,
    I: IdentityClaimsRepository + 'static,
{
    let moderation: Arc<dyn CommentModerationCommand> =
        Arc::new(CommentModerationService::new(Arc::clone(&comments)));
    let admin_grant: Arc<dyn AdminGrantCommand> = Arc::new(AdminGrantService::new(claims, policy));
    let comment_created: Arc<dyn CommentCreationTrigger> =
        Arc::new(CommentNormalizationService::new(Arc::clone(&comments)));
    let comment_updated: Arc<dyn CommentUpdateTrigger> =
        Arc::new(RatingAggregationService::new(comments, parents));

    HttpStatePorts {
        moderation,
        admin_grant,
        comment_created,
        comment_updated,
    }
}

fn diesel_ports(pool: &DbPool, policy: AdminGrantPolicy) -> HttpStatePorts {
    services_over(
        Arc::new(DieselCommentRepository::new(pool.clone())),
        Arc::new(DieselParentRatingRepository::new(pool.clone())),
        Arc::new(DieselIdentityClaimsRepository::new(pool.clone())),
        policy,
    )
}

fn fixture_ports(policy: AdminGrantPolicy) -> HttpStatePorts {
    services_over(
        Arc::new(FixtureCommentRepository),
        Arc::new(FixtureParentRatingRepository),
        Arc::new(FixtureIdentityClaimsRepository),
        policy,
    )
}

/// Everything the server runs, built from one configuration.
pub(super) struct ServerServices {
    pub(super) http_state: web::Data<HttpState>,
    /// Present only with a database; fixtures record no changes.
    pub(super) relay: Option<ChangeFeedRelay>,
}

/// Build HTTP state and the change relay from configuration.
///
/// Uses the Diesel adapters when a pool is configured and fixtures otherwise.
/// The relay shares its handlers with the trigger endpoints.
pub(super) fn build_services(config: &ServerConfig) -> ServerServices {
    let (ports, relay) = match &config.db_pool {
        Some(pool) => {
            let ports = diesel_ports(pool, config.admin_grant_policy);
            let relay = ChangeFeedRelay::new(
                Arc::new(DieselCommentChangeFeed::new(pool.clone())),
                Arc::clone(&ports.comment_created),
                Arc::clone(&ports.comment_updated),
            );
            (ports, Some(relay))
        }
        None => (fixture_ports(config.admin_grant_policy), None),
    };
    let http_state =
        web::Data::new(HttpState::new(ports).with_trigger_token(config.trigger_token.clone()));
    ServerServices { http_state, relay }
}
