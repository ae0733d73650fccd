//! OpenAPI documentation.
//!
//! Registers the callable operations, the change-feed delivery endpoints and
//! the health probes, together with the adapter-layer schema wrappers. The
//! document is served by Swagger UI in debug builds and printed by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::callable::{
    CategoryCommentPayload, GrantAdminPayload, OkResponse, PoiCommentPayload,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::triggers::{
    CommentCreatedDelivery, CommentSnapshot, CommentUpdatedDelivery, TriggerResponse,
};

/// Adds the gateway identity and feed token header schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "CallerUid",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Caller-Uid",
                "Verified caller uid forwarded by the gateway.",
            ))),
        );
        components.add_security_scheme(
            "TriggerToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Trigger-Token",
                "Shared secret presented by the change feed.",
            ))),
        );
    }
}

/// OpenAPI document for the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Torotoro moderation backend",
        description = "Comment moderation, rating aggregation and admin grants."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::callable::approve_comment,
        crate::inbound::http::callable::reject_comment,
        crate::inbound::http::callable::approve_category_comment,
        crate::inbound::http::callable::reject_category_comment,
        crate::inbound::http::callable::grant_admin,
        crate::inbound::http::triggers::comment_created,
        crate::inbound::http::triggers::comment_updated,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        OkResponse,
        PoiCommentPayload,
        CategoryCommentPayload,
        GrantAdminPayload,
        CommentSnapshot,
        CommentCreatedDelivery,
        CommentUpdatedDelivery,
        TriggerResponse
    )),
    tags(
        (name = "moderation", description = "Approve and reject comments"),
        (name = "admin", description = "Role management"),
        (name = "triggers", description = "Change-feed delivery"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
