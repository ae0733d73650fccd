//! Callable moderation operations.
//!
//! ```text
//! POST /api/v1/approveComment          {poiId, commentId}
//! POST /api/v1/rejectComment           {poiId, commentId}
//! POST /api/v1/approveCategoryComment  {categoryId, commentId}
//! POST /api/v1/rejectCategoryComment   {categoryId, commentId}
//! POST /api/v1/grantAdmin              {uid}
//! ```
//!
//! Operation names and payload field names are kept as the mobile clients
//! call them. Every operation answers `{"ok": true}` on success.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{GrantAdminRequest, ModerateCommentRequest};
use crate::domain::{ModerationDecision, ParentCollection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::CallerContext;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{lenient_string, parse_callable_payload};

/// Payload addressing a comment under a POI.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoiCommentPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "poi-123")]
    pub poi_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "comment-456")]
    pub comment_id: Option<String>,
}

/// Payload addressing a comment under a category.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCommentPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "restaurants")]
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "comment-456")]
    pub comment_id: Option<String>,
}

/// Payload for `grantAdmin`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct GrantAdminPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub uid: Option<String>,
}

/// Success body shared by every callable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

const OK: OkResponse = OkResponse { ok: true };

async fn moderate(
    state: &HttpState,
    caller: CallerContext,
    parent: ParentCollection,
    decision: ModerationDecision,
    ids: (Option<String>, Option<String>),
) -> ApiResult<web::Json<OkResponse>> {
    let (parent_id, comment_id) = ids;
    state
        .moderation
        .moderate(ModerateCommentRequest {
            caller: caller.into_identity(),
            parent,
            decision,
            parent_id,
            comment_id,
        })
        .await?;
    Ok(web::Json(OK))
}

fn poi_ids(body: &[u8]) -> ApiResult<(Option<String>, Option<String>)> {
    let payload: PoiCommentPayload = parse_callable_payload(body)?;
    Ok((payload.poi_id, payload.comment_id))
}

fn category_ids(body: &[u8]) -> ApiResult<(Option<String>, Option<String>)> {
    let payload: CategoryCommentPayload = parse_callable_payload(body)?;
    Ok((payload.category_id, payload.comment_id))
}

/// Approve a comment on a POI (legacy path).
#[utoipa::path(
    post,
    path = "/api/v1/approveComment",
    request_body = PoiCommentPayload,
    params(
        ("X-Caller-Uid" = Option<String>, Header, description = "Verified caller uid"),
        ("X-Caller-Claims" = Option<String>, Header, description = "Caller custom claims as JSON")
    ),
    responses(
        (status = 200, description = "Comment approved", body = OkResponse),
        (status = 400, description = "Missing poiId or commentId", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "approveComment"
)]
#[post("/approveComment")]
pub async fn approve_comment(
    state: web::Data<HttpState>,
    caller: CallerContext,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    let ids = poi_ids(&body)?;
    moderate(&state, caller, ParentCollection::Pois, ModerationDecision::Approve, ids).await
}

/// Reject a comment on a POI (legacy path).
#[utoipa::path(
    post,
    path = "/api/v1/rejectComment",
    request_body = PoiCommentPayload,
    responses(
        (status = 200, description = "Comment rejected", body = OkResponse),
        (status = 400, description = "Missing poiId or commentId", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "rejectComment"
)]
#[post("/rejectComment")]
pub async fn reject_comment(
    state: web::Data<HttpState>,
    caller: CallerContext,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    let ids = poi_ids(&body)?;
    moderate(&state, caller, ParentCollection::Pois, ModerationDecision::Reject, ids).await
}

/// Approve a comment on a category.
#[utoipa::path(
    post,
    path = "/api/v1/approveCategoryComment",
    request_body = CategoryCommentPayload,
    responses(
        (status = 200, description = "Comment approved", body = OkResponse),
        (status = 400, description = "Missing categoryId or commentId", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "approveCategoryComment"
)]
#[post("/approveCategoryComment")]
pub async fn approve_category_comment(
    state: web::Data<HttpState>,
    caller: CallerContext,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    let ids = category_ids(&body)?;
    moderate(
        &state,
        caller,
        ParentCollection::Categories,
        ModerationDecision::Approve,
        ids,
    )
    .await
}

/// Reject a comment on a category.
#[utoipa::path(
    post,
    path = "/api/v1/rejectCategoryComment",
    request_body = CategoryCommentPayload,
    responses(
        (status = 200, description = "Comment rejected", body = OkResponse),
        (status = 400, description = "Missing categoryId or commentId", body = ErrorSchema),
        (status = 403, description = "Caller is not an admin", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "rejectCategoryComment"
)]
#[post("/rejectCategoryComment")]
pub async fn reject_category_comment(
    state: web::Data<HttpState>,
    caller: CallerContext,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    let ids = category_ids(&body)?;
    moderate(
        &state,
        caller,
        ParentCollection::Categories,
        ModerationDecision::Reject,
        ids,
    )
    .await
}

/// Grant the admin role to `uid`.
#[utoipa::path(
    post,
    path = "/api/v1/grantAdmin",
    request_body = GrantAdminPayload,
    responses(
        (status = 200, description = "Role granted", body = OkResponse),
        (status = 400, description = "Missing uid", body = ErrorSchema),
        (status = 403, description = "Caller may not grant the role", body = ErrorSchema),
        (status = 503, description = "Claims store unavailable", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "grantAdmin"
)]
#[post("/grantAdmin")]
pub async fn grant_admin(
    state: web::Data<HttpState>,
    caller: CallerContext,
    body: web::Bytes,
) -> ApiResult<web::Json<OkResponse>> {
    let payload: GrantAdminPayload = parse_callable_payload(&body)?;
    state
        .admin_grant
        .grant_admin(GrantAdminRequest {
            caller: caller.into_identity(),
            uid: payload.uid,
        })
        .await?;
    Ok(web::Json(OK))
}

/// Register the callable operations on a `/api/v1` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(approve_comment)
        .service(reject_comment)
        .service(approve_category_comment)
        .service(reject_category_comment)
        .service(grant_admin);
}

#[cfg(test)]
#[path = "callable_tests.rs"]
mod tests;
