//! Change-feed delivery endpoints.
//!
//! ```text
//! POST /triggers/comments/created  {document, value}
//! POST /triggers/comments/updated  {document, before, after}
//! ```
//!
//! Each delivery is handled independently. A `2xx` answer acknowledges the
//! event, whether the handler wrote anything or skipped it; anything else
//! asks the feed to redeliver.

use actix_web::{HttpRequest, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{CommentCreatedEvent, CommentUpdatedEvent, TriggerOutcome};
use crate::domain::{CommentFields, CommentRef, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    lenient_number, lenient_string, lenient_timestamp, parse_json_body,
};

/// Header carrying the shared delivery secret.
pub const TRIGGER_TOKEN_HEADER: &str = "x-trigger-token";

/// Comment field values as delivered by the feed.
///
/// Values of the wrong JSON type are treated as absent.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnapshot {
    #[serde(default, deserialize_with = "lenient_string")]
    #[schema(example = "pending")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_number")]
    #[schema(example = 4)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
}

impl From<CommentSnapshot> for CommentFields {
    fn from(snapshot: CommentSnapshot) -> Self {
        Self {
            status: snapshot.status,
            created_at: snapshot.created_at,
            rating: snapshot.rating,
            user_id: snapshot.user_id,
        }
    }
}

/// Delivery of a created comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentCreatedDelivery {
    /// Document path, e.g. `pois/p1/comments/c1`.
    #[schema(example = "pois/p1/comments/c1")]
    pub document: String,
    #[serde(default)]
    pub value: Option<CommentSnapshot>,
}

/// Delivery of an updated comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommentUpdatedDelivery {
    /// Document path, e.g. `pois/p1/comments/c1`.
    #[schema(example = "pois/p1/comments/c1")]
    pub document: String,
    #[serde(default)]
    pub before: Option<CommentSnapshot>,
    #[serde(default)]
    pub after: Option<CommentSnapshot>,
}

/// Acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TriggerResponse {
    /// `applied` or `skipped`.
    #[schema(example = "applied")]
    pub outcome: String,
    /// Why nothing was written, for skipped events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "not-entering-approved")]
    pub reason: Option<String>,
}

impl From<TriggerOutcome> for TriggerResponse {
    fn from(outcome: TriggerOutcome) -> Self {
        match outcome {
            TriggerOutcome::Applied => Self {
                outcome: "applied".to_owned(),
                reason: None,
            },
            TriggerOutcome::Skipped(reason) => Self {
                outcome: "skipped".to_owned(),
                reason: Some(reason.as_str().to_owned()),
            },
        }
    }
}

fn authorize_delivery(state: &HttpState, request: &HttpRequest) -> Result<(), Error> {
    let presented = request
        .headers()
        .get(TRIGGER_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    if state.trigger_token_matches(presented) {
        Ok(())
    } else {
        Err(Error::unauthenticated("invalid trigger token"))
    }
}

fn parse_document(document: &str) -> Result<CommentRef, Error> {
    document.parse::<CommentRef>().map_err(|err| {
        Error::invalid_argument(err.to_string()).with_details(json!({ "field": "document" }))
    })
}

fn acknowledge(
    target: &CommentRef,
    event: &str,
    outcome: TriggerOutcome,
) -> web::Json<TriggerResponse> {
    let response = TriggerResponse::from(outcome);
    info!(
        comment = %target,
        event,
        outcome = %response.outcome,
        reason = response.reason.as_deref().unwrap_or(""),
        "change event handled"
    );
    web::Json(response)
}

/// Handle a comment creation event.
#[utoipa::path(
    post,
    path = "/triggers/comments/created",
    request_body = CommentCreatedDelivery,
    params(
        ("X-Trigger-Token" = Option<String>, Header, description = "Shared delivery secret")
    ),
    responses(
        (status = 200, description = "Event acknowledged", body = TriggerResponse),
        (status = 400, description = "Malformed delivery", body = ErrorSchema),
        (status = 401, description = "Missing or wrong delivery token", body = ErrorSchema),
        (status = 503, description = "Store unavailable; redeliver", body = ErrorSchema)
    ),
    tags = ["triggers"],
    operation_id = "commentCreated"
)]
#[post("/comments/created")]
pub async fn comment_created(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<TriggerResponse>> {
    authorize_delivery(&state, &request)?;
    let delivery: CommentCreatedDelivery = parse_json_body(&body)?;
    let target = parse_document(&delivery.document)?;
    let outcome = state
        .comment_created
        .comment_created(CommentCreatedEvent {
            target: target.clone(),
            value: delivery.value.map(CommentFields::from),
        })
        .await?;
    Ok(acknowledge(&target, "created", outcome))
}

/// Handle a comment update event.
#[utoipa::path(
    post,
    path = "/triggers/comments/updated",
    request_body = CommentUpdatedDelivery,
    params(
        ("X-Trigger-Token" = Option<String>, Header, description = "Shared delivery secret")
    ),
    responses(
        (status = 200, description = "Event acknowledged", body = TriggerResponse),
        (status = 400, description = "Malformed delivery", body = ErrorSchema),
        (status = 401, description = "Missing or wrong delivery token", body = ErrorSchema),
        (status = 503, description = "Store unavailable; redeliver", body = ErrorSchema)
    ),
    tags = ["triggers"],
    operation_id = "commentUpdated"
)]
#[post("/comments/updated")]
pub async fn comment_updated(
    state: web::Data<HttpState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<TriggerResponse>> {
    authorize_delivery(&state, &request)?;
    let delivery: CommentUpdatedDelivery = parse_json_body(&body)?;
    let target = parse_document(&delivery.document)?;
    let outcome = state
        .comment_updated
        .comment_updated(CommentUpdatedEvent {
            target: target.clone(),
            before: delivery.before.map(CommentFields::from),
            after: delivery.after.map(CommentFields::from),
        })
        .await?;
    Ok(acknowledge(&target, "updated", outcome))
}

/// Register the delivery endpoints on a `/triggers` scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(comment_created).service(comment_updated);
}

#[cfg(test)]
#[path = "triggers_tests.rs"]
mod tests;
