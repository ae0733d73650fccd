//! Tests for the change-feed delivery handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixtureAdminGrantCommand, FixtureCommentModerationCommand, MockCommentCreationTrigger,
    MockCommentUpdateTrigger, SkipReason,
};
use crate::domain::ParentCollection;
use crate::inbound::http::state::HttpStatePorts;

fn state_with(
    created: MockCommentCreationTrigger,
    updated: MockCommentUpdateTrigger,
    token: Option<&str>,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        moderation: Arc::new(FixtureCommentModerationCommand),
        admin_grant: Arc::new(FixtureAdminGrantCommand),
        comment_created: Arc::new(created),
        comment_updated: Arc::new(updated),
    })
    .with_trigger_token(token.map(str::to_owned))
}

fn silent_updates() -> MockCommentUpdateTrigger {
    let mut updated = MockCommentUpdateTrigger::new();
    updated.expect_comment_updated().never();
    updated
}

fn silent_creations() -> MockCommentCreationTrigger {
    let mut created = MockCommentCreationTrigger::new();
    created.expect_comment_created().never();
    created
}

async fn deliver(
    state: HttpState,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/triggers").configure(configure)),
    )
    .await;
    let mut request = test::TestRequest::post().uri(uri).set_json(body);
    if let Some(token) = token {
        request = request.insert_header((TRIGGER_TOKEN_HEADER, token));
    }
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

#[actix_web::test]
async fn creation_event_reaches_handler_with_snapshot() {
    let mut created = MockCommentCreationTrigger::new();
    created
        .expect_comment_created()
        .withf(|event| {
            event.target.parent() == ParentCollection::Pois
                && event.target.comment_id().as_str() == "c1"
                && event.value.as_ref().is_some_and(|fields| {
                    fields.status.as_deref() == Some("approved")
                        && fields.rating == Some(9.0)
                        && fields.created_at.is_some()
                })
        })
        .times(1)
        .return_once(|_| Ok(TriggerOutcome::Applied));

    let (status, body) = deliver(
        state_with(created, silent_updates(), None),
        "/triggers/comments/created",
        None,
        json!({
            "document": "pois/p1/comments/c1",
            "value": {
                "status": "approved",
                "rating": 9,
                "createdAt": "2024-05-01T12:00:00Z",
                "userId": "author"
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outcome": "applied" }));
}

#[actix_web::test]
async fn update_event_reports_skip_reason() {
    let mut updated = MockCommentUpdateTrigger::new();
    updated
        .expect_comment_updated()
        .withf(|event| event.before.is_some() && event.after.is_none())
        .times(1)
        .return_once(|_| Ok(TriggerOutcome::Skipped(SkipReason::MissingSnapshot)));

    let (status, body) = deliver(
        state_with(silent_creations(), updated, None),
        "/triggers/comments/updated",
        None,
        json!({
            "document": "pois/p1/comments/c1",
            "before": { "status": "pending" },
            "after": null
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "outcome": "skipped", "reason": "missing-snapshot" })
    );
}

#[rstest]
#[case(json!({ "document": "pois/p1" }))]
#[case(json!({ "document": "users/u1/comments/c1" }))]
#[case(json!({ "value": {} }))]
#[actix_web::test]
async fn malformed_deliveries_are_rejected(#[case] body: Value) {
    let (status, response) = deliver(
        state_with(silent_creations(), silent_updates(), None),
        "/triggers/comments/created",
        None,
        body,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], json!("invalid-argument"));
}

#[rstest]
#[case(None)]
#[case(Some("wrong"))]
#[actix_web::test]
async fn configured_token_is_enforced(#[case] presented: Option<&str>) {
    let (status, body) = deliver(
        state_with(silent_creations(), silent_updates(), Some("feed-secret")),
        "/triggers/comments/updated",
        presented,
        json!({ "document": "pois/p1/comments/c1" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], json!("unauthenticated"));
}

#[actix_web::test]
async fn matching_token_is_accepted() {
    let mut updated = MockCommentUpdateTrigger::new();
    updated
        .expect_comment_updated()
        .times(1)
        .return_once(|_| Ok(TriggerOutcome::Skipped(SkipReason::NotEnteringApproved)));

    let (status, _) = deliver(
        state_with(silent_creations(), updated, Some("feed-secret")),
        "/triggers/comments/updated",
        Some("feed-secret"),
        json!({
            "document": "pois/p1/comments/c1",
            "before": { "status": "approved" },
            "after": { "status": "approved" }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn handler_failure_asks_for_redelivery() {
    let mut created = MockCommentCreationTrigger::new();
    created
        .expect_comment_created()
        .return_once(|_| Err(crate::domain::Error::unavailable("store down")));

    let (status, _) = deliver(
        state_with(created, silent_updates(), None),
        "/triggers/comments/created",
        None,
        json!({ "document": "pois/p1/comments/c1", "value": {} }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
