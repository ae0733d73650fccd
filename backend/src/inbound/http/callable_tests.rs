//! Tests for the callable operation handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    FixtureAdminGrantCommand, FixtureCommentModerationCommand, FixtureCommentTriggers,
    MockAdminGrantCommand, MockCommentModerationCommand,
};
use crate::domain::{CustomClaims, Error};
use crate::inbound::http::caller::{CALLER_CLAIMS_HEADER, CALLER_UID_HEADER};
use crate::inbound::http::state::HttpStatePorts;

fn state_with(
    moderation: MockCommentModerationCommand,
    admin_grant: MockAdminGrantCommand,
) -> HttpState {
    HttpState::new(HttpStatePorts {
        moderation: Arc::new(moderation),
        admin_grant: Arc::new(admin_grant),
        comment_created: Arc::new(FixtureCommentTriggers),
        comment_updated: Arc::new(FixtureCommentTriggers),
    })
}

fn moderation_state(moderation: MockCommentModerationCommand) -> HttpState {
    let mut grant = MockAdminGrantCommand::new();
    grant.expect_grant_admin().never();
    state_with(moderation, grant)
}

async fn post(state: HttpState, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(web::scope("/api/v1").configure(configure)),
    )
    .await;
    let request = test::TestRequest::post()
        .uri(uri)
        .insert_header((CALLER_UID_HEADER, "admin-1"))
        .insert_header((CALLER_CLAIMS_HEADER, r#"{"role":"admin"}"#))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[case("/api/v1/approveComment", ParentCollection::Pois, ModerationDecision::Approve, r#"{"poiId":"p1","commentId":"c1"}"#)]
#[case("/api/v1/rejectComment", ParentCollection::Pois, ModerationDecision::Reject, r#"{"poiId":"p1","commentId":"c1"}"#)]
#[case("/api/v1/approveCategoryComment", ParentCollection::Categories, ModerationDecision::Approve, r#"{"categoryId":"p1","commentId":"c1"}"#)]
#[case("/api/v1/rejectCategoryComment", ParentCollection::Categories, ModerationDecision::Reject, r#"{"categoryId":"p1","commentId":"c1"}"#)]
#[actix_web::test]
async fn moderation_routes_forward_to_the_port(
    #[case] uri: &str,
    #[case] parent: ParentCollection,
    #[case] decision: ModerationDecision,
    #[case] body: &'static str,
) {
    let mut moderation = MockCommentModerationCommand::new();
    moderation
        .expect_moderate()
        .withf(move |request| {
            request.parent == parent
                && request.decision == decision
                && request.parent_id.as_deref() == Some("p1")
                && request.comment_id.as_deref() == Some("c1")
                && request.caller.as_ref().is_some_and(|caller| {
                    caller.uid().as_str() == "admin-1"
                        && caller.claims() == &CustomClaims::admin()
                })
        })
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = post(moderation_state(moderation), uri, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[actix_web::test]
async fn empty_body_reaches_the_service_without_ids() {
    let mut moderation = MockCommentModerationCommand::new();
    moderation
        .expect_moderate()
        .withf(|request| request.parent_id.is_none() && request.comment_id.is_none())
        .times(1)
        .return_once(|_| Err(Error::invalid_argument("poiId and commentId are required")));

    let (status, body) = post(moderation_state(moderation), "/api/v1/approveComment", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid-argument"));
    assert_eq!(body["message"], json!("poiId and commentId are required"));
}

#[actix_web::test]
async fn malformed_json_is_rejected_before_the_service() {
    let mut moderation = MockCommentModerationCommand::new();
    moderation.expect_moderate().never();

    let (status, body) =
        post(moderation_state(moderation), "/api/v1/rejectComment", "{oops").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], json!("invalid-argument"));
}

#[actix_web::test]
async fn permission_denied_maps_to_forbidden() {
    let mut moderation = MockCommentModerationCommand::new();
    moderation
        .expect_moderate()
        .return_once(|_| Err(Error::permission_denied("Admin only")));

    let (status, body) = post(
        moderation_state(moderation),
        "/api/v1/approveCategoryComment",
        r#"{"categoryId":"k","commentId":"c"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], json!("permission-denied"));
    assert_eq!(body["message"], json!("Admin only"));
}

#[actix_web::test]
async fn grant_admin_forwards_uid() {
    let mut moderation = MockCommentModerationCommand::new();
    moderation.expect_moderate().never();
    let mut grant = MockAdminGrantCommand::new();
    grant
        .expect_grant_admin()
        .withf(|request| request.uid.as_deref() == Some("u-2") && request.caller.is_some())
        .times(1)
        .return_once(|_| Ok(()));

    let (status, body) = post(
        state_with(moderation, grant),
        "/api/v1/grantAdmin",
        r#"{"uid":"u-2"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

#[actix_web::test]
async fn fixture_ports_answer_ok() {
    let state = HttpState::new(HttpStatePorts {
        moderation: Arc::new(FixtureCommentModerationCommand),
        admin_grant: Arc::new(FixtureAdminGrantCommand),
        comment_created: Arc::new(FixtureCommentTriggers),
        comment_updated: Arc::new(FixtureCommentTriggers),
    });
    let (status, _) = post(state, "/api/v1/grantAdmin", r#"{"uid":"u"}"#).await;
    assert_eq!(status, StatusCode::OK);
}
