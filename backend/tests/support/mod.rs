//! Shared helpers for the HTTP flow tests: an in-memory document store that
//! implements every driven port, and an app factory wiring the real domain
//! services over it.
//!
//! Like the database triggers, the store records every comment insert and
//! every comment write that changes a field, so the change relay sees the
//! same feed it would in production.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use torotoro_backend::Trace;
use torotoro_backend::domain::ports::{
    CommentChange, CommentChangeEvent, CommentChangeFeed, CommentChangeFeedError,
    CommentCreatedEvent, CommentRepository, CommentRepositoryError, CommentUpdatedEvent,
    IdentityClaimsRepository, IdentityClaimsRepositoryError, ParentRatingRepository,
    ParentRatingRepositoryError,
};
use torotoro_backend::domain::{
    AdminGrantPolicy, AdminGrantService, ChangeFeedRelay, CommentFields,
    CommentModerationService, CommentNormalizationService, CommentPatch, CommentRef,
    CommentStatus, CustomClaims, DocumentId, ModerationDecision, ParentCollection,
    RatingAggregate, RatingAggregationService, UserId,
};
use torotoro_backend::inbound::http::state::{HttpState, HttpStatePorts};
use torotoro_backend::inbound::http::{callable, triggers};

type CommentKey = (ParentCollection, String, String);

/// Comment document as held by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredComment {
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub rating: Option<f64>,
    pub approved_by: Option<String>,
    pub rejected_by: Option<String>,
}

impl StoredComment {
    fn fields(&self) -> CommentFields {
        CommentFields {
            status: self.status.clone(),
            created_at: self.created_at,
            rating: self.rating,
            user_id: None,
        }
    }
}

/// Parent document aggregate plus the number of times it was written.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StoredParent {
    pub aggregate: Option<RatingAggregate>,
    pub writes: u32,
}

/// Document store and claims registry kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    comments: Mutex<HashMap<CommentKey, StoredComment>>,
    parents: Mutex<HashMap<(ParentCollection, String), StoredParent>>,
    claims: Mutex<HashMap<String, CustomClaims>>,
    changes: Mutex<ChangeLog>,
}

#[derive(Debug, Default)]
struct ChangeLog {
    last_sequence: i64,
    pending: Vec<CommentChange>,
}

impl ChangeLog {
    fn record(&mut self, event: CommentChangeEvent) {
        self.last_sequence += 1;
        self.pending.push(CommentChange {
            sequence: self.last_sequence,
            event,
        });
    }
}

fn key(target: &CommentRef) -> CommentKey {
    (
        target.parent(),
        target.parent_id().as_str().to_owned(),
        target.comment_id().as_str().to_owned(),
    )
}

impl InMemoryStore {
    pub fn seed_parent(&self, parent: ParentCollection, id: &str) {
        self.parents
            .lock()
            .expect("parents lock")
            .insert((parent, id.to_owned()), StoredParent::default());
    }

    /// Store a comment without recording a change.
    pub fn seed_comment(&self, path: &str, comment: StoredComment) {
        let target: CommentRef = path.parse().expect("comment path");
        self.comments
            .lock()
            .expect("comments lock")
            .insert(key(&target), comment);
    }

    /// Store a comment as a client would, recording its creation.
    pub fn insert_comment(&self, path: &str, comment: StoredComment) {
        let target: CommentRef = path.parse().expect("comment path");
        let value = Some(comment.fields());
        self.comments
            .lock()
            .expect("comments lock")
            .insert(key(&target), comment);
        self.record(CommentChangeEvent::Created(CommentCreatedEvent { target, value }));
    }

    /// Number of recorded changes not yet acknowledged.
    pub fn pending_changes(&self) -> usize {
        self.changes.lock().expect("changes lock").pending.len()
    }

    fn record(&self, event: CommentChangeEvent) {
        self.changes.lock().expect("changes lock").record(event);
    }

    fn record_update(&self, target: &CommentRef, before: CommentFields, after: CommentFields) {
        if before != after {
            self.record(CommentChangeEvent::Updated(CommentUpdatedEvent {
                target: target.clone(),
                before: Some(before),
                after: Some(after),
            }));
        }
    }

    pub fn comment(&self, path: &str) -> Option<StoredComment> {
        let target: CommentRef = path.parse().expect("comment path");
        self.comments
            .lock()
            .expect("comments lock")
            .get(&key(&target))
            .cloned()
    }

    pub fn parent(&self, parent: ParentCollection, id: &str) -> Option<StoredParent> {
        self.parents
            .lock()
            .expect("parents lock")
            .get(&(parent, id.to_owned()))
            .copied()
    }

    pub fn claims(&self, uid: &str) -> Option<CustomClaims> {
        self.claims.lock().expect("claims lock").get(uid).cloned()
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn apply_patch(
        &self,
        target: &CommentRef,
        patch: &CommentPatch,
    ) -> Result<bool, CommentRepositoryError> {
        let (before, after) = {
            let mut comments = self.comments.lock().expect("comments lock");
            let Some(comment) = comments.get_mut(&key(target)) else {
                return Ok(false);
            };
            let before = comment.fields();
            if let Some(status) = patch.status {
                comment.status = Some(status.as_str().to_owned());
            }
            if patch.stamp_created_at {
                comment.created_at = Some(Utc::now());
            }
            if let Some(rating) = patch.rating {
                comment.rating = Some(f64::from(rating.value()));
            }
            (before, comment.fields())
        };
        self.record_update(target, before, after);
        Ok(true)
    }

    async fn record_decision(
        &self,
        target: &CommentRef,
        decision: ModerationDecision,
        moderator: &UserId,
    ) -> Result<bool, CommentRepositoryError> {
        let (before, after) = {
            let mut comments = self.comments.lock().expect("comments lock");
            let Some(comment) = comments.get_mut(&key(target)) else {
                return Ok(false);
            };
            let before = comment.fields();
            comment.status = Some(decision.status().as_str().to_owned());
            match decision {
                ModerationDecision::Approve => comment.approved_by = Some(moderator.to_string()),
                ModerationDecision::Reject => comment.rejected_by = Some(moderator.to_string()),
            }
            (before, comment.fields())
        };
        self.record_update(target, before, after);
        Ok(true)
    }

    async fn approved_ratings(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
    ) -> Result<Vec<Option<f64>>, CommentRepositoryError> {
        let comments = self.comments.lock().expect("comments lock");
        Ok(comments
            .iter()
            .filter(|((collection, id, _), comment)| {
                *collection == parent
                    && id == parent_id.as_str()
                    && CommentStatus::Approved.matches(comment.status.as_deref())
            })
            .map(|(_, comment)| comment.rating)
            .collect())
    }
}

#[async_trait]
impl CommentChangeFeed for InMemoryStore {
    async fn pending_changes(
        &self,
        limit: usize,
    ) -> Result<Vec<CommentChange>, CommentChangeFeedError> {
        let changes = self.changes.lock().expect("changes lock");
        Ok(changes.pending.iter().take(limit).cloned().collect())
    }

    async fn acknowledge(&self, sequence: i64) -> Result<(), CommentChangeFeedError> {
        self.changes
            .lock()
            .expect("changes lock")
            .pending
            .retain(|change| change.sequence != sequence);
        Ok(())
    }
}

#[async_trait]
impl ParentRatingRepository for InMemoryStore {
    async fn write_aggregate(
        &self,
        parent: ParentCollection,
        parent_id: &DocumentId,
        aggregate: RatingAggregate,
    ) -> Result<bool, ParentRatingRepositoryError> {
        let mut parents = self.parents.lock().expect("parents lock");
        let Some(stored) = parents.get_mut(&(parent, parent_id.as_str().to_owned())) else {
            return Ok(false);
        };
        stored.aggregate = Some(aggregate);
        stored.writes += 1;
        Ok(true)
    }
}

#[async_trait]
impl IdentityClaimsRepository for InMemoryStore {
    async fn replace_custom_claims(
        &self,
        uid: &UserId,
        claims: &CustomClaims,
    ) -> Result<(), IdentityClaimsRepositoryError> {
        self.claims
            .lock()
            .expect("claims lock")
            .insert(uid.to_string(), claims.clone());
        Ok(())
    }
}

/// HTTP state running the real services over `store`.
pub fn http_state(store: &Arc<InMemoryStore>, policy: AdminGrantPolicy) -> HttpState {
    HttpState::new(HttpStatePorts {
        moderation: Arc::new(CommentModerationService::new(Arc::clone(store))),
        admin_grant: Arc::new(AdminGrantService::new(Arc::clone(store), policy)),
        comment_created: Arc::new(CommentNormalizationService::new(Arc::clone(store))),
        comment_updated: Arc::new(RatingAggregationService::new(
            Arc::clone(store),
            Arc::clone(store),
        )),
    })
}

/// Change relay running the real handlers over `store`.
pub fn relay(store: &Arc<InMemoryStore>) -> ChangeFeedRelay {
    ChangeFeedRelay::new(
        Arc::clone(store) as Arc<dyn CommentChangeFeed>,
        Arc::new(CommentNormalizationService::new(Arc::clone(store))),
        Arc::new(RatingAggregationService::new(
            Arc::clone(store),
            Arc::clone(store),
        )),
    )
}

/// Poll `probe` until it yields a value, failing after about a second.
pub async fn eventually<T>(mut probe: impl FnMut() -> Option<T>) -> T {
    for _ in 0..200 {
        if let Some(value) = probe() {
            return value;
        }
        actix_web::rt::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within the polling window");
}

/// App with the callable and trigger routes mounted as in production.
pub fn app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(callable::configure))
        .service(web::scope("/triggers").configure(triggers::configure))
}

/// Gateway headers for an admin caller.
pub fn admin_headers(uid: &str) -> [(&'static str, String); 2] {
    [
        ("x-caller-uid", uid.to_owned()),
        ("x-caller-claims", r#"{"role":"admin"}"#.to_owned()),
    ]
}
