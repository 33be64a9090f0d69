use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;
use uuid::Uuid;

use accounts::contract::User;
use accounts::infra::token::TokenSigner;
use accounts::Role;
use db::{ConnectOpts, DbHandle};
use properties::api::rest::routes;
use properties::client::{PropertyCache, SnapshotSource};
use properties::domain::events::PropertyEvent;
use properties::domain::repo::PropertiesRepository;
use properties::domain::service::Service;
use properties::infra::broadcast::SsePublisher;
use properties::infra::storage::{ensure_schema, SqlPropertiesRepository};
use properties::VoteDirection;
use restkit::SseBroadcaster;

struct Harness {
    app: Router,
    service: Arc<Service>,
    broadcaster: SseBroadcaster<PropertyEvent>,
    signer: Arc<TokenSigner>,
}

async fn setup() -> Harness {
    // A single connection keeps every statement on the same in-memory database.
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..Default::default()
    };
    let db = DbHandle::connect("sqlite::memory:", opts).await.unwrap();
    ensure_schema(db.pool()).await.unwrap();

    let broadcaster = SseBroadcaster::<PropertyEvent>::new(64);
    let repo = Arc::new(SqlPropertiesRepository::new(db.pool().clone()));
    let publisher = Arc::new(SsePublisher::new(broadcaster.clone()));
    let service = Arc::new(Service::new(repo, publisher));
    let signer = Arc::new(TokenSigner::new("test-secret", Duration::from_secs(3600)));

    Harness {
        app: routes::router(service.clone(), signer.clone(), broadcaster.clone()),
        service,
        broadcaster,
        signer,
    }
}

fn token_for(signer: &TokenSigner, role: Role) -> String {
    let user = User {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", role.as_str()),
        username: None,
        display_name: format!("Test {}", role.as_str()),
        role,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    signer.issue(&user).unwrap()
}

fn claims_for(signer: &TokenSigner, role: Role) -> accounts::Claims {
    signer.verify(&token_for(signer, role)).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_req(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn plain_req(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn create_then_get_roundtrips_all_fields() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Editor);

    let (status, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({
                "address": "123 Main St",
                "zoning": "residential",
                "value": 200000,
                "notes": "corner lot",
                "coordinates": [40.035, -83.025]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();

    let (status, fetched) = send(&h.app, plain_req("GET", &format!("/properties/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["address"], "123 Main St");
    assert_eq!(fetched["zoning"], "residential");
    assert_eq!(fetched["value"], 200000.0);
    let coords = fetched["coordinates"].as_array().unwrap();
    assert!((coords[0].as_f64().unwrap() - 40.035).abs() < 1e-9);
    assert!((coords[1].as_f64().unwrap() - (-83.025)).abs() < 1e-9);
    assert_eq!(fetched["thumbsUp"], 0);
    assert_eq!(fetched["thumbsDown"], 0);
    assert_eq!(fetched["creatorName"], "Test editor");
}

#[tokio::test]
async fn create_applies_defaults_and_requires_address() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Viewer);

    let (status, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({ "address": "5 Oak Ave" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["zoning"], "unknown");
    assert_eq!(created["value"], 0.0);
    assert!(created["coordinates"].is_null());

    let (status, problem) = send(
        &h.app,
        json_req("POST", "/properties", Some(&token), json!({ "address": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "PROPERTIES_VALIDATION");
}

#[tokio::test]
async fn create_without_token_is_unauthorized() {
    let h = setup().await;
    let (status, _) = send(
        &h.app,
        json_req("POST", "/properties", None, json!({ "address": "1 Elm" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_is_public_and_newest_first() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Editor);

    for addr in ["first", "second", "third"] {
        h.service
            .create(
                properties::contract::NewProperty {
                    address: addr.into(),
                    ..Default::default()
                },
                &claims,
            )
            .await
            .unwrap();
        // Distinct creation timestamps keep the order deterministic.
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let (status, list) = send(&h.app, plain_req("GET", "/properties", None)).await;
    assert_eq!(status, StatusCode::OK);
    let addresses: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["address"].as_str().unwrap())
        .collect();
    assert_eq!(addresses, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn concurrent_votes_are_not_lost() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Editor);
    let p = h
        .service
        .create(
            properties::contract::NewProperty {
                address: "vote target".into(),
                ..Default::default()
            },
            &claims,
        )
        .await
        .unwrap();

    const N: usize = 25;
    let mut tasks = Vec::new();
    for _ in 0..N {
        let service = h.service.clone();
        let id = p.id;
        tasks.push(tokio::spawn(async move {
            service.vote(id, VoteDirection::Up).await.unwrap();
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    let after = h.service.get(p.id).await.unwrap();
    assert_eq!(after.thumbs_up, N as i64);
    assert_eq!(after.thumbs_down, 0);
}

#[tokio::test]
async fn voting_is_not_idempotent_but_updating_is() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Editor);
    let p = h
        .service
        .create(
            properties::contract::NewProperty {
                address: "twice".into(),
                ..Default::default()
            },
            &claims,
        )
        .await
        .unwrap();

    // Two identical votes count twice: every call is a new opinion.
    h.service.vote(p.id, VoteDirection::Down).await.unwrap();
    let after = h.service.vote(p.id, VoteDirection::Down).await.unwrap();
    assert_eq!(after.thumbs_down, 2);

    // Two identical patches converge on the same state.
    let patch = properties::contract::PropertyPatch {
        notes: Some("renovated".into()),
        value: Some(315_000.0),
        ..Default::default()
    };
    let once = h.service.update(p.id, patch.clone()).await.unwrap();
    let twice = h.service.update(p.id, patch).await.unwrap();
    assert_eq!(once.notes, twice.notes);
    assert_eq!(once.value, twice.value);
    assert_eq!(twice.thumbs_down, 2);
}

#[tokio::test]
async fn counters_stay_non_negative() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Editor);
    let p = h
        .service
        .create(
            properties::contract::NewProperty {
                address: "fresh".into(),
                ..Default::default()
            },
            &claims,
        )
        .await
        .unwrap();
    assert!(p.thumbs_up >= 0 && p.thumbs_down >= 0);

    let after = h.service.vote(p.id, VoteDirection::Up).await.unwrap();
    assert!(after.thumbs_up >= 0 && after.thumbs_down >= 0);
}

#[tokio::test]
async fn deletion_requires_admin() {
    let h = setup().await;
    let editor = token_for(&h.signer, Role::Editor);
    let admin = token_for(&h.signer, Role::Admin);

    let (_, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&editor),
            json!({ "address": "doomed" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, problem) = send(
        &h.app,
        plain_req("DELETE", &format!("/properties/{id}"), Some(&editor)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(problem["code"], "AUTH_FORBIDDEN");

    let (status, _) = send(
        &h.app,
        plain_req("DELETE", &format!("/properties/{id}"), Some(&admin)),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&h.app, plain_req("GET", &format!("/properties/{id}"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_all_reports_the_removed_count() {
    let h = setup().await;
    let admin = token_for(&h.signer, Role::Admin);

    for i in 0..3 {
        let (status, _) = send(
            &h.app,
            json_req(
                "POST",
                "/properties",
                Some(&admin),
                json!({ "address": format!("lot {i}") }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&h.app, plain_req("DELETE", "/properties", Some(&admin))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let (_, list) = send(&h.app, plain_req("GET", "/properties", None)).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn committed_mutations_reach_a_live_subscriber() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Editor);
    let mut events = h.broadcaster.subscribe();

    let (status, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({ "address": "observed" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let event = timeout(Duration::from_secs(1), events.recv())
        .await
        .expect("no event within the propagation bound")
        .unwrap();
    match event {
        PropertyEvent::Created(p) => {
            assert_eq!(p.id.to_string(), created["id"].as_str().unwrap());
            assert_eq!(p.address, "observed");
        }
        other => panic!("expected a created event, got {other:?}"),
    }
}

#[tokio::test]
async fn events_follow_commit_order() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Admin);
    let mut events = h.broadcaster.subscribe();

    let p = h
        .service
        .create(
            properties::contract::NewProperty {
                address: "ordered".into(),
                ..Default::default()
            },
            &claims,
        )
        .await
        .unwrap();
    h.service.vote(p.id, VoteDirection::Up).await.unwrap();
    h.service.delete(p.id, &claims).await.unwrap();

    assert!(matches!(events.recv().await.unwrap(), PropertyEvent::Created(_)));
    assert!(matches!(events.recv().await.unwrap(), PropertyEvent::Updated(_)));
    assert!(matches!(events.recv().await.unwrap(), PropertyEvent::Deleted { .. }));
}

struct ServiceSnapshot(Arc<Service>);

#[async_trait::async_trait]
impl SnapshotSource for ServiceSnapshot {
    async fn snapshot(&self) -> anyhow::Result<Vec<properties::Property>> {
        Ok(self.0.list().await?)
    }
}

#[tokio::test]
async fn reconnecting_client_sees_post_update_state() {
    let h = setup().await;
    let claims = claims_for(&h.signer, Role::Editor);
    let source = ServiceSnapshot(h.service.clone());

    let p = h
        .service
        .create(
            properties::contract::NewProperty {
                address: "watched".into(),
                value: Some(100_000.0),
                ..Default::default()
            },
            &claims,
        )
        .await
        .unwrap();

    // Connected client with a consistent baseline.
    let mut cache = PropertyCache::new();
    cache.resync(&source).await.unwrap();
    assert_eq!(cache.get(p.id).unwrap().value, 100_000.0);

    // The client drops; an update happens while it is away.
    h.service
        .update(
            p.id,
            properties::contract::PropertyPatch {
                value: Some(250_000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Reconnect is a full snapshot fetch, not a merge of missed events.
    cache.resync(&source).await.unwrap();
    assert_eq!(cache.get(p.id).unwrap().value, 250_000.0);
}

#[tokio::test]
async fn update_is_open_and_partial() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Editor);

    let (_, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({ "address": "before", "notes": "keep me" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // No token on PUT; only the provided field changes.
    let (status, updated) = send(
        &h.app,
        json_req(
            "PUT",
            &format!("/properties/{id}"),
            None,
            json!({ "address": "after" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["address"], "after");
    assert_eq!(updated["notes"], "keep me");
}

#[tokio::test]
async fn unknown_fields_in_a_patch_are_rejected() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Editor);

    let (_, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({ "address": "strict" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    // Counters are not patchable; the body is refused outright, and the
    // refusal is a problem document, not raw serde text.
    let resp = h
        .app
        .clone()
        .oneshot(json_req(
            "PUT",
            &format!("/properties/{id}"),
            None,
            json!({ "thumbsUp": 1000 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert_eq!(content_type, "application/problem+json");

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let problem: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(problem["code"], "REQUEST_VALIDATION");
    assert_eq!(problem["instance"], format!("/properties/{id}"));
}

#[tokio::test]
async fn invalid_vote_direction_is_a_problem_response() {
    let h = setup().await;
    let token = token_for(&h.signer, Role::Editor);

    let (_, created) = send(
        &h.app,
        json_req(
            "POST",
            "/properties",
            Some(&token),
            json!({ "address": "poll" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, problem) = send(
        &h.app,
        json_req(
            "POST",
            &format!("/properties/{id}/vote"),
            None,
            json!({ "direction": "sideways" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["code"], "REQUEST_VALIDATION");

    // The bad body never reached the counter.
    let (_, fetched) = send(&h.app, plain_req("GET", &format!("/properties/{id}"), None)).await;
    assert_eq!(fetched["thumbsUp"], 0);
    assert_eq!(fetched["thumbsDown"], 0);
}

fn bare_property(address: &str) -> properties::Property {
    let now = Utc::now();
    properties::Property {
        id: Uuid::new_v4(),
        address: address.into(),
        zoning: "unknown".into(),
        value: 0.0,
        notes: String::new(),
        tax_value: None,
        cap_rate: None,
        monthly_payment: None,
        coordinates: None,
        thumbs_up: 0,
        thumbs_down: 0,
        creator_id: None,
        creator_name: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn overwriting_a_removed_row_reports_it_gone() {
    let opts = ConnectOpts {
        max_conns: Some(1),
        ..Default::default()
    };
    let db = DbHandle::connect("sqlite::memory:", opts).await.unwrap();
    ensure_schema(db.pool()).await.unwrap();
    let repo = SqlPropertiesRepository::new(db.pool().clone());

    let mut p = bare_property("ghost");
    repo.insert(p.clone()).await.unwrap();

    // With a fetched copy in hand, the row disappears underneath.
    assert!(repo.delete(p.id).await.unwrap());

    p.notes = "stale write".into();
    assert!(!repo.update(p).await.unwrap());
}

/// Repository stub reproducing the fetch/write race: the record is visible
/// at fetch time but gone by the time the overwrite lands.
struct VanishingRepo(properties::Property);

#[async_trait::async_trait]
impl PropertiesRepository for VanishingRepo {
    async fn list(&self) -> anyhow::Result<Vec<properties::Property>> {
        Ok(vec![])
    }
    async fn find_by_id(&self, _id: Uuid) -> anyhow::Result<Option<properties::Property>> {
        Ok(Some(self.0.clone()))
    }
    async fn insert(&self, _property: properties::Property) -> anyhow::Result<()> {
        Ok(())
    }
    async fn update(&self, _property: properties::Property) -> anyhow::Result<bool> {
        Ok(false)
    }
    async fn vote(
        &self,
        _id: Uuid,
        _direction: VoteDirection,
        _at: chrono::DateTime<Utc>,
    ) -> anyhow::Result<Option<properties::Property>> {
        Ok(None)
    }
    async fn delete(&self, _id: Uuid) -> anyhow::Result<bool> {
        Ok(false)
    }
    async fn delete_all(&self) -> anyhow::Result<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn update_racing_a_delete_is_not_found_and_not_broadcast() {
    let p = bare_property("contested");
    let broadcaster = SseBroadcaster::<PropertyEvent>::new(8);
    let service = Service::new(
        Arc::new(VanishingRepo(p.clone())),
        Arc::new(SsePublisher::new(broadcaster.clone())),
    );
    let mut events = broadcaster.subscribe();

    let err = service
        .update(
            p.id,
            properties::contract::PropertyPatch {
                notes: Some("too late".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        properties::domain::error::PropertiesError::NotFound { .. }
    ));

    // No updated event for a record that no longer exists; subscribers
    // would otherwise resurrect it until the next resync.
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn vote_on_missing_property_is_not_found() {
    let h = setup().await;
    let (status, problem) = send(
        &h.app,
        json_req(
            "POST",
            &format!("/properties/{}/vote", Uuid::new_v4()),
            None,
            json!({ "direction": "up" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "PROPERTIES_NOT_FOUND");
}
