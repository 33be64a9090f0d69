//! Wiring: schemas, services, routers and the HTTP server itself.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use url::Url;

use db::DbHandle;
use restkit::request_id::{create_trace_layer, header as request_id_header, MakeReqId};
use restkit::SseBroadcaster;
use runtime::AppConfig;

use accounts::infra::token::TokenSigner;
use feature_requests::domain::mailer::{Mailer, NoopMailer};
use feature_requests::infra::mail::HttpMailer;
use properties::domain::events::PropertyEvent;
use properties::infra::broadcast::SsePublisher;

/// Capacity of the live event channel. A subscriber that falls further
/// behind than this loses oldest events and resyncs via snapshot.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Fully wired application, exposed separately from `serve` so tests can
/// drive the router without binding a socket.
pub struct App {
    pub router: Router,
    pub broadcaster: SseBroadcaster<PropertyEvent>,
}

pub async fn build_app(config: &AppConfig, db: &DbHandle) -> Result<App> {
    if config.auth.token_secret.is_empty() {
        anyhow::bail!("auth.token_secret must be configured");
    }

    // Each module owns its DDL; all of it is idempotent.
    accounts::infra::storage::ensure_schema(db.pool())
        .await
        .context("accounts schema setup failed")?;
    properties::infra::storage::ensure_schema(db.pool())
        .await
        .context("properties schema setup failed")?;
    feature_requests::infra::storage::ensure_schema(db.pool())
        .await
        .context("feature requests schema setup failed")?;

    let signer = Arc::new(TokenSigner::new(
        &config.auth.token_secret,
        config.auth.token_ttl,
    ));

    let users_repo = Arc::new(accounts::infra::storage::SqlUsersRepository::new(
        db.pool().clone(),
    ));
    let accounts_service = Arc::new(accounts::domain::service::Service::new(
        users_repo,
        signer.clone(),
    ));

    if let Some(admin) = &config.auth.bootstrap_admin {
        accounts_service
            .ensure_bootstrap_admin(&admin.email, &admin.password, &admin.display_name)
            .await
            .context("bootstrap admin seeding failed")?;
    }

    let broadcaster = SseBroadcaster::<PropertyEvent>::new(EVENT_CHANNEL_CAPACITY);
    let properties_repo = Arc::new(properties::infra::storage::SqlPropertiesRepository::new(
        db.pool().clone(),
    ));
    let properties_service = Arc::new(properties::domain::service::Service::new(
        properties_repo,
        Arc::new(SsePublisher::new(broadcaster.clone())),
    ));

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => {
            let url = Url::parse(&mail.webhook_url)
                .with_context(|| format!("invalid mail.webhook_url '{}'", mail.webhook_url))?;
            Arc::new(HttpMailer::new(url, Some(mail.notify_to.clone())))
        }
        None => Arc::new(NoopMailer),
    };
    let feature_requests_repo = Arc::new(
        feature_requests::infra::storage::SqlFeatureRequestsRepository::new(db.pool().clone()),
    );
    let feature_requests_service = Arc::new(feature_requests::domain::service::Service::new(
        feature_requests_repo,
        mailer,
    ));

    let api = Router::new()
        .merge(accounts::api::rest::routes::router(
            accounts_service,
            signer.clone(),
        ))
        .merge(properties::api::rest::routes::router(
            properties_service,
            signer.clone(),
            broadcaster.clone(),
        ))
        .merge(feature_requests::api::rest::routes::router(
            feature_requests_service,
            signer,
        ));

    let mut router = Router::new().nest("/api", api).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id_header(), MakeReqId))
            .layer(create_trace_layer())
            .layer(PropagateRequestIdLayer::new(request_id_header()))
            .layer(CorsLayer::permissive()),
    );

    if config.server.timeout_sec > 0 {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(
            config.server.timeout_sec,
        )));
    }

    Ok(App {
        router,
        broadcaster,
    })
}

pub async fn serve(config: AppConfig, db: DbHandle) -> Result<()> {
    let app = build_app(&config, &db).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app.router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shutdown complete");
    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl-c"),
        _ = terminate => tracing::info!("received terminate signal"),
    }
}
