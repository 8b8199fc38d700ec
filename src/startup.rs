use crate::{
    app_state::AppState,
    authentication::TokenIssuer,
    configuration::{DatabaseSettings, Settings},
    request_id::RequestUuid,
    routes::{health_check, magazines, plans, subscriptions, users},
    telemetry::request_span,
};
use anyhow::Context;
use axum::Router;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{trace::TraceLayer, ServiceBuilderExt};

pub struct Application {
    address: SocketAddr,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind to {address}"))?;
        let address = listener
            .local_addr()
            .context("Failed to read the bound address")?;

        let app_state = AppState {
            db_pool: get_connection_pool(&config.database),
            token_issuer: TokenIssuer::new(&config.authentication),
        };

        Ok(Self {
            address,
            listener,
            router: router(app_state),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.address);
        axum::serve(self.listener, self.router).await
    }
}

pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(config.with_db())
}

fn router(app_state: AppState) -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(users::router())
        .merge(magazines::router())
        .merge(plans::router())
        .merge(subscriptions::router())
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .set_x_request_id(RequestUuid)
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .propagate_x_request_id(),
        )
}
