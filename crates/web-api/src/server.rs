use crate::handlers;
use alert_bridge_bybit::BybitClient;
use axum::{
    routing::{any, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    client: Arc<BybitClient>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(client: Arc<BybitClient>) -> Self {
        Self { client }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route(
                "/api/bybit",
                post(handlers::create_order)
                    .options(handlers::preflight)
                    .fallback(handlers::method_not_allowed),
            )
            .route("/api/test", any(handlers::service_status))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.client.clone())
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Alert bridge listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}
