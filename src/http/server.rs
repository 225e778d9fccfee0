//! Router assembly and the serve loop for the HTTP front end.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::bridge::TcpBridge;
use crate::config::RelayConfig;
use crate::http::cors::{self, cors_header_layer};
use crate::http::handlers::{self, CONVERT_PATH};
use crate::http::request::{make_request_span, MakeRequestUuidV4};
use crate::http::static_files::StaticFiles;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub bridge: Arc<TcpBridge>,
    pub static_files: Arc<StaticFiles>,
}

impl AppState {
    pub fn from_config(config: &RelayConfig) -> Self {
        Self {
            bridge: Arc::new(TcpBridge::from_config(config)),
            static_files: Arc::new(StaticFiles::new(&config.static_files)),
        }
    }
}

/// HTTP front end of the relay.
pub struct HttpServer {
    router: Router,
    config: RelayConfig,
}

impl HttpServer {
    pub fn new(config: RelayConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Layers added last run first: request ID, tracing, CORS headers,
    /// timeout, body limit, preflight, then routing.
    #[allow(deprecated)]
    fn build_router(config: &RelayConfig, state: AppState) -> Router {
        let [origin, methods, headers] = cors::cors_headers();

        Router::new()
            .route(CONVERT_PATH, post(handlers::convert).fallback(handlers::method_not_routed))
            .fallback(handlers::serve_static)
            .with_state(state)
            .layer(middleware::from_fn(cors::preflight))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(cors_header_layer(headers.0, headers.1))
            .layer(cors_header_layer(methods.0, methods.1))
            .layer(cors_header_layer(origin.0, origin.1))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            downstream = %self.config.downstream.address(),
            static_root = %self.config.static_files.root.display(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
