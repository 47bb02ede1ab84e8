//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap a caller-supplied Axum router with the common middleware
//!   (request ID, trace spans, read and write deadlines, request stats)
//! - Bind the listener and serve until told to stop
//! - Expose the server as a lifecycle actor

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    timeout::{RequestBodyTimeoutLayer, TimeoutLayer},
    trace::TraceLayer,
};

use crate::http::middleware::track_requests;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::{Actor, ActorError, Shutdown};
use crate::observability::Stats;

/// Errors from the HTTP and gRPC listeners.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("address {0} did not resolve")]
    Resolve(String),

    #[error("http server on {address} failed: {source}")]
    Serve {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("grpc server on {address} failed: {source}")]
    Grpc {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// Listener settings for one HTTP server.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpServerConfig {
    /// `host:port` to bind.
    pub address: String,
    /// Deadline for reading the request body. Zero disables it.
    pub read_timeout: Duration,
    /// Deadline for producing the response. Zero disables it.
    pub write_timeout: Duration,
}

/// An HTTP server bound to one address.
pub struct HttpServer {
    name: String,
    config: HttpServerConfig,
    router: Router,
    stats: Option<Arc<Stats>>,
}

impl HttpServer {
    /// Create a server that will serve `router` with the common middleware.
    pub fn new(name: impl Into<String>, config: HttpServerConfig, router: Router) -> Self {
        Self {
            name: name.into(),
            config,
            router,
            stats: None,
        }
    }

    /// Record every request served, timed-out ones included, in `stats`.
    pub fn with_stats(mut self, stats: Arc<Stats>) -> Self {
        self.stats = Some(stats);
        self
    }

    /// The router with the middleware layers shared by every server.
    ///
    /// Stats sit outside the deadlines so a request cut off by a timeout is
    /// still counted with the status the client saw.
    #[allow(deprecated)]
    fn build_router(&self) -> Router {
        let mut router = self.router.clone();
        if !self.config.write_timeout.is_zero() {
            router = router.layer(TimeoutLayer::new(self.config.write_timeout));
        }
        if !self.config.read_timeout.is_zero() {
            router = router.layer(RequestBodyTimeoutLayer::new(self.config.read_timeout));
        }
        if let Some(stats) = &self.stats {
            router = router.layer(middleware::from_fn_with_state(Arc::clone(stats), track_requests));
        }
        router
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// Bind and serve until `shutdown` fires.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServerError> {
        let address = self.config.address.clone();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| ServerError::Bind {
                address: address.clone(),
                source,
            })?;

        let local_addr = listener.local_addr().map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;
        tracing::info!(server = %self.name, address = %local_addr, "HTTP server starting");

        let app = self
            .build_router()
            .into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.wait())
            .await
            .map_err(|source| ServerError::Serve {
                address: address.clone(),
                source,
            })?;

        tracing::info!(server = %self.name, "HTTP server stopped");
        Ok(())
    }

    /// Turn the server into a group actor: serve as start, close as stop.
    pub fn into_actor(self) -> Actor {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();
        let name = self.name.clone();

        Actor::new(
            name,
            async move { self.run(shutdown).await.map_err(ActorError::from) },
            move |_| trigger.trigger(),
        )
    }
}
