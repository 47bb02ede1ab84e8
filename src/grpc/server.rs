//! gRPC server wrapped as a lifecycle actor.

use tonic::service::Routes;
use tonic::transport::Server;
use tonic_health::server::health_reporter;

use crate::http::ServerError;
use crate::lifecycle::{Actor, ActorError, Shutdown};

/// A tonic server bound to one address.
pub struct GrpcServer {
    address: String,
    routes: Routes,
}

impl GrpcServer {
    /// Serve `routes` plus the standard health service on `address`.
    pub fn new(address: impl Into<String>, routes: Routes) -> Self {
        Self {
            address: address.into(),
            routes,
        }
    }

    /// Bind and serve until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) -> Result<(), ServerError> {
        let addr = tokio::net::lookup_host(&self.address)
            .await
            .map_err(|source| ServerError::Bind {
                address: self.address.clone(),
                source,
            })?
            .next()
            .ok_or_else(|| ServerError::Resolve(self.address.clone()))?;

        let (_health_reporter, health_service) = health_reporter();

        tracing::info!(address = %addr, "gRPC server starting");

        Server::builder()
            .add_routes(self.routes)
            .add_service(health_service)
            .serve_with_shutdown(addr, shutdown.wait())
            .await
            .map_err(|source| ServerError::Grpc {
                address: self.address.clone(),
                source,
            })?;

        tracing::info!(address = %addr, "gRPC server stopped");
        Ok(())
    }

    /// Turn the server into a group actor: serve as start, close as stop.
    pub fn into_actor(self) -> Actor {
        let shutdown = Shutdown::new();
        let trigger = shutdown.clone();

        Actor::new(
            "grpc",
            async move { self.run(shutdown).await.map_err(ActorError::from) },
            move |_| trigger.trigger(),
        )
    }
}
