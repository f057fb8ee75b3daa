use tokio::task::JoinHandle;
use tracing::{error, info};

use super::{AppConfig, SystemError};
use crate::actor_framework::ResourceActor;
use crate::clients::{IdentityClient, MarketClient, Session};
use crate::domain::User;
use crate::market_service::MarketService;

/// Starts the user directory and the market service, wires their clients
/// together, and stops both again.
pub struct KoperasiSystem {
    pub identity: IdentityClient,
    pub market: MarketClient,
    handles: Vec<JoinHandle<()>>,
}

impl KoperasiSystem {
    pub fn new(config: &AppConfig) -> Self {
        let (user_actor, user_resource_client) =
            ResourceActor::<User>::new(config.channel_capacity, |n| format!("user_{}", n));
        let identity = IdentityClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        let (market_service, market) = MarketService::new(config.channel_capacity);
        let market_handle = tokio::spawn(market_service.run());

        info!(channel_capacity = config.channel_capacity, "System started");
        Self {
            identity,
            market,
            handles: vec![user_handle, market_handle],
        }
    }

    /// Logs in and opens a session bound to this system's market.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, SystemError> {
        let actor = self.identity.login(email, password).await?;
        Ok(Session::new(actor, self.market.clone()))
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        self.market.shutdown().await?;
        self.identity.shutdown().await?;

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::Shutdown(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
