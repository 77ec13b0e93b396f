//! ITMS REST client
//!
//! Typed access to the ITMS backend: one generic [`ResourceClient`] per
//! collection, the auth/profile/lookup endpoints, and a [`Transport`] that
//! attaches the bearer token and refreshes it once on 401/403.

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod resource;
pub mod transport;

// Re-export commonly used types
pub use api::{AuthApi, DirectoryApi, ProfileApi};
pub use auth::{AuthContext, FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
pub use client::ItmsClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ClientError, ClientResult, ErrorKind};
pub use resource::ResourceClient;
pub use transport::{RequestOptions, Transport};

pub use itms_core;

/// Create a client from `.env`, the environment and the config file
pub async fn init() -> ClientResult<ItmsClient> {
    let config = ClientConfig::load().await?;
    tracing::debug!("Using API base URL {}", config.base_url);
    ItmsClient::connect(config).await
}
