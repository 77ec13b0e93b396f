//! Entry point bundling one client per collection over a shared transport

use std::sync::Arc;

use itms_core::{
    Approval, Asset, Incident, Issue, Partner, Project, Release, Resource, ServiceRequest,
    Specification, User,
};

use crate::api::{AuthApi, DirectoryApi, ProfileApi};
use crate::auth::{AuthContext, FileTokenStore};
use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::resource::ResourceClient;
use crate::transport::Transport;

/// Typed access to the whole ITMS backend
#[derive(Clone, Debug)]
pub struct ItmsClient {
    transport: Transport,
}

impl ItmsClient {
    /// Create a client, restoring any token pair saved at `config.token_file`
    pub async fn connect(config: ClientConfig) -> ClientResult<Self> {
        let auth = match &config.token_file {
            Some(path) => AuthContext::restore(Arc::new(FileTokenStore::new(path))).await,
            None => AuthContext::in_memory(),
        };
        Self::with_auth(config, auth)
    }

    /// Create a client around an explicit authentication context
    pub fn with_auth(config: ClientConfig, auth: AuthContext) -> ClientResult<Self> {
        Ok(Self {
            transport: Transport::new(config, auth)?,
        })
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn auth_context(&self) -> &AuthContext {
        self.transport.auth()
    }

    /// Client for any collection
    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient::new(self.transport.clone())
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.transport.clone())
    }

    pub fn profile(&self) -> ProfileApi {
        ProfileApi::new(self.transport.clone())
    }

    pub fn directory(&self) -> DirectoryApi {
        DirectoryApi::new(self.transport.clone())
    }

    pub fn projects(&self) -> ResourceClient<Project> {
        self.resource()
    }

    pub fn service_requests(&self) -> ResourceClient<ServiceRequest> {
        self.resource()
    }

    pub fn specifications(&self) -> ResourceClient<Specification> {
        self.resource()
    }

    pub fn approvals(&self) -> ResourceClient<Approval> {
        self.resource()
    }

    pub fn issues(&self) -> ResourceClient<Issue> {
        self.resource()
    }

    pub fn releases(&self) -> ResourceClient<Release> {
        self.resource()
    }

    pub fn incidents(&self) -> ResourceClient<Incident> {
        self.resource()
    }

    pub fn partners(&self) -> ResourceClient<Partner> {
        self.resource()
    }

    pub fn assets(&self) -> ResourceClient<Asset> {
        self.resource()
    }

    pub fn users(&self) -> ResourceClient<User> {
        self.resource()
    }
}
