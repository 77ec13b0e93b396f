//! Endpoints outside the plain CRUD collections

use reqwest::Method;

use itms_core::models::{
    approval::{Approval, ApprovalProcessRequest},
    auth::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
        RefreshTokenResponse,
    },
    company::Company,
    dashboard::DashboardStats,
    partner::Partner,
    user::{PasswordResetRequest, User, UserCreateRequest, UserUpdateRequest},
};

use crate::auth::TokenPair;
use crate::error::ClientResult;
use crate::resource::ResourceClient;
use crate::transport::{RequestOptions, Transport};

/// `/auth/*` endpoints; login and logout also manage the stored token pair
#[derive(Clone, Debug)]
pub struct AuthApi {
    transport: Transport,
}

impl AuthApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Sign in and persist the issued token pair
    pub async fn login(&self, request: &LoginRequest) -> ClientResult<LoginResponse> {
        let response: LoginResponse = self.transport.post("/auth/login", request).await?;

        self.transport
            .auth()
            .set_tokens(TokenPair::new(
                response.access_token.clone(),
                Some(response.refresh_token.clone()),
            ))
            .await?;

        tracing::info!("Logged in as {}", response.user.email);
        Ok(response)
    }

    /// Sign out. Local tokens are cleared even when the backend call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .transport
            .execute(Method::POST, "/auth/logout", RequestOptions::new())
            .await;
        if let Err(e) = &result {
            tracing::warn!("Logout request failed, clearing local tokens anyway: {}", e);
        }

        self.transport.auth().clear().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    pub async fn register(&self, request: &UserCreateRequest) -> ClientResult<User> {
        self.transport.post("/auth/register", request).await
    }

    /// The signed-in user
    pub async fn me(&self) -> ClientResult<User> {
        self.transport.get("/auth/me").await
    }

    pub async fn refresh(&self) -> ClientResult<RefreshTokenResponse> {
        self.transport.refresh().await
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> ClientResult<()> {
        self.transport
            .execute(
                Method::PUT,
                "/auth/password/change",
                RequestOptions::new().json(request)?,
            )
            .await
    }

    pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ClientResult<()> {
        self.transport
            .execute(
                Method::POST,
                "/auth/forgot-password",
                RequestOptions::new().json(request)?,
            )
            .await
    }
}

/// The signed-in user's own profile
#[derive(Clone, Debug)]
pub struct ProfileApi {
    transport: Transport,
}

impl ProfileApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn get(&self) -> ClientResult<User> {
        self.transport.get("/profile").await
    }

    pub async fn update(&self, request: &UserUpdateRequest) -> ClientResult<User> {
        self.transport.put("/profile", request).await
    }
}

/// Lookup lists and dashboard counters
#[derive(Clone, Debug)]
pub struct DirectoryApi {
    transport: Transport,
}

impl DirectoryApi {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        self.transport.get("/dashboard/stats").await
    }

    pub async fn companies(&self) -> ClientResult<Vec<Company>> {
        self.transport.get("/companies").await
    }

    /// Partners offered as the client company of a new project
    pub async fn partners_for_company_selection(&self) -> ClientResult<Vec<Partner>> {
        self.transport.get("/partners/for-company-selection").await
    }
}

impl ResourceClient<Approval> {
    /// Record the signed-in approver's verdict on their step
    pub async fn process(
        &self,
        id: i64,
        request: &ApprovalProcessRequest,
    ) -> ClientResult<Approval> {
        self.transport()
            .put(&format!("/approvals/{}/process", id), request)
            .await
    }
}

impl ResourceClient<User> {
    /// Administrator password reset
    pub async fn reset_password(
        &self,
        id: i64,
        request: &PasswordResetRequest,
    ) -> ClientResult<()> {
        self.transport()
            .execute(
                Method::PUT,
                &format!("/users/{}/password", id),
                RequestOptions::new().json(request)?,
            )
            .await
    }

    /// Flip the account between active and inactive
    pub async fn toggle_status(&self, id: i64) -> ClientResult<()> {
        self.transport()
            .execute(
                Method::PATCH,
                &format!("/users/{}/toggle-status", id),
                RequestOptions::new(),
            )
            .await
    }
}
