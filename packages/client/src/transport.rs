//! HTTP transport shared by every resource and endpoint client

use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use itms_core::constants::AUTH_REFRESH_PATH;
use itms_core::models::auth::{RefreshTokenRequest, RefreshTokenResponse};
use itms_core::ApiError;

use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Paths whose 401 means "bad credentials" rather than "stale token"
const NO_REFRESH_PATHS: &[&str] = &["/auth/login", AUTH_REFRESH_PATH];

/// Query string and JSON body of one request.
///
/// Both are captured as owned values so the request can be sent again
/// after a token refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode a serializable record as query parameters
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> ClientResult<Self> {
        let value = serde_json::to_value(query)?;
        self.query.extend(encode_query(&value));
        Ok(self)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

/// Flatten a JSON object into query pairs.
///
/// Nulls and empty strings are dropped and arrays become repeated keys.
pub fn encode_query(value: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = value else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(scalar) = scalar_to_string(item) {
                        pairs.push((key.clone(), scalar));
                    }
                }
            }
            other => {
                if let Some(scalar) = scalar_to_string(other) {
                    pairs.push((key.clone(), scalar));
                }
            }
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Configured HTTP client plus the session's [`AuthContext`]
#[derive(Clone, Debug)]
pub struct Transport {
    http: Client,
    config: ClientConfig,
    auth: AuthContext,
}

impl Transport {
    /// Create a transport for `config`; requests authenticate through `auth`
    pub fn new(config: ClientConfig, auth: AuthContext) -> ClientResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config, auth })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a request and return the successful response.
    ///
    /// A 401/403 triggers one token refresh and one retransmission; every
    /// other failure status is normalized into a [`ClientError`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<Response> {
        let response = self.dispatch(&method, path, &options).await?;

        if is_auth_status(response.status()) && !NO_REFRESH_PATHS.contains(&path) {
            let status = response.status();
            let original = read_error_body(response).await;

            if !self.try_refresh().await {
                return Err(ClientError::Auth(original));
            }

            tracing::debug!("Retrying {} {} after refresh (was {})", method, path, status);
            let retry = self.dispatch(&method, path, &options).await?;
            return check_status(retry).await;
        }

        check_status(response).await
    }

    /// Send a request and decode the JSON response body
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<T> {
        let response = self.send(method, path, options).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!("Unexpected body from {}: {}", path, e))
        })
    }

    /// Send a request whose response body is ignored
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> ClientResult<()> {
        self.send(method, path, options).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::GET, path, RequestOptions::new()).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, path, RequestOptions::new().json(body)?)
            .await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::PUT, path, RequestOptions::new().json(body)?)
            .await
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// The refresh call goes out without a bearer header. A rejected refresh
    /// token is forgotten so the session reads as signed out.
    pub async fn refresh(&self) -> ClientResult<RefreshTokenResponse> {
        let refresh_token = self
            .auth
            .refresh_token()
            .await
            .ok_or_else(|| ClientError::auth("No refresh token available. Please log in"))?;

        tracing::info!("Refreshing access token");
        let response = self
            .http
            .post(self.config.endpoint(AUTH_REFRESH_PATH))
            .json(&RefreshTokenRequest { refresh_token })
            .send()
            .await?;

        if !response.status().is_success() {
            let error = read_error_body(response).await;
            tracing::warn!("Token refresh rejected: {}", error);
            if let Err(e) = self.auth.clear().await {
                tracing::warn!("Could not clear rejected tokens: {}", e);
            }
            return Err(ClientError::Auth(error));
        }

        let bytes = response.bytes().await?;
        let tokens: RefreshTokenResponse = serde_json::from_slice(&bytes)?;
        self.auth
            .update_access_token(tokens.access_token.clone(), tokens.refresh_token.clone())
            .await?;

        Ok(tokens)
    }

    async fn try_refresh(&self) -> bool {
        match self.refresh().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                false
            }
        }
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        options: &RequestOptions,
    ) -> ClientResult<Response> {
        let mut request = self
            .http
            .request(method.clone(), self.config.endpoint(path));

        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }
        if let Some(token) = self.auth.access_token().await {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        tracing::debug!("{} {} -> {}", method, path, response.status());
        Ok(response)
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error = read_error_body(response).await;
    Err(match status {
        s if is_auth_status(s) => ClientError::Auth(error),
        StatusCode::NOT_FOUND => ClientError::NotFound(error),
        _ if error.is_not_found() => ClientError::NotFound(error),
        _ => ClientError::Api {
            status: status.as_u16(),
            error,
        },
    })
}

/// Decode an error body, synthesizing one when it is not an ApiError
async fn read_error_body(response: Response) -> ApiError {
    let status = response.status().as_u16();
    match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ApiError>(&bytes)
            .unwrap_or_else(|_| ApiError::unknown(status)),
        Err(e) => {
            tracing::debug!("Could not read error body: {}", e);
            ApiError::unknown(status)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_encode_query_drops_null_and_empty() {
        let mut pairs = encode_query(&json!({
            "page": 0,
            "size": 10,
            "search": "",
            "status": null,
            "isActive": true
        }));
        pairs.sort();

        assert_eq!(
            pairs,
            vec![
                ("isActive".to_string(), "true".to_string()),
                ("page".to_string(), "0".to_string()),
                ("size".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_encode_query_repeats_array_keys() {
        let pairs = encode_query(&json!({ "approverIds": [3, 5, null, ""] }));
        assert_eq!(
            pairs,
            vec![
                ("approverIds".to_string(), "3".to_string()),
                ("approverIds".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_encode_query_ignores_non_objects() {
        assert!(encode_query(&json!("plain")).is_empty());
    }

    #[test]
    fn test_request_options_capture_body_for_resend() {
        let options = RequestOptions::new()
            .json(&json!({ "name": "Core" }))
            .unwrap()
            .query(&json!({ "page": 1 }))
            .unwrap();

        let copy = options.clone();
        assert_eq!(copy.body, Some(json!({ "name": "Core" })));
        assert_eq!(copy.query, vec![("page".to_string(), "1".to_string())]);
    }
}
