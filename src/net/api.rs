//! REST client for the hosted backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every backend call goes through [`ApiClient::request`]: URL assembly per
//! endpoint group, header merge, bearer attachment from the session store the
//! client was built with, and the shared success/error contract. Endpoint
//! methods below are thin typed wrappers.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx replies become `ApiError::Http` carrying the backend's message or
//! `HTTP error! status: <code>`. Nothing retries; callers decide what to show.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::checkout::parse_checkout_response;
use super::error::{ApiError, http_error};
use super::headers::{HeaderSource, build_headers};
use super::types::{
    AnalyticsSnapshot, AuthResponse, BadReview, CheckoutSession, ClientMessage, ContactRequest, ContactResponse,
    LoginCredentials, SignupCredentials, UserProfile,
};
use crate::config::{ApiConfig, EndpointGroup};
use crate::session::{SESSION_TTL, SessionStore};
use crate::util::message::normalize_message;

pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const ME_PATH: &str = "/auth/me";
pub const CLIENT_MESSAGE_PATH: &str = "/client_message";
pub const EVENT_PATH: &str = "/event";
pub const BAD_REVIEWS_PATH: &str = "/bad_reviews";
pub const CHECKOUT_PATH: &str = "/stripe/create-checkout-session";
pub const SEND_MAIL_PATH: &str = "/send_mail";

// =============================================================================
// CALL DESCRIPTION
// =============================================================================

/// One outbound request: where, how, and with what.
#[derive(Debug, Clone)]
pub struct ApiCall {
    pub group: EndpointGroup,
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Option<HeaderSource>,
}

impl ApiCall {
    #[must_use]
    pub fn new(group: EndpointGroup, method: Method, path: &str) -> Self {
        Self { group, method, path: path.to_owned(), body: None, headers: None }
    }

    #[must_use]
    pub fn get(group: EndpointGroup, path: &str) -> Self {
        Self::new(group, Method::GET, path)
    }

    #[must_use]
    pub fn post(group: EndpointGroup, path: &str) -> Self {
        Self::new(group, Method::POST, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?);
        Ok(self)
    }

    #[must_use]
    pub fn headers(mut self, headers: impl Into<HeaderSource>) -> Self {
        self.headers = Some(headers.into());
        self
    }
}

/// Join a group base URL and an endpoint path with exactly one slash.
#[must_use]
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

// =============================================================================
// CLIENT
// =============================================================================

/// Typed client for all endpoint groups. Cloning is cheap.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
    session: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("authenticated", &self.session.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client that reads and writes the token through `session`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config: Arc::new(config), session })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    /// Perform `call` and decode a 2xx JSON body as `T`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` for non-2xx replies, `ApiError::Transport` when
    /// the request fails, and `ApiError::Decode` when the body does not match `T`.
    pub async fn request<T: DeserializeOwned>(&self, call: ApiCall) -> Result<T, ApiError> {
        let response = self.send(call).await?;
        let text = response.text().await?;
        decode_json(&text)
    }

    /// Send `call` and return the response only when its status is 2xx.
    async fn send(&self, call: ApiCall) -> Result<reqwest::Response, ApiError> {
        let url = endpoint_url(self.config.base_url(call.group), &call.path);
        let token = self.session.get_token();
        let headers = build_headers(token.as_deref(), call.headers.as_ref())?;

        tracing::debug!(
            group = call.group.as_str(),
            method = %call.method,
            path = %call.path,
            authenticated = token.is_some(),
            "api request"
        );

        let mut builder = self.http.request(call.method.clone(), &url).headers(headers);
        if let Some(body) = &call.body {
            let bytes = serde_json::to_vec(body).map_err(|e| ApiError::Encode(e.to_string()))?;
            builder = builder.body(bytes);
        }

        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = http_error(status.as_u16(), &body);
        tracing::warn!(group = call.group.as_str(), path = %call.path, status = status.as_u16(), error = %err, "api error");
        Err(err)
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/login`; stores the returned token.
    ///
    /// # Errors
    ///
    /// Returns the request error; the session is left untouched on failure.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthResponse, ApiError> {
        let call = ApiCall::post(EndpointGroup::Auth, LOGIN_PATH).json(credentials)?;
        let response: AuthResponse = self.request(call).await?;
        self.store_token(&response);
        Ok(response)
    }

    /// `POST /auth/signup`; stores the returned token.
    ///
    /// # Errors
    ///
    /// Returns the request error; the session is left untouched on failure.
    pub async fn signup(&self, credentials: &SignupCredentials) -> Result<AuthResponse, ApiError> {
        let call = ApiCall::post(EndpointGroup::Auth, SIGNUP_PATH).json(credentials)?;
        let response: AuthResponse = self.request(call).await?;
        self.store_token(&response);
        Ok(response)
    }

    /// `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.request(ApiCall::get(EndpointGroup::Auth, ME_PATH)).await
    }

    /// Forget the session token. Local only; there is no server-side logout.
    pub fn logout(&self) {
        self.session.remove_token();
    }

    fn store_token(&self, response: &AuthResponse) {
        if let Some(token) = response.auth_token.as_deref().filter(|t| !t.is_empty()) {
            self.session.set_token(token, SESSION_TTL);
        }
    }

    // =========================================================================
    // DASHBOARD
    // =========================================================================

    /// `GET /client_message`, with message text normalized.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn client_messages(&self) -> Result<Vec<ClientMessage>, ApiError> {
        let messages: Vec<ClientMessage> =
            self.request(ApiCall::get(EndpointGroup::Messages, CLIENT_MESSAGE_PATH)).await?;
        Ok(messages
            .into_iter()
            .map(|m| ClientMessage { message: normalize_message(&m.message), ..m })
            .collect())
    }

    /// `GET /event`.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn analytics(&self) -> Result<AnalyticsSnapshot, ApiError> {
        self.request(ApiCall::get(EndpointGroup::Analytics, EVENT_PATH)).await
    }

    /// `GET /bad_reviews`.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn bad_reviews(&self) -> Result<Vec<BadReview>, ApiError> {
        self.request(ApiCall::get(EndpointGroup::Reviews, BAD_REVIEWS_PATH)).await
    }

    /// `POST /stripe/create-checkout-session`.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `ApiError::MissingCheckoutUrl` when the
    /// reply has no usable redirect URL.
    pub async fn create_checkout_session(&self) -> Result<CheckoutSession, ApiError> {
        let response = self.send(ApiCall::post(EndpointGroup::Checkout, CHECKOUT_PATH)).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await?;
        parse_checkout_response(content_type.as_deref(), &body)
    }

    // =========================================================================
    // CONTACT
    // =========================================================================

    /// `POST /send_mail`.
    ///
    /// # Errors
    ///
    /// Returns the request error.
    pub async fn send_contact(&self, request: &ContactRequest) -> Result<ContactResponse, ApiError> {
        let call = ApiCall::post(EndpointGroup::Contact, SEND_MAIL_PATH).json(request)?;
        self.request(call).await
    }
}

#[cfg_attr(target_arch = "wasm32", allow(unused_variables))]
fn build_http_client(config: &ApiConfig) -> Result<reqwest::Client, ApiError> {
    let builder = reqwest::Client::builder();
    // Browser fetch has no client-side timeout knobs.
    #[cfg(not(target_arch = "wasm32"))]
    let builder = builder
        .timeout(std::time::Duration::from_secs(config.timeouts.request_secs))
        .connect_timeout(std::time::Duration::from_secs(config.timeouts.connect_secs));
    builder
        .build()
        .map_err(|e| ApiError::HttpClientBuild(e.to_string()))
}

/// Decode a success body; an empty body reads as JSON `null`.
fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
